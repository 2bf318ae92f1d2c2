//! Supported-language catalog cache
//!
//! Each engine's language catalog is fetched from the provider's REST API,
//! which is slow and rate-limited, so catalogs are cached in an external
//! key-value store for three days. The store itself is a collaborator behind
//! the [`KeyValueStore`] trait; this module owns the key scheme, the TTL and
//! the JSON payload format.
//!
//! Keys embed both a schema version constant and the engine identifier
//! (`"v2:google"`), so incompatible historical entries are naturally
//! invalidated by a version bump instead of an explicit migration. An entry
//! older than its TTL is treated as absent, never as stale-but-usable.
//!
//! Engines never talk to the backing store directly: the read-through policy
//! lives in [`crate::engines::Engine`], which consults [`LanguageCache`] and
//! falls back to a provider fetch on a miss.

use crate::engines::EngineType;
use crate::language::SupportedLanguage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Cache key schema version; bump to invalidate all historical entries
pub const SCHEMA_VERSION: &str = "v2";

/// How long a cached catalog stays valid
pub const CACHE_TTL: Duration = Duration::from_secs(3 * 24 * 60 * 60);

/// External key-value store boundary
///
/// Implementations wrap whatever store the deployment provides (Redis,
/// memcached, an in-process map). `set` reports success as a bool rather than
/// an error: cache write failures are non-fatal by contract.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> bool;

    /// Release the backing connection; safe to call once during teardown
    async fn shutdown(&self);
}

/// Versioned, TTL-limited cache of per-engine language catalogs
#[derive(Clone)]
pub struct LanguageCache {
    store: Arc<dyn KeyValueStore>,
}

impl LanguageCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        LanguageCache { store }
    }

    fn key(engine: EngineType) -> String {
        format!("{}:{}", SCHEMA_VERSION, engine)
    }

    /// Cached catalog for an engine, or `None` on miss/expiry/decode failure
    pub async fn get(&self, engine: EngineType) -> Option<Vec<SupportedLanguage>> {
        let raw = self.store.get(&Self::key(engine)).await?;
        match serde_json::from_str(&raw) {
            Ok(languages) => Some(languages),
            Err(err) => {
                // Undecodable entries count as a miss; the next set overwrites them
                tracing::warn!(engine = %engine, error = %err, "discarding undecodable cache entry");
                None
            }
        }
    }

    /// Store an engine's catalog with the fixed TTL; returns write success
    pub async fn set(&self, engine: EngineType, languages: &[SupportedLanguage]) -> bool {
        let payload = match serde_json::to_string(languages) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(engine = %engine, error = %err, "failed to encode catalog for caching");
                return false;
            }
        };
        self.store.set(&Self::key(engine), payload, CACHE_TTL).await
    }

    pub async fn shutdown(&self) {
        self.store.shutdown().await;
    }
}

/// In-process [`KeyValueStore`] with per-entry expiry
///
/// Backs the CLI and the test suite. Last writer wins on refresh; expired
/// entries are absent on read.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<String> {
        // A panic in another holder leaves the map intact; keep serving it
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => Some(value.clone()),
            _ => None,
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), (value, Instant::now() + ttl));
        true
    }

    async fn shutdown(&self) {}
}
