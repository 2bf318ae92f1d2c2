//! Translation engine adapters
//!
//! Every provider is modeled as one implementation of the flat [`MTEngine`]
//! capability trait: translate, detect language, list supported languages,
//! report a character limit. The orchestrator never sees provider-specific
//! request shapes, auth schemes or error bodies; those stay inside the
//! adapters, which map vendor failures into [`crate::error::MtError`].
//!
//! [`Engine`] wraps a trait object together with the optional
//! supported-language cache and carries the read-through policy and the
//! strict/lenient support check used by engine selection.
//!
//! # Example
//!
//! ```ignore
//! use mt_hub::engines::{Engine, EngineType};
//! use mt_hub::engines::google::GoogleEngine;
//!
//! let api = GoogleEngine::new("api-key".to_string())?;
//! let engine = Engine::new(std::sync::Arc::new(api), None);
//! let rewritten = engine.has_support_for("en-GB", false).await;
//! ```

pub mod azure;
pub mod deepl;
pub mod google;
pub mod mock;

use crate::cache::LanguageCache;
use crate::error::MtResult;
use crate::language::{LanguageCode, SupportedLanguage, base_language};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identifies one translation provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineType {
    Azure,
    Google,
    Deepl,
}

impl fmt::Display for EngineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineType::Azure => "azure",
            EngineType::Google => "google",
            EngineType::Deepl => "deepl",
        };
        write!(f, "{}", name)
    }
}

/// One translation call, with the source language already resolved
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub content: String,
    pub source_language_code: LanguageCode,
    pub target_language_code: LanguageCode,
    pub is_html: bool,
}

/// Uniform capability contract implemented once per provider
///
/// Adapters must not retry internally; retry policy belongs to the caller.
/// Every `translate`/`detect_language` call is one network request.
#[async_trait]
pub trait MTEngine: Send + Sync {
    fn engine_type(&self) -> EngineType;

    /// Fixed, provider-specific maximum content length for one network call
    fn char_limit(&self) -> usize;

    async fn translate(&self, request: &TranslationRequest) -> MtResult<String>;

    /// Best-effort source language detection
    async fn detect_language(&self, content: &str) -> MtResult<LanguageCode>;

    /// Query the provider's language-list endpoint
    ///
    /// On any failure this returns an empty list rather than an error; callers
    /// must treat empty as "fetch failed", not "provider supports nothing".
    async fn fetch_supported_languages(&self) -> Vec<SupportedLanguage>;
}

/// A provider adapter paired with the supported-language cache
///
/// Cheap to clone; all inner state is shared and immutable after
/// construction.
#[derive(Clone)]
pub struct Engine {
    api: Arc<dyn MTEngine>,
    cache: Option<LanguageCache>,
}

impl Engine {
    pub fn new(api: Arc<dyn MTEngine>, cache: Option<LanguageCache>) -> Self {
        Engine { api, cache }
    }

    pub fn engine_type(&self) -> EngineType {
        self.api.engine_type()
    }

    pub fn char_limit(&self) -> usize {
        self.api.char_limit()
    }

    pub async fn translate(&self, request: &TranslationRequest) -> MtResult<String> {
        self.api.translate(request).await
    }

    pub async fn detect_language(&self, content: &str) -> MtResult<LanguageCode> {
        self.api.detect_language(content).await
    }

    /// This engine's language catalog, read through the cache
    ///
    /// Checks the cache first unless `skip_cache`; on a miss (or when no cache
    /// is configured) the provider is queried. The result is written back only
    /// when a cache is configured and the fetch produced at least one
    /// language: an empty fetch means the provider call failed, and caching it
    /// would poison the catalog for the TTL window.
    pub async fn supported_languages(&self, skip_cache: bool) -> Vec<SupportedLanguage> {
        if !skip_cache {
            if let Some(cache) = &self.cache {
                if let Some(languages) = cache.get(self.engine_type()).await {
                    return languages;
                }
            }
        }
        let languages = self.api.fetch_supported_languages().await;
        if languages.is_empty() {
            tracing::error!(engine = %self.engine_type(), "provider returned no supported languages");
            return languages;
        }
        if let Some(cache) = &self.cache {
            if !cache.set(self.engine_type(), &languages).await {
                // Non-fatal: the fetched catalog is still returned
                tracing::warn!(engine = %self.engine_type(), "failed to cache supported languages");
            }
        }
        languages
    }

    /// Check support for a language code against the (possibly cached) catalog
    ///
    /// Returns the code the provider should actually be called with: the exact
    /// code when present, or - on a lenient check - its base language when
    /// only that is supported (`"en-gb"` served as `"en"`). `None` means the
    /// engine cannot handle the code at all.
    pub async fn has_support_for(&self, code: &str, strict: bool) -> Option<LanguageCode> {
        let supported = self.supported_languages(false).await;
        if supported.iter().any(|l| l.code == code) {
            return Some(code.to_string());
        }
        if !strict {
            let base = base_language(code);
            if base != code && supported.iter().any(|l| l.code == base) {
                return Some(base.to_string());
            }
        }
        None
    }
}
