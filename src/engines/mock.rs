//! Mock translation engine for testing
//!
//! A deterministic, API-free [`MTEngine`] so the orchestrator can be exercised
//! without API keys or network access. The mock impersonates any
//! [`EngineType`], serves a configurable catalog, and counts provider calls so
//! tests can assert on caching behavior.
//!
//! # Example
//!
//! ```ignore
//! use mt_hub::engines::EngineType;
//! use mt_hub::engines::mock::{MockEngine, MockMode};
//!
//! let mock = MockEngine::new(EngineType::Google, MockMode::Suffix)
//!     .with_catalog(vec![/* ... */]);
//! let result = mock.translate(&request).await.unwrap();
//! assert_eq!(result, "hello_fr");
//! ```

use crate::engines::{EngineType, MTEngine, TranslationRequest};
use crate::error::{MtError, MtResult};
use crate::language::{LanguageCode, SupportedLanguage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Mock translation behaviors
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Append the target code: "hello" → "hello_fr"
    Suffix,

    /// Predefined (content, target code) → translation mappings,
    /// falling back to suffix behavior for unknown pairs
    Mappings(HashMap<(String, String), String>),

    /// Fail every call with a provider error
    Error(String),

    /// Return the input unchanged
    NoOp,
}

/// Deterministic [`MTEngine`] double
pub struct MockEngine {
    engine_type: EngineType,
    mode: MockMode,
    catalog: Vec<SupportedLanguage>,
    detected: Option<LanguageCode>,
    char_limit: usize,
    delay_ms: u64,
    fetch_calls: AtomicUsize,
    translate_calls: AtomicUsize,
}

impl MockEngine {
    /// Mock a provider of the given type; catalog starts empty
    pub fn new(engine_type: EngineType, mode: MockMode) -> Self {
        MockEngine {
            engine_type,
            mode,
            catalog: Vec::new(),
            detected: None,
            char_limit: 10_000,
            delay_ms: 0,
            fetch_calls: AtomicUsize::new(0),
            translate_calls: AtomicUsize::new(0),
        }
    }

    /// Languages this mock reports from its catalog endpoint
    pub fn with_catalog(mut self, catalog: Vec<SupportedLanguage>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Language code `detect_language` reports
    pub fn with_detected(mut self, code: &str) -> Self {
        self.detected = Some(code.to_string());
        self
    }

    pub fn with_char_limit(mut self, char_limit: usize) -> Self {
        self.char_limit = char_limit;
        self
    }

    /// Simulated network delay per call
    pub fn with_delay(mut self, delay_ms: u64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// How many times the catalog endpoint was queried
    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// How many translate calls reached the provider
    pub fn translate_count(&self) -> usize {
        self.translate_calls.load(Ordering::SeqCst)
    }

    async fn apply_delay(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }

    fn apply_translation(&self, content: &str, target: &str) -> MtResult<String> {
        match &self.mode {
            MockMode::Suffix => Ok(format!("{}_{}", content, target)),
            MockMode::Mappings(map) => {
                let key = (content.to_string(), target.to_string());
                Ok(map
                    .get(&key)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_{}", content, target)))
            }
            MockMode::Error(msg) => Err(MtError::Provider(msg.clone())),
            MockMode::NoOp => Ok(content.to_string()),
        }
    }
}

#[async_trait]
impl MTEngine for MockEngine {
    fn engine_type(&self) -> EngineType {
        self.engine_type
    }

    fn char_limit(&self) -> usize {
        self.char_limit
    }

    async fn translate(&self, request: &TranslationRequest) -> MtResult<String> {
        self.translate_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.apply_translation(&request.content, &request.target_language_code)
    }

    async fn detect_language(&self, _content: &str) -> MtResult<LanguageCode> {
        self.apply_delay().await;
        self.detected
            .clone()
            .ok_or_else(|| MtError::Provider("mock has no detection result configured".to_string()))
    }

    async fn fetch_supported_languages(&self) -> Vec<SupportedLanguage> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.apply_delay().await;
        self.catalog.clone()
    }
}
