//! The translation orchestrator
//!
//! [`Translator`] holds the ordered list of engine adapters and exposes the
//! single public translation contract used by the rest of the system. It
//! resolves auto-detect sources, selects a capable engine for a language pair
//! (strict first, then lenient with base-language rewriting), splits oversized
//! HTML payloads across concurrent provider calls, and aggregates the
//! supported-language catalogs of all engines.
//!
//! A `Translator` is immutable: preference ordering produces a new instance,
//! and each `translate` call is a pure request/response operation over the
//! already-sorted engine list.
//!
//! # Example
//!
//! ```ignore
//! use mt_hub::config::MtHubConfig;
//! use mt_hub::orchestrator::Translator;
//!
//! let translator = Translator::from_config(&MtHubConfig::from_env(), None)?;
//! let ordered = translator.with_preferred_engine("nl", "en", &preferences);
//! let result = ordered.translate("<p>Hallo</p>", "nl", "en", true, None).await?;
//! ```

use crate::chunker::{HtmlChunker, TagBoundaryChunker};
use crate::config::MtHubConfig;
use crate::engines::azure::AzureEngine;
use crate::engines::deepl::DeeplEngine;
use crate::engines::google::GoogleEngine;
use crate::engines::{Engine, EngineType, TranslationRequest};
use crate::error::{MtError, MtResult};
use crate::language::{LanguageCode, SupportedLanguage, UNDEFINED_LANG};
use crate::preferences::{AccountMtPreferences, apply_pair_override, sort_by_general_order};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Headroom subtracted from an engine's char limit when splitting, reserving
/// room for translation expansion and encoding overhead
const CHUNK_HEADROOM: usize = 1000;

/// An engine able to serve a language pair, with the codes to call it with
///
/// The codes may differ from what the caller asked for: under a lenient match
/// an engine that only knows `en` serves a request for `en-gb`, and the
/// provider call must use `en`.
struct SupportedEngine {
    engine: Engine,
    codes: Vec<LanguageCode>,
}

/// Orchestrates translation across an ordered list of engines
#[derive(Clone)]
pub struct Translator {
    engines: Vec<Engine>,
    chunker: Arc<dyn HtmlChunker>,
}

impl Translator {
    pub fn new(engines: Vec<Engine>) -> Self {
        Translator {
            engines,
            chunker: Arc::new(TagBoundaryChunker::new()),
        }
    }

    /// Replace the HTML chunking collaborator
    pub fn with_chunker(mut self, chunker: Arc<dyn HtmlChunker>) -> Self {
        self.chunker = chunker;
        self
    }

    /// Build the engine list from configuration, in fixed Azure, Google,
    /// DeepL order; account preferences rearrange it per call
    pub fn from_config(
        config: &MtHubConfig,
        cache: Option<crate::cache::LanguageCache>,
    ) -> MtResult<Self> {
        if !config.has_any_provider() {
            return Err(MtError::Config(
                "no translation provider configured".to_string(),
            ));
        }
        let mut engines: Vec<Engine> = Vec::new();
        if let Some(azure) = &config.azure {
            engines.push(Engine::new(
                Arc::new(AzureEngine::new(
                    azure.subscription_key.clone(),
                    azure.region.clone(),
                )?),
                cache.clone(),
            ));
        }
        if let Some(google) = &config.google {
            engines.push(Engine::new(
                Arc::new(GoogleEngine::new(google.api_key.clone())?),
                cache.clone(),
            ));
        }
        if let Some(deepl) = &config.deepl {
            engines.push(Engine::new(
                Arc::new(DeeplEngine::new(deepl.auth_key.clone())?),
                cache.clone(),
            ));
        }
        Ok(Translator::new(engines))
    }

    /// Current engine ordering
    pub fn engines(&self) -> &[Engine] {
        &self.engines
    }

    /// A new translator with the same engines re-sorted by account preference
    ///
    /// Does not mutate `self`. The sort is stable and two-pass: general order
    /// first, then the pair override (which outranks the general order) moves
    /// its engine to the front.
    pub fn with_preferred_engine(
        &self,
        source_language_code: &str,
        target_language_code: &str,
        preferences: &AccountMtPreferences,
    ) -> Translator {
        let mut engines = self.engines.clone();
        sort_by_general_order(&mut engines, preferences.general_order.as_deref());
        apply_pair_override(
            &mut engines,
            preferences.pair_override(source_language_code, target_language_code),
        );
        Translator {
            engines,
            chunker: self.chunker.clone(),
        }
    }

    /// Translate `content` between two language codes
    ///
    /// Identity pairs short-circuit without a network call. A source of
    /// [`UNDEFINED_LANG`] is resolved through [`Self::detect_language`] first.
    /// Fails with [`MtError::UnsupportedLanguage`] when no engine supports the
    /// pair even after the lenient retry.
    pub async fn translate(
        &self,
        content: &str,
        source_language_code: &str,
        target_language_code: &str,
        is_html: bool,
        interface_language: Option<&str>,
    ) -> MtResult<String> {
        if source_language_code == target_language_code {
            return Ok(content.to_string());
        }
        let source = self
            .maybe_detect_language_code(source_language_code, content)
            .await?;
        let codes = [source, target_language_code.to_string()];
        let selected = self
            .select_supported_engine(&codes, interface_language)
            .await?;
        let request = TranslationRequest {
            content: content.to_string(),
            source_language_code: selected.codes[0].clone(),
            target_language_code: selected.codes[1].clone(),
            is_html,
        };
        self.translate_with_engine(&selected.engine, request).await
    }

    /// Like [`Self::translate`], but silently retargets to English when the
    /// desired target language is unsupported by every engine
    pub async fn translate_with_fallback_to_english(
        &self,
        content: &str,
        source_language_code: &str,
        target_language_code: &str,
        is_html: bool,
        interface_language: Option<&str>,
    ) -> MtResult<String> {
        let target = if self.is_language_supported(target_language_code).await {
            target_language_code
        } else {
            "en"
        };
        self.translate(
            content,
            source_language_code,
            target,
            is_html,
            interface_language,
        )
        .await
    }

    /// Detect the language of `content`
    ///
    /// Queries only the first engine in the current ordering; it does not poll
    /// multiple engines or vote across them.
    pub async fn detect_language(&self, content: &str) -> MtResult<LanguageCode> {
        let engine = self.engines.first().ok_or_else(|| {
            MtError::Config("no translation engines configured".to_string())
        })?;
        engine.detect_language(content).await
    }

    /// Union of every engine's catalog, deduplicated per language code
    ///
    /// When several engines report the same code, the entry from the engine
    /// appearing first in the current ordering wins.
    pub async fn get_supported_languages(&self, skip_cache: bool) -> Vec<SupportedLanguage> {
        let mut merged = Vec::new();
        let mut seen: HashSet<LanguageCode> = HashSet::new();
        for catalog in self.fetch_all_catalogs(skip_cache).await {
            for language in catalog {
                if seen.insert(language.code.clone()) {
                    merged.push(language);
                }
            }
        }
        merged
    }

    /// Diagnostic per-engine view of supported language codes, not deduplicated
    pub async fn get_supported_languages_by_engine(
        &self,
        skip_cache: bool,
    ) -> HashMap<EngineType, Vec<LanguageCode>> {
        let catalogs = self.fetch_all_catalogs(skip_cache).await;
        self.engines
            .iter()
            .zip(catalogs)
            .map(|(engine, catalog)| {
                (
                    engine.engine_type(),
                    catalog.into_iter().map(|l| l.code).collect(),
                )
            })
            .collect()
    }

    /// Whether any engine supports the code, leniently
    pub async fn is_language_supported(&self, language_code: &str) -> bool {
        for engine in &self.engines {
            if engine.has_support_for(language_code, false).await.is_some() {
                return true;
            }
        }
        false
    }

    async fn maybe_detect_language_code(
        &self,
        language_code: &str,
        content: &str,
    ) -> MtResult<LanguageCode> {
        if language_code != UNDEFINED_LANG {
            return Ok(language_code.to_string());
        }
        self.detect_language(content).await
    }

    /// Every engine's catalog, fetched concurrently, in engine order
    async fn fetch_all_catalogs(&self, skip_cache: bool) -> Vec<Vec<SupportedLanguage>> {
        let handles: Vec<_> = self
            .engines
            .iter()
            .map(|engine| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.supported_languages(skip_cache).await })
            })
            .collect();
        let mut catalogs = Vec::with_capacity(handles.len());
        for handle in handles {
            catalogs.push(handle.await.unwrap_or_default());
        }
        catalogs
    }

    /// Pick the first engine supporting every code in `codes`
    ///
    /// Scans the engine list under strict matching first; when that fails,
    /// rescans leniently so base-language rewrites can satisfy the pair. The
    /// returned codes are the (possibly rewritten) ones the engine must be
    /// called with.
    async fn select_supported_engine(
        &self,
        codes: &[LanguageCode],
        interface_language: Option<&str>,
    ) -> MtResult<SupportedEngine> {
        for strict in [true, false] {
            for engine in &self.engines {
                let mut rewritten = Vec::with_capacity(codes.len());
                for code in codes {
                    match engine.has_support_for(code, strict).await {
                        Some(supported) => rewritten.push(supported),
                        None => break,
                    }
                }
                if rewritten.len() == codes.len() {
                    return Ok(SupportedEngine {
                        engine: engine.clone(),
                        codes: rewritten,
                    });
                }
            }
        }
        Err(self
            .build_unsupported_language_error(codes, interface_language)
            .await)
    }

    /// List every requested code that no engine supports even leniently
    async fn build_unsupported_language_error(
        &self,
        codes: &[LanguageCode],
        interface_language: Option<&str>,
    ) -> MtError {
        let mut unsupported = Vec::new();
        for code in codes {
            if !self.is_language_supported(code).await {
                unsupported.push(code.clone());
            }
        }
        MtError::UnsupportedLanguage {
            codes: unsupported,
            interface_language: interface_language.map(|l| l.to_string()),
        }
    }

    /// Char-limit-aware dispatch to one engine
    ///
    /// Non-HTML requests and requests under the engine's limit go out as one
    /// call. Oversized HTML is split into chunks, translated concurrently, and
    /// merged in original order; one failed chunk fails the whole request.
    async fn translate_with_engine(
        &self,
        engine: &Engine,
        request: TranslationRequest,
    ) -> MtResult<String> {
        let limit = engine.char_limit();
        if !request.is_html || request.content.len() < limit {
            return engine.translate(&request).await;
        }

        let chunks = self.chunker.split(&request.content, limit - CHUNK_HEADROOM);
        let handles: Vec<_> = chunks
            .into_iter()
            .map(|chunk| {
                let engine = engine.clone();
                let chunk_request = TranslationRequest {
                    content: chunk,
                    ..request.clone()
                };
                tokio::spawn(async move { engine.translate(&chunk_request).await })
            })
            .collect();

        let mut translated = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = handle
                .await
                .map_err(|e| MtError::Provider(format!("chunk translation task failed: {}", e)))?;
            translated.push(result?);
        }
        Ok(self.chunker.merge(&translated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GoogleConfig;
    use crate::engines::mock::{MockEngine, MockMode};
    use crate::language::{SupportedLanguage, TextDirection};

    fn lang(code: &str) -> SupportedLanguage {
        SupportedLanguage::new(code, code, code, TextDirection::Ltr)
    }

    fn named_lang(code: &str, name: &str) -> SupportedLanguage {
        SupportedLanguage::new(code, name, name, TextDirection::Ltr)
    }

    fn engine_of(mock: MockEngine) -> (Arc<MockEngine>, Engine) {
        let mock = Arc::new(mock);
        (mock.clone(), Engine::new(mock, None))
    }

    // ========== Identity Tests ==========

    #[tokio::test]
    async fn test_identity_pair_returns_content_without_network() {
        let (mock, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix).with_catalog(vec![lang("en")]),
        );
        let translator = Translator::new(vec![engine]);

        let result = translator
            .translate("Hello", "en", "en", false, None)
            .await
            .unwrap();
        assert_eq!(result, "Hello");
        assert_eq!(mock.translate_count(), 0);
        assert_eq!(mock.fetch_count(), 0);
    }

    // ========== Selection Tests ==========

    #[tokio::test]
    async fn test_first_capable_engine_is_selected() {
        let (first, e1) = engine_of(
            MockEngine::new(EngineType::Azure, MockMode::NoOp).with_catalog(vec![lang("de")]),
        );
        let (second, e2) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_catalog(vec![lang("en"), lang("fr")]),
        );
        let translator = Translator::new(vec![e1, e2]);

        let result = translator
            .translate("hello", "en", "fr", false, None)
            .await
            .unwrap();
        assert_eq!(result, "hello_fr");
        assert_eq!(first.translate_count(), 0);
        assert_eq!(second.translate_count(), 1);
    }

    #[tokio::test]
    async fn test_lenient_pass_rewrites_to_base_language() {
        let (_, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_catalog(vec![lang("en"), lang("fr")]),
        );
        let translator = Translator::new(vec![engine]);

        // No engine knows "fr-ca"; the lenient pass serves it as "fr",
        // and the provider call must use the rewritten code
        let result = translator
            .translate("hello", "en", "fr-ca", false, None)
            .await
            .unwrap();
        assert_eq!(result, "hello_fr");
    }

    #[tokio::test]
    async fn test_strict_match_wins_over_lenient_candidate() {
        // The first engine only covers the base language; the second covers
        // the exact dialect and must win the strict pass
        let (lenient_only, e1) = engine_of(
            MockEngine::new(EngineType::Azure, MockMode::NoOp)
                .with_catalog(vec![lang("en"), lang("pt")]),
        );
        let (_, e2) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_catalog(vec![lang("en"), lang("pt-br")]),
        );
        let translator = Translator::new(vec![e1, e2]);

        let result = translator
            .translate("hello", "en", "pt-br", false, None)
            .await
            .unwrap();
        assert_eq!(result, "hello_pt-br");
        assert_eq!(lenient_only.translate_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_pair_lists_failing_codes() {
        let (_, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix).with_catalog(vec![lang("en")]),
        );
        let translator = Translator::new(vec![engine]);

        let err = translator
            .translate("hello", "en", "tlh", false, Some("nl"))
            .await
            .unwrap_err();
        match err {
            MtError::UnsupportedLanguage {
                codes,
                interface_language,
            } => {
                assert_eq!(codes, vec!["tlh"]);
                assert_eq!(interface_language.as_deref(), Some("nl"));
            }
            other => panic!("Expected UnsupportedLanguage, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_selection_is_deterministic() {
        let (_, e1) = engine_of(
            MockEngine::new(EngineType::Azure, MockMode::Suffix)
                .with_catalog(vec![lang("en"), lang("fr")]),
        );
        let (_, e2) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::NoOp)
                .with_catalog(vec![lang("en"), lang("fr")]),
        );
        let translator = Translator::new(vec![e1, e2]);

        for _ in 0..3 {
            let result = translator
                .translate("hello", "en", "fr", false, None)
                .await
                .unwrap();
            assert_eq!(result, "hello_fr");
        }
    }

    // ========== Detection Tests ==========

    #[tokio::test]
    async fn test_undefined_source_is_detected_first() {
        let (_, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_detected("nl")
                .with_catalog(vec![lang("nl"), lang("en")]),
        );
        let translator = Translator::new(vec![engine]);

        let result = translator
            .translate("hallo wereld", UNDEFINED_LANG, "en", false, None)
            .await
            .unwrap();
        assert_eq!(result, "hallo wereld_en");
    }

    #[tokio::test]
    async fn test_detect_queries_first_engine_only() {
        let (_, e1) = engine_of(
            MockEngine::new(EngineType::Azure, MockMode::Suffix).with_detected("nl"),
        );
        let (_, e2) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix).with_detected("de"),
        );
        let translator = Translator::new(vec![e1, e2]);

        assert_eq!(translator.detect_language("hallo").await.unwrap(), "nl");
    }

    #[tokio::test]
    async fn test_detect_without_engines_fails() {
        let translator = Translator::new(vec![]);
        assert!(matches!(
            translator.detect_language("hello").await,
            Err(MtError::Config(_))
        ));
    }

    // ========== Preference Ordering Tests ==========

    fn three_engine_translator() -> Translator {
        let (_, deepl) = engine_of(MockEngine::new(EngineType::Deepl, MockMode::Suffix));
        let (_, azure) = engine_of(MockEngine::new(EngineType::Azure, MockMode::Suffix));
        let (_, google) = engine_of(MockEngine::new(EngineType::Google, MockMode::Suffix));
        Translator::new(vec![deepl, azure, google])
    }

    fn types(translator: &Translator) -> Vec<EngineType> {
        translator.engines().iter().map(|e| e.engine_type()).collect()
    }

    #[tokio::test]
    async fn test_general_order_preference() {
        let translator = three_engine_translator();
        let preferences = AccountMtPreferences {
            general_order: Some(vec![
                EngineType::Google,
                EngineType::Deepl,
                EngineType::Azure,
            ]),
            pairs: None,
        };
        let sorted = translator.with_preferred_engine("nl", "en", &preferences);
        assert_eq!(
            types(&sorted),
            vec![EngineType::Google, EngineType::Deepl, EngineType::Azure]
        );
        // The original instance is untouched
        assert_eq!(
            types(&translator),
            vec![EngineType::Deepl, EngineType::Azure, EngineType::Google]
        );
    }

    #[tokio::test]
    async fn test_pair_override_outranks_general_order() {
        let translator = three_engine_translator();
        let preferences = AccountMtPreferences {
            general_order: Some(vec![
                EngineType::Deepl,
                EngineType::Azure,
                EngineType::Google,
            ]),
            pairs: Some(
                [("nl:en".to_string(), EngineType::Google)]
                    .into_iter()
                    .collect(),
            ),
        };
        let sorted = translator.with_preferred_engine("nl", "en", &preferences);
        assert_eq!(types(&sorted)[0], EngineType::Google);
        // A different pair keeps the general order
        let other = translator.with_preferred_engine("fr", "de", &preferences);
        assert_eq!(types(&other)[0], EngineType::Deepl);
    }

    // ========== Catalog Aggregation Tests ==========

    #[tokio::test]
    async fn test_catalog_dedup_first_engine_wins() {
        let (_, e1) = engine_of(
            MockEngine::new(EngineType::Azure, MockMode::Suffix)
                .with_catalog(vec![named_lang("fr", "French")]),
        );
        let (_, e2) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_catalog(vec![named_lang("fr", "français"), named_lang("de", "German")]),
        );
        let translator = Translator::new(vec![e1, e2]);

        let languages = translator.get_supported_languages(false).await;
        assert_eq!(languages.len(), 2);
        let fr = languages.iter().find(|l| l.code == "fr").unwrap();
        assert_eq!(fr.name, "French");
    }

    #[tokio::test]
    async fn test_by_engine_view_is_not_deduplicated() {
        let (_, e1) = engine_of(
            MockEngine::new(EngineType::Azure, MockMode::Suffix).with_catalog(vec![lang("fr")]),
        );
        let (_, e2) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_catalog(vec![lang("fr"), lang("de")]),
        );
        let translator = Translator::new(vec![e1, e2]);

        let by_engine = translator.get_supported_languages_by_engine(false).await;
        assert_eq!(by_engine[&EngineType::Azure], vec!["fr"]);
        assert_eq!(by_engine[&EngineType::Google], vec!["fr", "de"]);
    }

    // ========== English Fallback Tests ==========

    #[tokio::test]
    async fn test_fallback_retargets_to_english() {
        let (_, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_catalog(vec![lang("en"), lang("nl")]),
        );
        let translator = Translator::new(vec![engine]);

        let result = translator
            .translate_with_fallback_to_english("hallo", "nl", "tlh", false, None)
            .await
            .unwrap();
        assert_eq!(result, "hallo_en");
    }

    #[tokio::test]
    async fn test_fallback_keeps_supported_target() {
        let (_, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Suffix)
                .with_catalog(vec![lang("en"), lang("nl"), lang("fr")]),
        );
        let translator = Translator::new(vec![engine]);

        let result = translator
            .translate_with_fallback_to_english("hallo", "nl", "fr", false, None)
            .await
            .unwrap();
        assert_eq!(result, "hallo_fr");
    }

    // ========== Chunked Dispatch Tests ==========

    #[tokio::test]
    async fn test_oversized_html_is_chunked_and_merged_in_order() {
        let (mock, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::NoOp)
                .with_char_limit(CHUNK_HEADROOM + 40)
                .with_catalog(vec![lang("en"), lang("fr")]),
        );
        let content: String = (0..100).map(|i| format!("<p>paragraph {}</p>", i)).collect();
        assert!(content.len() >= CHUNK_HEADROOM + 40);
        let translator = Translator::new(vec![engine]);

        let result = translator
            .translate(&content, "en", "fr", true, None)
            .await
            .unwrap();
        // NoOp chunks concatenated back in order reproduce the input
        assert_eq!(result, content);
        assert!(mock.translate_count() > 1);
    }

    #[tokio::test]
    async fn test_non_html_over_limit_goes_out_as_one_call() {
        let (mock, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::NoOp)
                .with_char_limit(CHUNK_HEADROOM + 40)
                .with_catalog(vec![lang("en"), lang("fr")]),
        );
        let content = "x".repeat(CHUNK_HEADROOM + 100);
        let translator = Translator::new(vec![engine]);

        translator
            .translate(&content, "en", "fr", false, None)
            .await
            .unwrap();
        assert_eq!(mock.translate_count(), 1);
    }

    #[tokio::test]
    async fn test_one_failing_chunk_fails_the_request() {
        let (mock, engine) = engine_of(
            MockEngine::new(EngineType::Google, MockMode::Error("boom".to_string()))
                .with_char_limit(CHUNK_HEADROOM + 40)
                .with_catalog(vec![lang("en"), lang("fr")]),
        );
        let content: String = (0..100).map(|i| format!("<p>paragraph {}</p>", i)).collect();
        assert!(content.len() >= CHUNK_HEADROOM + 40);
        let translator = Translator::new(vec![engine]);

        let result = translator.translate(&content, "en", "fr", true, None).await;
        assert!(matches!(result, Err(MtError::Provider(_))));
        assert!(mock.translate_count() > 1);
    }

    // ========== Construction Tests ==========

    #[test]
    fn test_from_config_without_providers_fails() {
        let result = Translator::from_config(&MtHubConfig::default(), None);
        assert!(matches!(result, Err(MtError::Config(_))));
    }

    #[test]
    fn test_from_config_builds_engines_in_fixed_order() {
        let config = MtHubConfig {
            azure: Some(crate::config::AzureConfig {
                subscription_key: "azure-key".to_string(),
                region: None,
            }),
            google: Some(GoogleConfig {
                api_key: "google-key".to_string(),
            }),
            deepl: Some(crate::config::DeeplConfig {
                auth_key: "deepl-key".to_string(),
            }),
        };
        let translator = Translator::from_config(&config, None).unwrap();
        assert_eq!(
            types(&translator),
            vec![EngineType::Azure, EngineType::Google, EngineType::Deepl]
        );
    }
}
