//! DeepL API v2 adapter
//!
//! Talks to `api.deepl.com/v2` (or `api-free.deepl.com` for free-tier keys,
//! recognized by their `:fx` suffix) with a `DeepL-Auth-Key` authorization
//! header and form-encoded requests.
//!
//! DeepL quirks handled here:
//!
//! - catalog codes arrive uppercase (`EN-GB`) and are normalized
//! - there is no standalone detection endpoint; `detect_language` issues a
//!   translate call with the source left unset and reads the
//!   `detected_source_language` field of the response
//! - HTML payloads go out with `tag_handling=xml` so markup survives

use crate::engines::{EngineType, MTEngine, TranslationRequest};
use crate::error::{MtError, MtResult};
use crate::language::{
    LanguageCode, SupportedLanguage, direction_of, normalize_language_code, validate_language_code,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const BASE_URL: &str = "https://api.deepl.com/v2";
const FREE_BASE_URL: &str = "https://api-free.deepl.com/v2";

/// Maximum characters DeepL accepts in one translate call
const CHAR_LIMIT: usize = 100_000;

pub struct DeeplEngine {
    auth_key: String,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<DeeplTranslation>,
}

#[derive(Deserialize)]
struct DeeplTranslation {
    detected_source_language: Option<String>,
    text: String,
}

impl DeeplEngine {
    pub fn new(auth_key: String) -> MtResult<Self> {
        if auth_key.trim().is_empty() {
            return Err(MtError::Config("deepl auth key cannot be empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::Config(format!("failed to create HTTP client: {}", e)))?;
        // Free-tier keys carry an ":fx" suffix and live on a separate host
        let base_url = if auth_key.ends_with(":fx") {
            FREE_BASE_URL
        } else {
            BASE_URL
        };
        Ok(DeeplEngine {
            auth_key,
            client,
            base_url: base_url.to_string(),
        })
    }

    fn authed_post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.auth_key))
    }

    fn map_api_error(body: &str, source: &str, target: &str) -> MtError {
        #[derive(Deserialize)]
        struct ErrorBody {
            message: String,
        }
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) if parsed.message.contains("source_lang") => MtError::unsupported(source),
            Ok(parsed) if parsed.message.contains("target_lang") => MtError::unsupported(target),
            Ok(parsed) => MtError::Provider(format!("deepl error: {}", parsed.message)),
            Err(_) => MtError::Provider(format!("deepl error: {}", body)),
        }
    }

    async fn call_translate(
        &self,
        content: &str,
        source: Option<&str>,
        target: &str,
        is_html: bool,
    ) -> MtResult<DeeplTranslation> {
        let mut form: Vec<(&str, String)> = vec![
            ("text", content.to_string()),
            ("target_lang", target.to_uppercase()),
        ];
        if let Some(source) = source {
            form.push(("source_lang", source.to_uppercase()));
        }
        if is_html {
            form.push(("tag_handling", "xml".to_string()));
        }
        let response = self.authed_post("/translate").form(&form).send().await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_api_error(&body, source.unwrap_or(""), target));
        }
        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| MtError::Provider(format!("malformed deepl response: {}", e)))?;
        parsed
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| MtError::Provider("deepl response contained no translation".to_string()))
    }
}

impl std::fmt::Debug for DeeplEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeeplEngine")
            .field("auth_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MTEngine for DeeplEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Deepl
    }

    fn char_limit(&self) -> usize {
        CHAR_LIMIT
    }

    async fn translate(&self, request: &TranslationRequest) -> MtResult<String> {
        validate_language_code(&request.source_language_code)?;
        validate_language_code(&request.target_language_code)?;
        let translation = self
            .call_translate(
                &request.content,
                Some(&request.source_language_code),
                &request.target_language_code,
                request.is_html,
            )
            .await?;
        Ok(translation.text)
    }

    async fn detect_language(&self, content: &str) -> MtResult<LanguageCode> {
        // No detect endpoint: translate to English with the source unset and
        // read what DeepL says it detected
        let translation = self.call_translate(content, None, "en", false).await?;
        translation
            .detected_source_language
            .map(|code| normalize_language_code(&code))
            .ok_or_else(|| MtError::Provider("deepl reported no detected language".to_string()))
    }

    async fn fetch_supported_languages(&self) -> Vec<SupportedLanguage> {
        #[derive(Deserialize)]
        struct Entry {
            language: String,
            name: String,
        }

        let result = self
            .authed_post("/languages")
            .form(&[("type", "target")])
            .send()
            .await;
        let parsed: Result<Vec<Entry>, String> = match result {
            Ok(response) if response.status().is_success() => {
                response.json().await.map_err(|e| e.to_string())
            }
            Ok(response) => Err(format!("http {}", response.status())),
            Err(e) => Err(e.to_string()),
        };
        match parsed {
            Ok(entries) => entries
                .into_iter()
                .map(|entry| {
                    let code = normalize_language_code(&entry.language);
                    let direction = direction_of(&code);
                    SupportedLanguage {
                        code,
                        native_name: entry.name.clone(),
                        name: entry.name,
                        direction,
                    }
                })
                .collect(),
            Err(err) => {
                tracing::error!(engine = "deepl", error = %err, "failed to fetch supported languages");
                Vec::new()
            }
        }
    }
}
