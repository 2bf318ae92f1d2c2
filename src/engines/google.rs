//! Google Translate API v2 adapter
//!
//! Talks to `translation.googleapis.com/language/translate/v2` with an API
//! key passed as a query parameter.
//!
//! In text mode Google returns HTML-entity-escaped output (`&#39;` for an
//! apostrophe and friends) and does not strip it; the adapter unescapes the
//! basic entity set on the way back so callers get plain text. HTML requests
//! are passed through untouched, entities are meaningful there.

use crate::engines::{EngineType, MTEngine, TranslationRequest};
use crate::error::{MtError, MtResult};
use crate::language::{
    LanguageCode, SupportedLanguage, direction_of, normalize_language_code, validate_language_code,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

/// Maximum characters Google accepts in one translate call
const CHAR_LIMIT: usize = 30_000;

pub struct GoogleEngine {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
}

impl GoogleEngine {
    pub fn new(api_key: String) -> MtResult<Self> {
        if api_key.trim().is_empty() {
            return Err(MtError::Config("google API key cannot be empty".to_string()));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(GoogleEngine {
            api_key,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    fn keyed_url(&self, path: &str) -> String {
        format!("{}{}?key={}", self.base_url, path, self.api_key)
    }

    /// Undo Google's text-mode entity escaping
    fn unescape_entities(text: &str) -> String {
        text.replace("&#39;", "'")
            .replace("&quot;", "\"")
            .replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&amp;", "&")
    }

    fn map_api_error(body: &str, target: &str) -> MtError {
        #[derive(Deserialize)]
        struct ErrorBody {
            error: ErrorDetail,
        }
        #[derive(Deserialize)]
        struct ErrorDetail {
            code: u64,
            message: String,
        }
        match serde_json::from_str::<ErrorBody>(body) {
            // "Invalid Value" on a 400 is how v2 rejects a language code
            Ok(parsed) if parsed.error.code == 400 && parsed.error.message.contains("Invalid Value") => {
                MtError::unsupported(target)
            }
            Ok(parsed) => MtError::Provider(format!(
                "google error {}: {}",
                parsed.error.code, parsed.error.message
            )),
            Err(_) => MtError::Provider(format!("google error: {}", body)),
        }
    }
}

impl std::fmt::Debug for GoogleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleEngine")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MTEngine for GoogleEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Google
    }

    fn char_limit(&self) -> usize {
        CHAR_LIMIT
    }

    async fn translate(&self, request: &TranslationRequest) -> MtResult<String> {
        validate_language_code(&request.source_language_code)?;
        validate_language_code(&request.target_language_code)?;

        let format = if request.is_html { "html" } else { "text" };
        let body = json!({
            "q": [request.content],
            "source": request.source_language_code,
            "target": request.target_language_code,
            "format": format,
        });
        let response = self
            .client
            .post(self.keyed_url(""))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_api_error(&body, &request.target_language_code));
        }

        #[derive(Deserialize)]
        struct ResponseBody {
            data: ResponseData,
        }
        #[derive(Deserialize)]
        struct ResponseData {
            translations: Vec<Translation>,
        }
        #[derive(Deserialize)]
        struct Translation {
            #[serde(rename = "translatedText")]
            translated_text: String,
        }
        let parsed: ResponseBody = response
            .json()
            .await
            .map_err(|e| MtError::Provider(format!("malformed google response: {}", e)))?;
        let translated = parsed
            .data
            .translations
            .into_iter()
            .next()
            .map(|t| t.translated_text)
            .ok_or_else(|| {
                MtError::Provider("google response contained no translation".to_string())
            })?;

        if request.is_html {
            Ok(translated)
        } else {
            Ok(Self::unescape_entities(&translated))
        }
    }

    async fn detect_language(&self, content: &str) -> MtResult<LanguageCode> {
        let response = self
            .client
            .post(self.keyed_url("/detect"))
            .json(&json!({ "q": [content] }))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MtError::Provider(format!("google detect error: {}", body)));
        }

        #[derive(Deserialize)]
        struct ResponseBody {
            data: ResponseData,
        }
        #[derive(Deserialize)]
        struct ResponseData {
            detections: Vec<Vec<Detection>>,
        }
        #[derive(Deserialize)]
        struct Detection {
            language: String,
        }
        let parsed: ResponseBody = response
            .json()
            .await
            .map_err(|e| MtError::Provider(format!("malformed google detect response: {}", e)))?;
        parsed
            .data
            .detections
            .into_iter()
            .flatten()
            .next()
            .map(|d| normalize_language_code(&d.language))
            .ok_or_else(|| MtError::Provider("google detect returned no result".to_string()))
    }

    async fn fetch_supported_languages(&self) -> Vec<SupportedLanguage> {
        #[derive(Deserialize)]
        struct ResponseBody {
            data: ResponseData,
        }
        #[derive(Deserialize)]
        struct ResponseData {
            languages: Vec<Entry>,
        }
        #[derive(Deserialize)]
        struct Entry {
            language: String,
            name: String,
        }

        let result = self
            .client
            .get(format!("{}/languages?key={}&target=en", self.base_url, self.api_key))
            .send()
            .await;
        let parsed: Result<ResponseBody, String> = match result {
            Ok(response) if response.status().is_success() => {
                response.json().await.map_err(|e| e.to_string())
            }
            Ok(response) => Err(format!("http {}", response.status())),
            Err(e) => Err(e.to_string()),
        };
        match parsed {
            Ok(body) => body
                .data
                .languages
                .into_iter()
                .map(|entry| {
                    let code = normalize_language_code(&entry.language);
                    let direction = direction_of(&code);
                    SupportedLanguage {
                        code,
                        // v2 reports one display name; reuse it as the native name
                        native_name: entry.name.clone(),
                        name: entry.name,
                        direction,
                    }
                })
                .collect(),
            Err(err) => {
                tracing::error!(engine = "google", error = %err, "failed to fetch supported languages");
                Vec::new()
            }
        }
    }
}
