//! Azure Translator (Cognitive Services) v3 adapter
//!
//! Talks to `api.cognitive.microsofttranslator.com` using the v3 REST API.
//! Authentication is a subscription key in the `Ocp-Apim-Subscription-Key`
//! header, plus a region header for regional resources.
//!
//! Azure reports script-qualified catalog codes (`zh-Hans`, `sr-Cyrl`); these
//! are normalized into the engine's canonical form on the way in.

use crate::engines::{EngineType, MTEngine, TranslationRequest};
use crate::error::{MtError, MtResult};
use crate::language::{
    LanguageCode, SupportedLanguage, TextDirection, normalize_language_code,
    validate_language_code,
};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

const BASE_URL: &str = "https://api.cognitive.microsofttranslator.com";
const API_VERSION: &str = "3.0";

/// Maximum characters Azure accepts in one translate call
const CHAR_LIMIT: usize = 50_000;

/// Azure error codes for a rejected source / target language
const ERR_INVALID_SOURCE: u64 = 400035;
const ERR_INVALID_TARGET: u64 = 400036;

pub struct AzureEngine {
    subscription_key: String,
    region: Option<String>,
    client: reqwest::Client,
    base_url: String,
}

impl AzureEngine {
    pub fn new(subscription_key: String, region: Option<String>) -> MtResult<Self> {
        if subscription_key.trim().is_empty() {
            return Err(MtError::Config(
                "azure subscription key cannot be empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MtError::Config(format!("failed to create HTTP client: {}", e)))?;
        Ok(AzureEngine {
            subscription_key,
            region,
            client,
            base_url: BASE_URL.to_string(),
        })
    }

    fn authed_post(&self, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .query(&[("api-version", API_VERSION)])
            .header("Ocp-Apim-Subscription-Key", &self.subscription_key);
        if let Some(region) = &self.region {
            builder = builder.header("Ocp-Apim-Subscription-Region", region);
        }
        builder
    }

    fn map_api_error(body: &str, source: &str, target: &str) -> MtError {
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
            Ok(parsed) if parsed.error.code == ERR_INVALID_SOURCE => MtError::unsupported(source),
            Ok(parsed) if parsed.error.code == ERR_INVALID_TARGET => MtError::unsupported(target),
            Ok(parsed) => MtError::Provider(format!(
                "azure error {}: {}",
                parsed.error.code, parsed.error.message
            )),
            Err(_) => MtError::Provider(format!("azure error: {}", body)),
        }
    }
}

impl std::fmt::Debug for AzureEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureEngine")
            .field("subscription_key", &"***")
            .field("region", &self.region)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl MTEngine for AzureEngine {
    fn engine_type(&self) -> EngineType {
        EngineType::Azure
    }

    fn char_limit(&self) -> usize {
        CHAR_LIMIT
    }

    async fn translate(&self, request: &TranslationRequest) -> MtResult<String> {
        validate_language_code(&request.source_language_code)?;
        validate_language_code(&request.target_language_code)?;

        let text_type = if request.is_html { "html" } else { "plain" };
        let response = self
            .authed_post("/translate")
            .query(&[
                ("from", request.source_language_code.as_str()),
                ("to", request.target_language_code.as_str()),
                ("textType", text_type),
            ])
            .json(&json!([{ "Text": request.content }]))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Self::map_api_error(
                &body,
                &request.source_language_code,
                &request.target_language_code,
            ));
        }

        #[derive(Deserialize)]
        struct Item {
            translations: Vec<Translation>,
        }
        #[derive(Deserialize)]
        struct Translation {
            text: String,
        }
        let items: Vec<Item> = response
            .json()
            .await
            .map_err(|e| MtError::Provider(format!("malformed azure response: {}", e)))?;
        items
            .into_iter()
            .next()
            .and_then(|item| item.translations.into_iter().next())
            .map(|t| t.text)
            .ok_or_else(|| MtError::Provider("azure response contained no translation".to_string()))
    }

    async fn detect_language(&self, content: &str) -> MtResult<LanguageCode> {
        let response = self
            .authed_post("/detect")
            .json(&json!([{ "Text": content }]))
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MtError::Provider(format!("azure detect error: {}", body)));
        }

        #[derive(Deserialize)]
        struct Detection {
            language: String,
        }
        let detections: Vec<Detection> = response
            .json()
            .await
            .map_err(|e| MtError::Provider(format!("malformed azure detect response: {}", e)))?;
        detections
            .into_iter()
            .next()
            .map(|d| normalize_language_code(&d.language))
            .ok_or_else(|| MtError::Provider("azure detect returned no result".to_string()))
    }

    async fn fetch_supported_languages(&self) -> Vec<SupportedLanguage> {
        // The languages endpoint is unauthenticated
        let result = self
            .client
            .get(format!("{}/languages", self.base_url))
            .query(&[("api-version", API_VERSION), ("scope", "translation")])
            .send()
            .await;

        #[derive(Deserialize)]
        struct Catalog {
            translation: HashMap<String, Entry>,
        }
        #[derive(Deserialize)]
        struct Entry {
            name: String,
            #[serde(rename = "nativeName")]
            native_name: String,
            dir: String,
        }

        let catalog: Result<Catalog, String> = match result {
            Ok(response) if response.status().is_success() => {
                response.json().await.map_err(|e| e.to_string())
            }
            Ok(response) => Err(format!("http {}", response.status())),
            Err(e) => Err(e.to_string()),
        };
        match catalog {
            Ok(catalog) => catalog
                .translation
                .into_iter()
                .map(|(code, entry)| SupportedLanguage {
                    code: normalize_language_code(&code),
                    name: entry.name,
                    native_name: entry.native_name,
                    direction: if entry.dir == "rtl" {
                        TextDirection::Rtl
                    } else {
                        TextDirection::Ltr
                    },
                })
                .collect(),
            Err(err) => {
                tracing::error!(engine = "azure", error = %err, "failed to fetch supported languages");
                Vec::new()
            }
        }
    }
}
