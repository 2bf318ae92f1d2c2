//! Provider configuration
//!
//! Each provider is configured independently; only the ones with credentials
//! present become engines. `from_env` reads the conventional environment
//! variables, but the structs can also be built directly or deserialized from
//! a config file.

use serde::{Deserialize, Serialize};

/// Azure Translator credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureConfig {
    pub subscription_key: String,
    /// Required for regional Cognitive Services resources
    pub region: Option<String>,
}

/// Google Translate v2 credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    pub api_key: String,
}

/// DeepL API credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeeplConfig {
    pub auth_key: String,
}

/// Top-level configuration: one optional block per provider
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MtHubConfig {
    pub azure: Option<AzureConfig>,
    pub google: Option<GoogleConfig>,
    pub deepl: Option<DeeplConfig>,
}

impl MtHubConfig {
    /// Build the configuration from environment variables
    ///
    /// Reads `AZURE_TRANSLATOR_KEY` (with optional `AZURE_TRANSLATOR_REGION`),
    /// `GOOGLE_TRANSLATE_API_KEY` and `DEEPL_AUTH_KEY`. Unset or empty
    /// variables leave the corresponding provider unconfigured.
    pub fn from_env() -> Self {
        MtHubConfig {
            azure: non_empty_env("AZURE_TRANSLATOR_KEY").map(|subscription_key| AzureConfig {
                subscription_key,
                region: non_empty_env("AZURE_TRANSLATOR_REGION"),
            }),
            google: non_empty_env("GOOGLE_TRANSLATE_API_KEY")
                .map(|api_key| GoogleConfig { api_key }),
            deepl: non_empty_env("DEEPL_AUTH_KEY").map(|auth_key| DeeplConfig { auth_key }),
        }
    }

    /// Whether at least one provider is configured
    pub fn has_any_provider(&self) -> bool {
        self.azure.is_some() || self.google.is_some() || self.deepl.is_some()
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
