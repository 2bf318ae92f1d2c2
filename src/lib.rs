//! # mt-hub
//!
//! A machine translation orchestration engine. It fronts multiple commercial
//! MT providers (Azure Translator, Google Translate, DeepL) behind one
//! uniform interface and handles everything the providers do not: picking a
//! capable engine per language pair, honoring per-account engine preferences,
//! splitting oversized HTML across concurrent calls, detecting unknown source
//! languages, caching supported-language catalogs, and merging those catalogs
//! into one deduplicated list.
//!
//! # Example
//!
//! ```ignore
//! use mt_hub::{MtHubConfig, Translator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let translator = Translator::from_config(&MtHubConfig::from_env(), None)?;
//!     let translated = translator
//!         .translate("<p>Hallo wereld</p>", "nl", "en", true, None)
//!         .await?;
//!     println!("{}", translated);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod chunker;
pub mod config;
pub mod engines;
pub mod error;
pub mod language;
pub mod orchestrator;
pub mod preferences;

pub use cache::{KeyValueStore, LanguageCache, MemoryStore};
pub use chunker::{HtmlChunker, TagBoundaryChunker};
pub use config::MtHubConfig;
pub use engines::{Engine, EngineType, MTEngine, TranslationRequest};
pub use error::{MtError, MtResult};
pub use language::{LanguageCode, SupportedLanguage, TextDirection, UNDEFINED_LANG};
pub use orchestrator::Translator;
pub use preferences::AccountMtPreferences;
