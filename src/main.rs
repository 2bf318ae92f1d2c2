//! Command-line front end for the translation orchestrator
//!
//! Reads provider credentials from the environment, translates a snippet of
//! text or HTML given on the command line (or stdin), and can dump the merged
//! supported-language catalog. `--mock` swaps in offline mock providers for
//! trying the tool without API keys.

use clap::Parser;
use mt_hub::cache::{LanguageCache, MemoryStore};
use mt_hub::engines::mock::{MockEngine, MockMode};
use mt_hub::engines::{Engine, EngineType};
use mt_hub::language::{SupportedLanguage, TextDirection, UNDEFINED_LANG};
use mt_hub::{MtHubConfig, Translator};
use std::io::Read;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "mt-hub", version, about = "Translate text across multiple MT providers")]
struct Args {
    /// Source language code; omit to auto-detect
    #[arg(long = "from")]
    from: Option<String>,

    /// Target language code
    #[arg(long = "to", required_unless_present = "list_languages")]
    to: Option<String>,

    /// Treat the input as HTML
    #[arg(long)]
    html: bool,

    /// Use offline mock providers instead of real ones
    #[arg(long)]
    mock: bool,

    /// Print the merged supported-language catalog and exit
    #[arg(long = "list-languages")]
    list_languages: bool,

    /// Text to translate; reads stdin when omitted
    text: Option<String>,
}

fn mock_translator() -> Translator {
    let catalog = vec![
        SupportedLanguage::new("en", "English", "English", TextDirection::Ltr),
        SupportedLanguage::new("nl", "Dutch", "Nederlands", TextDirection::Ltr),
        SupportedLanguage::new("fr", "French", "français", TextDirection::Ltr),
        SupportedLanguage::new("ar", "Arabic", "العربية", TextDirection::Rtl),
    ];
    let engines = [EngineType::Azure, EngineType::Google, EngineType::Deepl]
        .into_iter()
        .map(|engine_type| {
            Engine::new(
                Arc::new(
                    MockEngine::new(engine_type, MockMode::Suffix)
                        .with_detected("nl")
                        .with_catalog(catalog.clone()),
                ),
                None,
            )
        })
        .collect();
    Translator::new(engines)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mt_hub=info".into()),
        )
        .init();

    let args = Args::parse();

    let cache = LanguageCache::new(Arc::new(MemoryStore::new()));
    let translator = if args.mock {
        mock_translator()
    } else {
        Translator::from_config(&MtHubConfig::from_env(), Some(cache.clone()))?
    };

    if args.list_languages {
        let mut languages = translator.get_supported_languages(false).await;
        languages.sort_by(|a, b| a.code.cmp(&b.code));
        for language in languages {
            println!("{}\t{}\t{}", language.code, language.name, language.native_name);
        }
        cache.shutdown().await;
        return Ok(());
    }

    let content = match args.text {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let source = args.from.as_deref().unwrap_or(UNDEFINED_LANG);
    // clap guarantees --to is present outside --list-languages
    let target = args.to.as_deref().unwrap_or_default();

    let translated = translator
        .translate(content.trim_end(), source, target, args.html, None)
        .await?;
    println!("{}", translated);

    cache.shutdown().await;
    Ok(())
}
