//! docproc - extract text from files uploaded to a Telegram bot.
//!
//! Results are printed to stdout as JSON. Logs go to stderr.
//!
//! # Configuration
//!
//! - `TELEGRAM_BOT_TOKEN` (or `BOT_TOKEN`) - bot credential for downloads
//! - `DOCPROC_API_BASE_URL` - optional, defaults to `https://api.telegram.org`
//! - `DOCPROC_TEXT_DECODING` - `lossy` (default) or `strict`
//! - `RUST_LOG` - log filter
//!
//! A `.env` file in the working directory is loaded first. `--config` reads a
//! TOML, JSON or YAML file instead of the environment.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docproc::{DocumentProcessor, ProcessorConfig, TelegramFileSource};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "docproc", version, about = "Extract text from Telegram bot uploads")]
struct Cli {
    /// Configuration file (.toml, .json, .yaml)
    #[arg(short, long, global = true, env = "DOCPROC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download a document and extract its text
    Process {
        /// Remote path returned by getFile
        remote_path: String,
        /// Original file name, used to pick the extractor
        file_name: String,
    },
    /// Download an inline photo and run OCR on it
    Photo {
        remote_path: String,
    },
    /// Resolve a Telegram file_id to its remote path
    Resolve {
        file_id: String,
    },
    /// Extract text from a file on disk
    Local {
        path: PathBuf,
    },
    /// Print the category of a file name, failing when unsupported
    Check {
        file_name: String,
    },
    /// Print the supported extension table
    Types,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Process {
            remote_path,
            file_name,
        } => {
            let processor = DocumentProcessor::from_config(config)?;
            let result = processor.process_file(&remote_path, &file_name).await?;
            print_json(&result)?;
        }
        Command::Photo { remote_path } => {
            let processor = DocumentProcessor::from_config(config)?;
            let result = processor.extract_telegram_image(&remote_path).await?;
            print_json(&result)?;
        }
        Command::Resolve { file_id } => {
            let source = TelegramFileSource::from_config(&config);
            let remote_path = source.resolve_file_path(&file_id).await?;
            println!("{}", remote_path);
        }
        Command::Local { path } => {
            let content = tokio::fs::read(&path)
                .await
                .with_context(|| format!("Cannot read {}", path.display()))?;
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let processor = DocumentProcessor::from_config(config)?;
            let result = processor.process_bytes(content, &file_name).await?;
            print_json(&result)?;
        }
        Command::Check { file_name } => {
            let category = config.supported_types.classify(&file_name)?;
            print_json(&json!({
                "fileName": file_name,
                "type": category,
            }))?;
        }
        Command::Types => {
            print_json(&config.supported_types)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<ProcessorConfig> {
    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config file");
            ProcessorConfig::from_file(path)?
        }
        None => ProcessorConfig::from_env()?,
    };
    Ok(config)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
