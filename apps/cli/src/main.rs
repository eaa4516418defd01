//! SettingsCraft CLI
//!
//! Command-line access to a SettingsCraft settings file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use settingscraft_logging::LogLevel;
use settingscraft_store::{expand_path, Algorithm, KeyPathSpec, Store, StoreConfig};

/// SettingsCraft - JSON settings file with key-path access
#[derive(Parser)]
#[command(name = "settingscraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Store config file (JSON); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Settings directory (defaults to the platform user data directory)
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Settings file name
    #[arg(long)]
    file_name: Option<String>,

    /// Write the file in place instead of via temp file + rename
    #[arg(long)]
    no_atomic: bool,

    /// Indent JSON output
    #[arg(long)]
    pretty: bool,

    /// Indent width used with --pretty
    #[arg(long)]
    spaces: Option<usize>,

    /// Encryption algorithm (e.g. aes-256-cbc, chacha20-poly1305)
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// Encryption passphrase
    #[arg(long, env = "SETTINGSCRAFT_KEY", hide_env_values = true)]
    key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings file path
    File,

    /// Print the value at a key path (or the whole document)
    Get {
        /// Dotted key path, or a JSON array of key paths
        path: Option<String>,
    },

    /// Exit with status 0 if the key path exists, 1 otherwise
    Has {
        /// Dotted key path, or a JSON array of key paths
        path: String,
    },

    /// Set the value at a key path
    Set {
        /// Dotted key path, or a JSON array of key paths
        path: String,

        /// JSON value; anything that fails to parse is stored as a string
        value: String,
    },

    /// Replace the whole document
    Replace {
        /// JSON value
        value: String,
    },

    /// Delete the value at a key path
    Delete {
        /// Dotted key path, or a JSON array of key paths
        path: String,
    },

    /// Reset the document to an empty object
    Clear,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    settingscraft_logging::init(if cli.verbose {
        LogLevel::Debug
    } else {
        LogLevel::Info
    });

    let config = build_config(&cli)?;
    let store = Store::new(config).context("Failed to open settings store")?;
    debug!("Using settings file {:?}", store.file());

    match cli.command {
        Commands::File => {
            println!("{}", store.file().display());
        }
        Commands::Get { path } => {
            let value = match path {
                Some(path) => store.get(parse_key_path(&path)?).await?,
                None => Some(store.get_all().await?),
            };
            match value {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => return Ok(ExitCode::FAILURE),
            }
        }
        Commands::Has { path } => {
            if !store.has(parse_key_path(&path)?).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Set { path, value } => {
            store.set(parse_key_path(&path)?, parse_value(&value)).await?;
        }
        Commands::Replace { value } => {
            let value: Value =
                serde_json::from_str(&value).context("Replacement document must be valid JSON")?;
            store.set_all(value).await?;
        }
        Commands::Delete { path } => {
            store.delete(parse_key_path(&path)?).await?;
        }
        Commands::Clear => {
            store.clear().await?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load_from(&expand_path(path))
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => StoreConfig::default(),
    };

    if let Some(dir) = &cli.dir {
        config = config.with_dir(expand_path(dir));
    }
    if let Some(file_name) = &cli.file_name {
        config = config.with_file_name(file_name);
    }
    if cli.no_atomic {
        config = config.with_atomic_save(false);
    }
    if cli.pretty {
        config = config.with_prettify(true);
    }
    if let Some(spaces) = cli.spaces {
        config = config.with_num_spaces(spaces);
    }
    if let Some(algorithm) = cli.algorithm {
        config = config.with_encryption_algorithm(algorithm);
    }
    if let Some(key) = &cli.key {
        config = config.with_encryption_key(key);
    }

    Ok(config)
}

/// A leading `[` selects the JSON array form
fn parse_key_path(raw: &str) -> Result<KeyPathSpec> {
    if raw.trim_start().starts_with('[') {
        let value: Value = serde_json::from_str(raw).context("Invalid JSON key path")?;
        Ok(KeyPathSpec::try_from(value)?)
    } else {
        Ok(KeyPathSpec::from(raw))
    }
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
