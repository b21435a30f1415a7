use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use bucketkv::{CborCodec, Codec, ConfigError, JsonCodec, Options, Store};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] bucketkv::Error),

    #[error("Options error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid JSON value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Value encoding used on disk.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum CodecKind {
    /// CBOR (compact binary).
    #[default]
    Cbor,
    /// JSON text.
    Json,
}

#[derive(Parser)]
#[command(name = "bucketkv")]
#[command(about = "Put, get and delete typed values in a bucket of a single-file database")]
struct Cli {
    /// Database file path
    #[arg(long, global = true, default_value = "bucketkv.db", env = "BUCKETKV_PATH")]
    path: PathBuf,

    /// Bucket name
    #[arg(long, global = true, default_value = "default", env = "BUCKETKV_BUCKET")]
    bucket: String,

    /// TOML options file (lock timeout, file mode, cache size)
    #[arg(long, global = true, env = "BUCKETKV_CONFIG")]
    config: Option<PathBuf>,

    /// Value encoding
    #[arg(long, global = true, value_enum, default_value_t = CodecKind::Cbor)]
    codec: CodecKind,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a JSON value under a key
    Put {
        /// Key for the value
        key: String,

        /// JSON-encoded value
        value: String,
    },

    /// Print the value stored under a key as JSON
    Get {
        /// Key for the value
        key: String,
    },

    /// Print whether a key is present
    Exists {
        /// Key to check
        key: String,
    },

    /// Delete a key
    Delete {
        /// Key to delete
        key: String,
    },
}

fn main() -> Result<(), AppError> {
    init_logging();

    let cli = Cli::parse();
    let options = match &cli.config {
        Some(path) => Options::from_file(path)?,
        None => Options::default(),
    };

    match cli.codec {
        CodecKind::Cbor => {
            let store = Store::open_with(&cli.path, &cli.bucket, &options, CborCodec)?;
            run(&store, cli.command)?;
            store.close()?;
        }
        CodecKind::Json => {
            let store = Store::open_with(&cli.path, &cli.bucket, &options, JsonCodec)?;
            run(&store, cli.command)?;
            store.close()?;
        }
    }
    Ok(())
}

fn run<C: Codec>(store: &Store<C>, command: Commands) -> Result<(), AppError> {
    match command {
        Commands::Put { key, value } => {
            let value: serde_json::Value = serde_json::from_str(&value)?;
            store.put(&key, &value)?;
            println!("Put '{}' in bucket '{}'", key, String::from_utf8_lossy(store.bucket_name()));
        }
        Commands::Get { key } => {
            let value: serde_json::Value = store.fetch(&key)?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        Commands::Exists { key } => {
            println!("{}", store.contains(&key)?);
        }
        Commands::Delete { key } => {
            store.delete(&key)?;
            println!("Deleted '{}' from bucket '{}'", key, String::from_utf8_lossy(store.bucket_name()));
        }
    }
    Ok(())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let layer = fmt::layer()
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry().with(filter).with(layer).init();
}
