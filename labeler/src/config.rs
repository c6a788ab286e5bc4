//! Runtime configuration
//!
//! Command line arguments select the backend and roster. Cloud credentials
//! are never taken from the command line or source: they are loaded from
//! the environment, after an optional `.env` file has been applied.
//!
//! ## Credentials
//! - `DROPBOX_TOKEN`: Dropbox access token (required for `--backend dropbox`)
//! - `GDRIVE_TOKEN`: Google Drive OAuth access token (required for `--backend gdrive`)
//! - `GDRIVE_FOLDER_ID`: optional Drive folder holding datasets and artifacts

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use shared::Roster;
use crate::error::{LabelerError, LabelerResult};
use crate::types::BackendKind;

/// Command line arguments
#[derive(Parser, Debug, Clone)]
#[command(name = "labeler")]
#[command(about = "Row-by-row keep/pass review tool with remote persistence")]
pub struct Args {
    /// Port for the HTTP server
    #[arg(long, default_value = "8501")]
    pub port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub bind: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Storage backend for datasets, responses and resume state
    #[arg(long, value_enum, default_value_t = BackendKind::Local)]
    pub backend: BackendKind,

    /// Base directory for the local backend
    #[arg(long, default_value = "./store")]
    pub store_dir: PathBuf,

    /// Local directory searched when a dataset is missing from the store
    #[arg(long, default_value = ".")]
    pub data_dir: PathBuf,

    /// Reviewer names offered in the menu
    #[arg(long, value_delimiter = ',', default_values_t = Roster::DEFAULT_REVIEWERS.map(String::from))]
    pub reviewers: Vec<String>,

    /// Dataset names offered in the menu
    #[arg(long, value_delimiter = ',', default_values_t = Roster::DEFAULT_DATASETS.map(String::from))]
    pub datasets: Vec<String>,

    /// Seconds a session may stay untouched before it is dropped
    #[arg(long, default_value = "3600")]
    pub session_idle_secs: u64,
}

/// Credentials and options for the selected backend
#[derive(Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Local { base_dir: PathBuf },
    Memory,
    Dropbox { token: String },
    Gdrive { token: String, folder_id: Option<String> },
}

impl std::fmt::Debug for StoreSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreSettings::Local { base_dir } => f.debug_struct("Local").field("base_dir", base_dir).finish(),
            StoreSettings::Memory => f.write_str("Memory"),
            StoreSettings::Dropbox { .. } => f.debug_struct("Dropbox").field("token", &"***").finish(),
            StoreSettings::Gdrive { folder_id, .. } => f
                .debug_struct("Gdrive")
                .field("token", &"***")
                .field("folder_id", folder_id)
                .finish(),
        }
    }
}

/// Fully resolved configuration
#[derive(Debug, Clone)]
pub struct LabelerConfig {
    pub bind_address: SocketAddr,
    pub log_level: String,
    pub store: StoreSettings,
    pub data_dir: PathBuf,
    pub roster: Roster,
    pub session_idle: Duration,
}

impl LabelerConfig {
    /// Resolve arguments against the process environment (and `.env`)
    pub fn from_args(args: Args) -> LabelerResult<Self> {
        // Silently ignored when there is no .env file
        let _ = dotenv::dotenv();
        Self::from_args_with_env(args, |key| std::env::var(key).ok())
    }

    /// Resolve arguments using `lookup` for environment values
    pub fn from_args_with_env<F>(args: Args, lookup: F) -> LabelerResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address: SocketAddr = format!("{}:{}", args.bind, args.port)
            .parse()
            .map_err(|e| LabelerError::config(format!("Invalid bind address: {}", e)))?;

        let roster = Roster::new(&args.reviewers, &args.datasets)?;

        if args.session_idle_secs == 0 {
            return Err(LabelerError::config("--session-idle-secs must be greater than zero"));
        }

        let required = |key: &str| -> LabelerResult<String> {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .ok_or_else(|| {
                    LabelerError::config(format!(
                        "{} is not set. Provide it in the environment or a .env file.",
                        key
                    ))
                })
        };

        let store = match args.backend {
            BackendKind::Local => StoreSettings::Local {
                base_dir: args.store_dir,
            },
            BackendKind::Memory => StoreSettings::Memory,
            BackendKind::Dropbox => StoreSettings::Dropbox {
                token: required("DROPBOX_TOKEN")?,
            },
            BackendKind::Gdrive => StoreSettings::Gdrive {
                token: required("GDRIVE_TOKEN")?,
                folder_id: lookup("GDRIVE_FOLDER_ID").filter(|id| !id.trim().is_empty()),
            },
        };

        Ok(Self {
            bind_address,
            log_level: args.log_level,
            store,
            data_dir: args.data_dir,
            roster,
            session_idle: Duration::from_secs(args.session_idle_secs),
        })
    }
}
