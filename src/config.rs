use std::{env, fs, path::{Path, PathBuf}};
use serde::Deserialize;
use anyhow::Context;

use crate::backend::HtmlStore;

pub const DEFAULT_CONFIG_FILE: &str = "teller.toml";
pub const LEDGER_FILE_ENV: &str = "TELLER_LEDGER_FILE";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Ledger document, relative to the working directory
    pub ledger_file: PathBuf,
    /// `id` of the element holding the transaction rows
    pub table_id: String,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            ledger_file: PathBuf::from("log.html"),
            table_id: HtmlStore::DEFAULT_TABLE_ID.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned()
        }
    }
}

impl AppConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let file_content = fs::read_to_string(filepath)
            .with_context(|| format!("failed to read config file {}", filepath.display()))?;
        let config = toml::from_str(&file_content)
            .with_context(|| format!("failed to parse config file {}", filepath.display()))?;
        return Ok(config);
    }

    /// Reads `explicit` if given, otherwise `teller.toml` when it exists,
    /// otherwise the defaults. `TELLER_LEDGER_FILE` overrides the ledger path.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let config = match explicit {
            Some(path) => Self::read(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::read(DEFAULT_CONFIG_FILE)?,
            None => Self::default()
        };
        return Ok(config.with_ledger_override(env::var_os(LEDGER_FILE_ENV).map(PathBuf::from)));
    }

    pub fn with_ledger_override(mut self, ledger_file: Option<PathBuf>) -> Self {
        if let Some(ledger_file) = ledger_file {
            self.ledger_file = ledger_file;
        }
        return self;
    }

    pub fn store(&self) -> HtmlStore {
        HtmlStore::new(&self.ledger_file).with_table_id(&self.table_id)
    }
}
