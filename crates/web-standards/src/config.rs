use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::AppError;
use crate::loader::SPECS_FILE;

/// What to do when the WebIDL, CSS or elements dataset cannot be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadFailurePolicy {
    /// Log the failure and serve an empty collection.
    #[default]
    Degrade,
    /// Surface the failure to the caller; the next access retries the load.
    Fail,
}

impl FromStr for LoadFailurePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "fail" => Ok(Self::Fail),
            other => Err(AppError::Config(format!(
                "WEB_STANDARDS_ON_LOAD_FAILURE must be 'degrade' or 'fail', got '{other}'"
            ))),
        }
    }
}

/// Application configuration loaded explicitly from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the bundled data package (specs.json, idl/, css.json, elements/).
    pub data_path: String,
    pub on_load_failure: LoadFailurePolicy,
    /// When set, serve MCP over TCP on this address instead of stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Required:
    /// - `WEB_STANDARDS_DATA_PATH`: path to the bundled data package
    ///
    /// Optional:
    /// - `WEB_STANDARDS_ON_LOAD_FAILURE`: "degrade" (default) or "fail"
    /// - `MCP_TCP_LISTEN_ADDR`: TCP listen address, e.g. "127.0.0.1:4030"
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let data_path = lookup("WEB_STANDARDS_DATA_PATH").ok_or_else(|| {
            AppError::Config("WEB_STANDARDS_DATA_PATH environment variable is required".to_string())
        })?;

        let specs = Path::new(&data_path).join(SPECS_FILE);
        if !specs.exists() {
            return Err(AppError::Config(format!(
                "required file not found: {}",
                specs.display()
            )));
        }

        let on_load_failure = match lookup("WEB_STANDARDS_ON_LOAD_FAILURE") {
            Some(value) => value.parse()?,
            None => LoadFailurePolicy::default(),
        };

        Ok(Self {
            data_path,
            on_load_failure,
            tcp_listen_addr: lookup("MCP_TCP_LISTEN_ADDR").filter(|addr| !addr.trim().is_empty()),
        })
    }

    pub fn data_path(&self) -> PathBuf {
        Path::new(&self.data_path).to_path_buf()
    }
}
