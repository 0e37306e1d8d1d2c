//! `phpgen.json` plus environment overrides.
//!
//! Precedence, lowest first: built-in defaults, the config file,
//! `PHPGEN_PHP` / `PHPGEN_TIMEOUT_MS`, then command-line flags.

use anyhow::{Context, Result};
use phpgen_ir::{Frontend, JsonReader, SexpReader};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::exec::{DEFAULT_PHP_BINARY, ExecOptions};

pub const CONFIG_FILE_NAME: &str = "phpgen.json";
pub const PHP_ENV: &str = "PHPGEN_PHP";
pub const TIMEOUT_ENV: &str = "PHPGEN_TIMEOUT_MS";

/// Notation of the IR input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// `(tag field ...)` s-expressions.
    #[default]
    Sexp,
    /// `["tag", field, ...]` JSON arrays.
    Json,
}

impl InputFormat {
    pub fn frontend(self) -> &'static dyn Frontend {
        match self {
            Self::Sexp => &SexpReader,
            Self::Json => &JsonReader,
        }
    }

    /// Guess from a file extension; `.json` means JSON, anything else the default.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "sexp" | "ir" => Some(Self::Sexp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Config {
    pub php_binary: PathBuf,
    pub timeout_ms: Option<u64>,
    pub input_format: InputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            php_binary: PathBuf::from(DEFAULT_PHP_BINARY),
            timeout_ms: None,
            input_format: InputFormat::default(),
        }
    }
}

impl Config {
    pub fn parse(source: &str) -> Result<Self> {
        serde_json::from_str(source).context("failed to parse phpgen config JSON")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&source).with_context(|| format!("failed to load config: {}", path.display()))
    }

    /// `phpgen.json` in `dir` if present, defaults otherwise.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Apply `PHPGEN_PHP` and `PHPGEN_TIMEOUT_MS`. Empty values count as unset.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(php) = var(PHP_ENV) {
            self.php_binary = PathBuf::from(php);
        }
        if let Some(timeout) = var(TIMEOUT_ENV) {
            let millis = timeout.trim().parse().with_context(|| {
                format!("{TIMEOUT_ENV} must be a whole number of milliseconds, found `{timeout}`")
            })?;
            self.timeout_ms = Some(millis);
        }
        Ok(())
    }

    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            php_binary: self.php_binary.clone(),
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod config_tests;
