//! Diagnostic logging for the `phpgen` binary.
//!
//! Logging is off unless `PHPGEN_LOG` or `RUST_LOG` is set, and everything
//! goes to stderr: stdout carries only generated PHP or interpreter output.
//!
//! `PHPGEN_LOG` takes `EnvFilter` directives. A bare level is scoped to the
//! phpgen crates, so `PHPGEN_LOG=trace` follows the transducer through every
//! IR node without drowning it in dependency noise. `RUST_LOG` is used as
//! written.
//!
//! ```bash
//! # One indented line per IR node the transducer visits
//! PHPGEN_LOG=trace PHPGEN_LOG_FORMAT=tree phpgen dump program.sexp
//!
//! # Interpreter supervision only, as JSON
//! PHPGEN_LOG="phpgen::exec=debug" PHPGEN_LOG_FORMAT=json phpgen eval program.sexp
//! ```

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

pub const LOG_ENV: &str = "PHPGEN_LOG";
pub const LOG_FORMAT_ENV: &str = "PHPGEN_LOG_FORMAT";
pub const RUST_LOG_ENV: &str = "RUST_LOG";

/// Crates a bare `PHPGEN_LOG` level applies to.
const PHPGEN_TARGETS: [&str; 4] = ["phpgen", "phpgen_ir", "phpgen_syntax", "phpgen_transducer"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// `tracing-subscriber` flat lines.
    Text,
    /// `tracing-tree`, indented by span nesting.
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Unknown names fall back to `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// What the subscriber should record and how to print it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingSettings {
    pub directives: String,
    pub format: LogFormat,
}

impl TracingSettings {
    /// Read the logging variables through `lookup`. `None` means logging was
    /// not asked for. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let directives = match var(LOG_ENV) {
            Some(value) => scope_bare_level(&value),
            None => var(RUST_LOG_ENV)?,
        };
        let format = var(LOG_FORMAT_ENV).map_or(LogFormat::Text, |value| LogFormat::parse(&value));
        Some(Self { directives, format })
    }

    pub fn filter(&self) -> EnvFilter {
        EnvFilter::builder().parse_lossy(&self.directives)
    }

    /// Install the global subscriber. Panics if one is already installed.
    pub fn init(&self) {
        let filter = self.filter();
        match self.format {
            LogFormat::Tree => {
                let tree_layer = tracing_tree::HierarchicalLayer::default()
                    .with_writer(std::io::stderr)
                    .with_indent_amount(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true);
                Registry::default().with(filter).with(tree_layer).init();
            }
            LogFormat::Json => {
                let json_layer = fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr);
                Registry::default().with(filter).with(json_layer).init();
            }
            LogFormat::Text => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_target(true)
                    .with_writer(std::io::stderr)
                    .init();
            }
        }
    }
}

/// `debug` becomes `phpgen=debug,phpgen_ir=debug,...`; anything naming a
/// target passes through unchanged.
pub fn scope_bare_level(value: &str) -> String {
    let value = value.trim();
    if value.parse::<LevelFilter>().is_err() {
        return value.to_string();
    }
    PHPGEN_TARGETS
        .iter()
        .map(|target| format!("{target}={value}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Install a subscriber from the process environment, if logging was asked for.
pub fn init_tracing() {
    if let Some(settings) = TracingSettings::from_lookup(|key| std::env::var(key).ok()) {
        settings.init();
    }
}

#[cfg(test)]
#[path = "tests/tracing_config_tests.rs"]
mod tracing_config_tests;
