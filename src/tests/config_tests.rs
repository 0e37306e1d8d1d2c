use std::path::PathBuf;
use std::time::Duration;

use super::{CONFIG_FILE_NAME, Config, InputFormat, PHP_ENV, TIMEOUT_ENV};

fn env(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
    move |key: &str| {
        pairs
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| (*value).to_string())
    }
}

#[test]
fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.php_binary, PathBuf::from("php"));
    assert_eq!(config.timeout_ms, None);
    assert_eq!(config.input_format, InputFormat::Sexp);
    assert_eq!(config.exec_options().timeout, None);
}

#[test]
fn test_parse_camel_case_keys() {
    let config = Config::parse(
        r#"{ "phpBinary": "/usr/bin/php8", "timeoutMs": 2500, "inputFormat": "json" }"#,
    )
    .expect("config should parse");
    assert_eq!(config.php_binary, PathBuf::from("/usr/bin/php8"));
    assert_eq!(config.timeout_ms, Some(2500));
    assert_eq!(config.input_format, InputFormat::Json);
    assert_eq!(
        config.exec_options().timeout,
        Some(Duration::from_millis(2500))
    );
}

#[test]
fn test_missing_keys_take_defaults() {
    let config = Config::parse(r#"{ "timeoutMs": 10 }"#).expect("config should parse");
    assert_eq!(config.php_binary, PathBuf::from("php"));
    assert_eq!(config.input_format, InputFormat::Sexp);
}

#[test]
fn test_unknown_keys_are_rejected() {
    let err = Config::parse(r#"{ "php": "php8" }"#).expect_err("unknown key should fail");
    assert!(format!("{err:#}").contains("unknown field `php`"));
}

#[test]
fn test_environment_overrides_file() {
    let mut config = Config::parse(r#"{ "phpBinary": "php7", "timeoutMs": 10 }"#)
        .expect("config should parse");
    config
        .apply_env(env(&[(PHP_ENV, "php8"), (TIMEOUT_ENV, " 500 ")]))
        .expect("environment should apply");
    assert_eq!(config.php_binary, PathBuf::from("php8"));
    assert_eq!(config.timeout_ms, Some(500));
}

#[test]
fn test_empty_environment_values_are_ignored() {
    let mut config = Config::default();
    config
        .apply_env(env(&[(PHP_ENV, ""), (TIMEOUT_ENV, "  ")]))
        .expect("environment should apply");
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_timeout_in_environment() {
    let mut config = Config::default();
    let err = config
        .apply_env(env(&[(TIMEOUT_ENV, "soon")]))
        .expect_err("non-numeric timeout should fail");
    assert_eq!(
        err.to_string(),
        "PHPGEN_TIMEOUT_MS must be a whole number of milliseconds, found `soon`"
    );
}

#[test]
fn test_discover_reads_config_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    assert_eq!(
        Config::discover(dir.path()).expect("defaults without a file"),
        Config::default()
    );

    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        r#"{ "inputFormat": "json" }"#,
    )
    .expect("write config");
    let config = Config::discover(dir.path()).expect("config should load");
    assert_eq!(config.input_format, InputFormat::Json);
}

#[test]
fn test_load_reports_path_on_bad_json() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "{ not json").expect("write config");
    let err = Config::load(&path).expect_err("bad JSON should fail");
    assert!(err.to_string().starts_with("failed to load config: "));
}

#[test]
fn test_input_format_from_extension() {
    assert_eq!(
        InputFormat::from_path(std::path::Path::new("prog.json")),
        Some(InputFormat::Json)
    );
    assert_eq!(
        InputFormat::from_path(std::path::Path::new("prog.sexp")),
        Some(InputFormat::Sexp)
    );
    assert_eq!(InputFormat::from_path(std::path::Path::new("prog")), None);
    assert_eq!(InputFormat::Json.frontend().name(), "json");
}
