//! Subcommand handlers. Each returns the process exit code.

use anyhow::{Context, Result, bail};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::debug;

use super::args::{CliArgs, Command, InputArgs, PhpArgs};
use crate::config::{Config, InputFormat};
use crate::driver::{self, IrSource};
use crate::exec::PhpProcess;

/// Exit code used when the interpreter died without one (e.g. from a signal).
const EXIT_NO_CODE: i32 = 1;

/// The process streams, injectable for tests.
pub struct Streams<'a> {
    pub stdin: &'a mut dyn Read,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
}

/// Environment variable lookup, injectable for tests.
pub type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn run(args: &CliArgs, cwd: &Path, env: EnvLookup<'_>, streams: Streams<'_>) -> Result<i32> {
    let mut config = resolve_config(args.config.as_deref(), cwd, env)?;
    debug!(?config, command = ?args.command, "resolved configuration");

    match &args.command {
        Command::Dump(input) => dump(input, &config, cwd, streams),
        Command::Eval { input, php } => {
            php.apply(&mut config);
            eval(input, &config, cwd, streams)
        }
        Command::Exec { file, php } => {
            php.apply(&mut config);
            exec(file, &config, cwd, streams)
        }
        Command::Version(php) => {
            php.apply(&mut config);
            version(&config, streams.stdout)
        }
    }
}

/// `--config` must exist; otherwise `phpgen.json` in `cwd` is optional.
pub fn resolve_config(path: Option<&Path>, cwd: &Path, env: EnvLookup<'_>) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load(&cwd.join(path))?,
        None => Config::discover(cwd)?,
    };
    config.apply_env(env)?;
    Ok(config)
}

impl PhpArgs {
    pub fn apply(&self, config: &mut Config) {
        if let Some(php) = &self.php {
            config.php_binary = php.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = Some(timeout_ms);
        }
    }
}

impl InputArgs {
    /// Flag first, then the file extension, then the configured default.
    pub fn format(&self, config: &Config) -> InputFormat {
        self.format
            .or_else(|| self.input.as_deref().and_then(InputFormat::from_path))
            .unwrap_or(config.input_format)
    }
}

fn dump(input: &InputArgs, config: &Config, cwd: &Path, streams: Streams<'_>) -> Result<i32> {
    let (label, text) = read_source(input.input.as_deref(), cwd, streams.stdin)?;
    let source = IrSource::Frontend {
        frontend: input.format(config).frontend(),
        source: &text,
    };
    driver::dump(source, streams.stdout)
        .with_context(|| format!("failed to generate PHP from {label}"))?;
    Ok(0)
}

fn eval(input: &InputArgs, config: &Config, cwd: &Path, streams: Streams<'_>) -> Result<i32> {
    let (label, text) = read_source(input.input.as_deref(), cwd, streams.stdin)?;
    let program = driver::generate(IrSource::Frontend {
        frontend: input.format(config).frontend(),
        source: &text,
    })
    .with_context(|| format!("failed to generate PHP from {label}"))?;

    let status = driver::execute(
        &program,
        &config.exec_options(),
        streams.stdout,
        streams.stderr,
    )
    .with_context(|| format!("failed to run PHP generated from {label}"))?;
    Ok(exit_code(status))
}

fn exec(file: &Path, config: &Config, cwd: &Path, streams: Streams<'_>) -> Result<i32> {
    let (label, text) = read_source(Some(file), cwd, streams.stdin)?;
    let interpreter = PhpProcess::new(config.exec_options());
    let status = driver::run_text(&text, &interpreter, streams.stdout, streams.stderr)
        .with_context(|| format!("failed to run {label}"))?;
    Ok(exit_code(status))
}

fn version(config: &Config, stdout: &mut dyn Write) -> Result<i32> {
    let Some(version) = driver::php_version(&config.exec_options())? else {
        bail!("`{}` did not report a version", config.php_binary.display());
    };
    writeln!(stdout, "PHP {version}")?;
    Ok(0)
}

/// Read a file relative to `cwd`, or stdin for `None` / `-`.
fn read_source(path: Option<&Path>, cwd: &Path, stdin: &mut dyn Read) -> Result<(String, String)> {
    match path {
        None => read_stdin(stdin),
        Some(path) if path == Path::new("-") => read_stdin(stdin),
        Some(path) => {
            let resolved: PathBuf = cwd.join(path);
            let text = std::fs::read_to_string(&resolved)
                .with_context(|| format!("failed to read {}", resolved.display()))?;
            Ok((path.display().to_string(), text))
        }
    }
}

fn read_stdin(stdin: &mut dyn Read) -> Result<(String, String)> {
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .context("failed to read stdin")?;
    Ok(("<stdin>".to_string(), text))
}

fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(EXIT_NO_CODE)
}
