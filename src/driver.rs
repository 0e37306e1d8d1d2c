//! Pipeline driver: IR in, PHP program out, optionally executed.

use std::io::Write;
use std::process::ExitStatus;

use phpgen_ir::{Frontend, Sexp};
use phpgen_syntax::Program;
use phpgen_transducer::transduce_program;
use tracing::{debug, info_span};

use crate::error::Error;
use crate::exec::{ExecOptions, Interpreter, PhpProcess};

/// PHP snippet used to ask the interpreter for its version.
pub const VERSION_SCRIPT: &str = "<?php echo phpversion();";

/// Where the IR comes from.
pub enum IrSource<'a> {
    /// Already-built top-level nodes.
    Nodes(Vec<Sexp>),
    /// Text to be read by a front-end.
    Frontend {
        frontend: &'a dyn Frontend,
        source: &'a str,
    },
}

impl IrSource<'_> {
    fn into_nodes(self) -> Result<Vec<Sexp>, Error> {
        match self {
            IrSource::Nodes(nodes) => Ok(nodes),
            IrSource::Frontend { frontend, source } => {
                let _span =
                    info_span!("read_ir", frontend = frontend.name(), bytes = source.len()).entered();
                Ok(frontend.read(source)?)
            }
        }
    }
}

/// Transduce every top-level node into one program.
///
/// No IR nodes is not an error: the result is an empty program.
pub fn generate(source: IrSource<'_>) -> Result<Program, Error> {
    let nodes = source.into_nodes()?;
    let _span = info_span!("generate", nodes = nodes.len()).entered();
    if nodes.is_empty() {
        debug!("no IR nodes, emitting an empty program");
    }
    Ok(transduce_program(&nodes)?)
}

pub fn to_text(program: &Program) -> Result<String, Error> {
    Ok(program.render()?)
}

/// Generate and write the program text.
pub fn dump(source: IrSource<'_>, out: &mut dyn Write) -> Result<(), Error> {
    let text = to_text(&generate(source)?)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Run `program` with the `php` binary described by `options`.
pub fn execute(
    program: &Program,
    options: &ExecOptions,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<ExitStatus, Error> {
    execute_with(program, &PhpProcess::new(options.clone()), stdout, stderr)
}

pub fn execute_with(
    program: &Program,
    interpreter: &dyn Interpreter,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<ExitStatus, Error> {
    let text = to_text(program)?;
    run_text(&text, interpreter, stdout, stderr)
}

/// Run PHP text that did not come from the generator.
pub fn run_text(
    text: &str,
    interpreter: &dyn Interpreter,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<ExitStatus, Error> {
    let _span = info_span!("execute", bytes = text.len()).entered();
    let status = interpreter.run(text, stdout, stderr)?;
    debug!(code = ?status.code(), success = status.success(), "execution finished");
    Ok(status)
}

/// Installed PHP version, for diagnostics.
pub fn php_version(options: &ExecOptions) -> Result<Option<String>, Error> {
    interpreter_version(&PhpProcess::new(options.clone()))
}

/// Trimmed output of [`VERSION_SCRIPT`]; `None` when the interpreter printed nothing.
pub fn interpreter_version(interpreter: &dyn Interpreter) -> Result<Option<String>, Error> {
    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    interpreter.run(VERSION_SCRIPT, &mut stdout, &mut stderr)?;
    let version = String::from_utf8_lossy(&stdout).trim().to_string();
    Ok((!version.is_empty()).then_some(version))
}
