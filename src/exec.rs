//! Running generated PHP through an external interpreter.
//!
//! The core never touches processes. Everything that spawns, pipes or waits
//! lives behind [`Interpreter`], and [`PhpProcess`] is the one implementation
//! that shells out to a real `php` binary.

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, debug_span, warn};

/// Default interpreter binary, looked up on `PATH`.
pub const DEFAULT_PHP_BINARY: &str = "php";

/// How often the wait loop checks the child while no output arrives.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("failed to start `{}`: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("interpreter I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("interpreter did not finish within {after:?}")]
    Timeout { after: Duration },
}

/// Where and how long to run the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOptions {
    pub php_binary: PathBuf,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
}

impl Default for ExecOptions {
    fn default() -> Self {
        Self {
            php_binary: PathBuf::from(DEFAULT_PHP_BINARY),
            timeout: None,
        }
    }
}

/// Executes program text and streams the interpreter's output to the sinks.
pub trait Interpreter {
    fn run(
        &self,
        source: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ExitStatus, ExecError>;
}

/// A `php` child process fed through its standard input.
#[derive(Debug, Clone, Default)]
pub struct PhpProcess {
    options: ExecOptions,
}

impl PhpProcess {
    pub const fn new(options: ExecOptions) -> Self {
        Self { options }
    }

    pub const fn options(&self) -> &ExecOptions {
        &self.options
    }

    /// True when the configured binary can be started at all.
    pub fn is_available(&self) -> bool {
        Command::new(&self.options.php_binary)
            .arg("-v")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok()
    }

    fn spawn(&self) -> Result<Child, ExecError> {
        Command::new(&self.options.php_binary)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecError::Spawn {
                binary: self.options.php_binary.clone(),
                source,
            })
    }
}

impl Interpreter for PhpProcess {
    fn run(
        &self,
        source: &str,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<ExitStatus, ExecError> {
        let _span = debug_span!(
            "php_process",
            binary = %self.options.php_binary.display(),
            bytes = source.len()
        )
        .entered();

        let mut child = self.spawn()?;
        let (Some(stdin), Some(child_stdout), Some(child_stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(io::Error::other("child pipes were not captured").into());
        };

        let (tx, rx) = mpsc::channel();
        let readers = [
            pump(child_stdout, Stream::Stdout, tx.clone()),
            pump(child_stderr, Stream::Stderr, tx),
        ];
        let writer = feed(stdin, source.to_owned());

        let started = Instant::now();
        let mut status = None;
        let mut drained = false;
        loop {
            let forwarded = match rx.recv_timeout(POLL_INTERVAL) {
                Ok(Ok((Stream::Stdout, chunk))) => stdout.write_all(&chunk),
                Ok(Ok((Stream::Stderr, chunk))) => stderr.write_all(&chunk),
                Ok(Err(err)) => Err(err),
                Err(RecvTimeoutError::Timeout) => Ok(()),
                Err(RecvTimeoutError::Disconnected) => {
                    drained = true;
                    Ok(())
                }
            };
            if let Err(err) = forwarded {
                return Err(abort(child, readers, err.into()));
            }

            if status.is_none() {
                match child.try_wait() {
                    Ok(exited) => status = exited,
                    Err(err) => return Err(abort(child, readers, err.into())),
                }
            }
            if let (Some(status), true) = (status, drained) {
                join_readers(readers);
                finish_feed(writer)?;
                stdout.flush()?;
                stderr.flush()?;
                debug!(code = ?status.code(), elapsed = ?started.elapsed(), "interpreter exited");
                return Ok(status);
            }

            if let Some(limit) = self.options.timeout
                && started.elapsed() >= limit
            {
                warn!(?limit, "interpreter timed out, killing it");
                return Err(abort(child, readers, ExecError::Timeout { after: limit }));
            }

            if drained {
                thread::sleep(POLL_INTERVAL);
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

type Chunk = io::Result<(Stream, Vec<u8>)>;

/// Copy a child stream into the channel until EOF.
fn pump<R: Read + Send + 'static>(
    mut reader: R,
    stream: Stream,
    tx: Sender<Chunk>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut buf = [0u8; READ_CHUNK];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => {
                    if tx.send(Ok((stream, buf[..n].to_vec()))).is_err() {
                        break;
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    let _ = tx.send(Err(err));
                    break;
                }
            }
        }
    })
}

/// Write the program to the child's stdin and close it.
fn feed<W: Write + Send + 'static>(mut stdin: W, source: String) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || {
        match stdin.write_all(source.as_bytes()) {
            // The interpreter may exit without reading all of its input.
            Err(err) if err.kind() == io::ErrorKind::BrokenPipe => Ok(()),
            other => other,
        }
    })
}

fn finish_feed(writer: JoinHandle<io::Result<()>>) -> Result<(), ExecError> {
    match writer.join() {
        Ok(result) => Ok(result?),
        Err(_) => Err(io::Error::other("stdin writer panicked").into()),
    }
}

fn join_readers(readers: [JoinHandle<()>; 2]) {
    for reader in readers {
        let _ = reader.join();
    }
}

/// Kill the child, wait for it, and let both readers hit EOF.
fn abort(mut child: Child, readers: [JoinHandle<()>; 2], err: ExecError) -> ExecError {
    if let Err(kill_err) = child.kill() {
        debug!(%kill_err, "kill failed; child already exited");
    }
    let _ = child.wait();
    join_readers(readers);
    err
}

#[cfg(test)]
#[path = "tests/exec_tests.rs"]
mod exec_tests;
