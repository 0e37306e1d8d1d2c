use std::io;

use phpgen_ir::ReadError;
use phpgen_syntax::SyntaxError;
use phpgen_transducer::TransduceError;
use thiserror::Error;

use crate::exec::ExecError;

/// Everything the pipeline driver can fail with.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid IR: {0}")]
    Read(#[from] ReadError),

    #[error(transparent)]
    Transduce(#[from] TransduceError),

    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("PHP execution failed: {0}")]
    Exec(#[from] ExecError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}
