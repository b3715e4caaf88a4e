use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    // 参数错误，在任何 I/O 之前返回
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // 流读写错误
    #[error("Error while reading a stream")]
    ReadFailure(#[source] io::Error),
    #[error("Error while writing the sample")]
    WriteFailure(#[source] io::Error),
    #[error("File access error: {}", .path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // 内部逻辑错误
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

impl AppError {
    /// A closed stdout is how a downstream `head` says it has seen enough.
    pub fn is_broken_pipe(&self) -> bool {
        matches!(self, Self::WriteFailure(e) if e.kind() == io::ErrorKind::BrokenPipe)
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
