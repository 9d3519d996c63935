use thiserror::Error;

/// Top-level error type used across the monitor crates.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("config error: {0}")]
    Config(String),

    #[error("system error: {0}")]
    System(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = TaskError> = std::result::Result<T, E>;

/// Outcome categories of a process termination request.
///
/// The shell maps each variant to a user-visible message; none of them are
/// retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TerminateError {
    #[error("process {0} no longer exists")]
    NotFound(u32),

    #[error("permission denied: cannot terminate process {0}")]
    PermissionDenied(u32),

    #[error("failed to terminate process {pid}: {message}")]
    Other { pid: u32, message: String },
}

impl TerminateError {
    pub fn pid(&self) -> u32 {
        match self {
            Self::NotFound(pid) | Self::PermissionDenied(pid) => *pid,
            Self::Other { pid, .. } => *pid,
        }
    }
}
