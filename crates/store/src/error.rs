use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    Io { path: PathBuf, message: String },
    /// The stored ledger could not be decoded.
    Corrupt { path: PathBuf, message: String },
    /// The ledger could not be encoded.
    Serialize(String),
    /// The backend refused the operation.
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "{}: {message}", path.display()),
            Self::Corrupt { path, message } => {
                write!(f, "{}: ledger is unreadable: {message}", path.display())
            }
            Self::Serialize(msg) => write!(f, "cannot encode ledger: {msg}"),
            Self::Unavailable(msg) => write!(f, "ledger store unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
