use std::path::PathBuf;

/// Errors raised while assembling or dispatching a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Proxy protocol other than `http` or `socks5`
    #[error("unsupported proxy protocol {0:?}, expected \"http\" or \"socks5\"")]
    InvalidProtocol(String),
    /// A required variable is neither in the environment nor in the env file
    #[error("environment variable {0} is not set")]
    MissingVar(String),
    #[error("proxy port {0:?} is not a valid port number")]
    InvalidPort(String),
    #[error("invalid header {name:?}: {reason}")]
    InvalidHeader { name: String, reason: String },
    #[error("read env file {}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    /// The server answered with a 4xx or 5xx status
    #[error("GET {url} returned HTTP {status}")]
    Status { status: u16, url: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Status code carried by an HTTP error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
