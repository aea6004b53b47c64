use thiserror::Error;

use alicia_data::DataError;
use alicia_net::NetError;
use alicia_protocol::error::CodecError;

/// Errors raised while dispatching or handling one inbound command.
/// Matches the error taxonomy's propagation policy rather than a flat
/// string: a [`dispatch::HandlerTable`](crate::dispatch::HandlerTable)
/// maps each variant to "disconnect" or "log and continue" at the call
/// site, it never panics on one.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("client is not authenticated for this request")]
    Unauthenticated,

    #[error("one-time code was missing, expired, or did not match")]
    OtpRejected,

    #[error("room {0} does not exist")]
    UnknownRoom(u32),

    #[error("ranch {0} does not exist")]
    UnknownRanch(u32),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type DirectorResult<T> = Result<T, DirectorError>;

/// Configuration load failures: these are fatal at startup (exit code
/// 1 per the CLI's documented exit codes), never recoverable mid-run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read { path: String, #[source] source: std::io::Error },

    #[error("failed to parse config file {path}")]
    Parse { path: String, #[source] source: serde_yaml::Error },

    #[error("failed to resolve host {host}")]
    Resolve { host: String, #[source] source: std::io::Error },

    #[error("host {host} resolved to no addresses")]
    NoAddress { host: String },
}
