use thiserror::Error;

/// Transport-level errors: these end a connection, they never
/// propagate out of a listener's accept loop.
#[derive(Debug, Error)]
pub enum NetError {
    #[error("peer closed the connection")]
    Closed,

    #[error("outbound queue is full or the connection is gone")]
    SendFailed,

    #[error(transparent)]
    Codec(#[from] alicia_protocol::error::CodecError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
