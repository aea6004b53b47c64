use thiserror::Error;

/// Errors raised by the cache or a data source. These never propagate
/// into a director's handler; a director only ever sees `Option`/`bool`
/// from the cache API (see [`crate::cache::Cache`]) and logs a
/// [`DataError`] surfaced from a tick at `warn` or `error`.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("entity {uid} already exists in this cache")]
    AlreadyExists { uid: u32 },

    #[error("entity {uid} was not found by the data source")]
    NotFound { uid: u32 },

    #[error("data source I/O failure")]
    Io(#[from] std::io::Error),

    #[error("data source serialization failure")]
    Serde(#[from] serde_json::Error),

    #[error("the monotonic UID allocator is exhausted")]
    AllocatorExhausted,
}

pub type DataResult<T> = Result<T, DataError>;
