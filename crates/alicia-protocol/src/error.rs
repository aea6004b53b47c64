use thiserror::Error;

/// Errors raised while decoding or encoding a frame or command body.
///
/// `NeedMoreData` is not a failure: it signals the caller to rewind its
/// cursor and wait for more bytes rather than treat the connection as
/// broken (see the frame-malformed vs. partial-frame split in the error
/// taxonomy).
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("not enough data buffered yet")]
    NeedMoreData,

    #[error("frame length {length} is out of bounds (must be 4..={max})")]
    FrameTooLarge { length: u32, max: u32 },

    #[error("command id {id} is reserved and cannot be framed (must be < 0x4000)")]
    ReservedCommandId { id: u16 },

    #[error("pad of {pad} bytes does not fit in a payload of {payload_len} bytes")]
    PadExceedsPayload { pad: u8, payload_len: usize },

    #[error("unknown command id {0}")]
    UnknownCommandId(u16),

    #[error("field '{field}' value {value} does not fit in its wire width")]
    FieldOutOfRange { field: &'static str, value: i64 },

    #[error("string field exceeded its maximum wire length of {max} bytes")]
    StringTooLong { max: usize },

    #[error("locale conversion failed for a user-visible string")]
    LocaleConversion,

    #[error("trailing {0} unread bytes left in command body")]
    TrailingBytes(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CodecResult<T> = Result<T, CodecError>;
