/// Result type for textcall-rpc.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for textcall-rpc.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The channel could not be established or its socket could not be
    /// configured. Fatal to the caller of `connect`; never retried here.
    #[error("connection failure: {0}")]
    Connect(#[from] std::io::Error),
    /// The call completed with a non-success status. This includes deadline
    /// expiry and cancellation by the server.
    #[error("rpc failed: {0}")]
    Rpc(crate::Status),
    /// The server responded but the payload could not be parsed into the
    /// expected record.
    #[error("response payload could not be decoded: {0}")]
    Decode(#[from] DecodeError),
    /// The connection is closed.
    #[error("connection is closed")]
    ConnectionIsClosed,
    /// The shutdown grace period elapsed before in-flight calls drained.
    #[error("shutdown grace period elapsed before the channel drained")]
    ShutdownTimeout,
}

/// Why a payload failed to decode.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload ended before the record was complete.
    #[error("payload is truncated")]
    Truncated,
    /// The payload was not valid for the expected record shape.
    #[error("malformed payload: {0}")]
    Malformed(String),
}
