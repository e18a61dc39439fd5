use thiserror::Error;

/// Errors raised by the write path (streams and buffers).
#[derive(Debug, Error)]
pub enum StreamError {
    /// A contract violation by the caller, e.g. recording into a closed
    /// stream or resetting one that was never closed. These abort stripe
    /// production; continuing would corrupt checkpoint/row alignment.
    #[error("usage violation: {0}")]
    UsageViolation(&'static str),

    #[error("compression codec failed: {0}")]
    Codec(#[from] CodecError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the decode path.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("corrupt stream: {0}")]
    Corrupt(String),

    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("compression codec failed: {0}")]
    Codec(#[from] CodecError),
}

/// Failure inside a compression codec, wrapped per algorithm.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("lz4: {0}")]
    Lz4(String),

    #[error("zstd: {0}")]
    Zstd(String),
}
