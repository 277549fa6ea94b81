//! Error types for the message layer and the client.
//!
//! # Design
//! Caller mistakes (`InvalidArgument`) fail at the call that detects them.
//! `Stream` covers every operation on a resource that is gone or was opened
//! without the needed access. `Client` carries the transport's own error text
//! verbatim so callers can log or match on it.

use std::io;

/// Errors produced by streams, messages and the client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed caller input: empty method, whitespace in a request target,
    /// negative read length, unparseable URI.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The stream's resource was detached or closed, or the access mode does
    /// not permit the operation.
    #[error("stream error: {0}")]
    Stream(String),

    /// Transport-level failure. The message is the transport's error string.
    #[error("{0}")]
    Client(String),

    /// The header block did not start with a parseable status line.
    #[error("malformed header block: {0}")]
    MalformedHeader(String),

    /// The data map could not be encoded as JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error while opening the debug sink.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
