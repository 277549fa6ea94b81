//! HTTP message and client layer over a pluggable native transport.
//!
//! # Overview
//! Builds transport options from a declarative request, lets a `Transport`
//! perform the actual round-trip, then splits the raw output into header
//! section and body and parses it into a `Response`. The core never touches
//! the network itself, which keeps it deterministic and easy to test.
//!
//! # Design
//! - `ByteStream` is the body of every message: one owned resource with
//!   read/write/seek semantics and an explicit detach/close lifecycle.
//! - `HeaderMap` keeps header casing but looks names up case-insensitively.
//! - `Message` is the shared request/response contract; `with_*` methods
//!   consume and return the message.
//! - `RequestHandle` is the single-use transport handle; it is closed on
//!   every exit path.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod message;
pub mod request;
pub mod response;
pub mod stream;
pub mod transport;

pub use client::Client;
pub use config::Configuration;
pub use error::{Error, Result};
pub use headers::{HeaderEntity, HeaderField, HeaderMap};
pub use message::Message;
pub use request::{Data, Request, UriInput};
pub use response::Response;
pub use stream::ByteStream;
pub use transport::{
    DebugSink, HandleState, RequestHandle, Transport, TransportInfo, TransportOption,
};
pub use url::Url;
