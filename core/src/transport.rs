//! The transport capability and the single-use handle that drives it.
//!
//! # Design
//! Network I/O lives outside this crate. A `Transport` hands out opaque
//! handles, accepts options for them, executes them once, reports what
//! happened, and closes them. This keeps request building and response
//! parsing deterministic, the same split as building an `HttpRequest` here
//! and letting the host perform the round-trip.
//!
//! `RequestHandle` wraps one raw handle and walks it through
//! `Uninitialized -> Configured -> Executed -> Closed`. Dropping the guard
//! closes the raw handle, so every exit path releases it exactly once.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// One setting applied to a transport handle before execution.
#[derive(Debug, PartialEq)]
pub enum TransportOption {
    /// Method sent on the request line, verbatim.
    CustomRequest(String),
    /// Outgoing header lines, each `Name: value`.
    HttpHeader(Vec<String>),
    Url(String),
    /// Return the response as bytes from `execute` instead of printing it.
    ReturnTransfer(bool),
    FollowLocation(bool),
    MaxRedirects(u32),
    UserAgent(String),
    /// Include the response header section in the bytes returned by `execute`.
    Header(bool),
    /// Do not expect a response body (HEAD).
    NoBody(bool),
    Post(bool),
    PostFields(Vec<u8>),
    SslVerifyPeer(bool),
    /// 2 verifies that the certificate matches the host name.
    SslVerifyHost(u8),
    Timeout(Duration),
    Username(String),
    Password(String),
    Referer(String),
    Verbose(bool),
    /// Destination of verbose output. Owned by the handle until it closes.
    Stderr(DebugSink),
}

impl TransportOption {
    pub fn name(&self) -> &'static str {
        match self {
            TransportOption::CustomRequest(_) => "CUSTOMREQUEST",
            TransportOption::HttpHeader(_) => "HTTPHEADER",
            TransportOption::Url(_) => "URL",
            TransportOption::ReturnTransfer(_) => "RETURNTRANSFER",
            TransportOption::FollowLocation(_) => "FOLLOWLOCATION",
            TransportOption::MaxRedirects(_) => "MAXREDIRS",
            TransportOption::UserAgent(_) => "USERAGENT",
            TransportOption::Header(_) => "HEADER",
            TransportOption::NoBody(_) => "NOBODY",
            TransportOption::Post(_) => "POST",
            TransportOption::PostFields(_) => "POSTFIELDS",
            TransportOption::SslVerifyPeer(_) => "SSL_VERIFYPEER",
            TransportOption::SslVerifyHost(_) => "SSL_VERIFYHOST",
            TransportOption::Timeout(_) => "TIMEOUT",
            TransportOption::Username(_) => "USERNAME",
            TransportOption::Password(_) => "PASSWORD",
            TransportOption::Referer(_) => "REFERER",
            TransportOption::Verbose(_) => "VERBOSE",
            TransportOption::Stderr(_) => "STDERR",
        }
    }
}

/// What the transport reports about an executed handle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportInfo {
    /// Status code of the final response; `None` when nothing was received.
    pub http_code: Option<u16>,
    /// Length of the header section at the start of the executed bytes.
    pub header_size: usize,
    pub effective_url: Option<String>,
    pub redirect_count: u32,
}

/// Capability of the native engine that performs the network I/O.
pub trait Transport {
    type Handle;

    /// Allocate a handle, or `None` when the engine cannot provide one.
    fn init(&self) -> Option<Self::Handle>;

    /// Apply one option. Returns `false` when the engine rejects it.
    fn set_option(&self, handle: &mut Self::Handle, option: TransportOption) -> bool;

    /// Perform the call and return the raw output (header section + body).
    fn execute(&self, handle: &mut Self::Handle) -> Vec<u8>;

    fn info(&self, handle: &Self::Handle) -> TransportInfo;

    /// Zero when the last execution succeeded.
    fn error_number(&self, handle: &Self::Handle) -> i32;

    fn error_message(&self, handle: &Self::Handle) -> String;

    fn close(&self, handle: Self::Handle);
}

/// Lifecycle of a `RequestHandle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleState {
    Uninitialized,
    Configured,
    Executed,
    Closed,
}

/// A transport handle good for exactly one execution.
pub struct RequestHandle<'t, T: Transport> {
    transport: &'t T,
    raw: Option<T::Handle>,
    state: HandleState,
}

impl<'t, T: Transport> RequestHandle<'t, T> {
    /// Ask the transport for a fresh handle.
    pub fn acquire(transport: &'t T) -> Option<Self> {
        let raw = transport.init()?;
        Some(Self {
            transport,
            raw: Some(raw),
            state: HandleState::Uninitialized,
        })
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    /// Apply `options` in order. Fails on the first option the transport
    /// rejects, or when the handle was already executed.
    pub fn configure(&mut self, options: Vec<TransportOption>) -> Result<()> {
        if !matches!(
            self.state,
            HandleState::Uninitialized | HandleState::Configured
        ) {
            return Err(Error::Client(format!(
                "cannot configure a handle in state {:?}",
                self.state
            )));
        }
        let transport = self.transport;
        let raw = self.raw_mut()?;
        for option in options {
            let name = option.name();
            if !transport.set_option(raw, option) {
                return Err(Error::Client(format!("transport rejected option {name}")));
            }
        }
        self.state = HandleState::Configured;
        Ok(())
    }

    /// Run the configured call once.
    pub fn execute(&mut self) -> Result<Vec<u8>> {
        if self.state != HandleState::Configured {
            return Err(Error::Client(format!(
                "cannot execute a handle in state {:?}",
                self.state
            )));
        }
        let transport = self.transport;
        let output = transport.execute(self.raw_mut()?);
        self.state = HandleState::Executed;
        Ok(output)
    }

    pub fn info(&self) -> Result<TransportInfo> {
        Ok(self.transport.info(self.raw()?))
    }

    pub fn error_number(&self) -> Result<i32> {
        Ok(self.transport.error_number(self.raw()?))
    }

    pub fn error_message(&self) -> Result<String> {
        Ok(self.transport.error_message(self.raw()?))
    }

    /// Release the raw handle now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(raw) = self.raw.take() {
            self.transport.close(raw);
            log::debug!("transport handle closed after state {:?}", self.state);
            self.state = HandleState::Closed;
        }
    }

    fn raw(&self) -> Result<&T::Handle> {
        self.raw
            .as_ref()
            .ok_or_else(|| Error::Client("transport handle is closed".to_string()))
    }

    fn raw_mut(&mut self) -> Result<&mut T::Handle> {
        self.raw
            .as_mut()
            .ok_or_else(|| Error::Client("transport handle is closed".to_string()))
    }
}

impl<T: Transport> Drop for RequestHandle<'_, T> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<T: Transport> fmt::Debug for RequestHandle<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandle")
            .field("state", &self.state)
            .finish()
    }
}

/// Append-only file receiving verbose transport output.
///
/// Opened when a request is turned into a handle and closed together with
/// that handle.
#[derive(Debug)]
pub struct DebugSink {
    path: PathBuf,
    file: File,
}

impl DebugSink {
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Write for DebugSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl PartialEq for DebugSink {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}
