//! Seekable byte stream used as the body of every message.
//!
//! # Design
//! A `ByteStream` wraps exactly one resource for its lifetime: either an
//! in-memory buffer created from raw bytes, or an externally owned resource
//! (a file, a cursor, anything `Read + Write + Seek`). The cursor lives in the
//! resource itself, so reads and writes share one position the way a file
//! descriptor does.
//!
//! Access flags come from the mode string: writable iff it contains `w`,
//! readable iff it contains `w+` or `r`. In-memory streams always report
//! mode `w+b`.
//!
//! After `detach()` or `close()` the stream has no resource and every
//! operation fails with `Error::Stream`.

use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};

use serde_json::Value;

use crate::error::{Error, Result};

/// Mode reported by streams backed by the in-memory buffer.
pub const MEMORY_MODE: &str = "w+b";

const DETACHED: &str = "stream has no underlying resource";

/// Anything a `ByteStream` can own.
pub trait Resource: Read + Write + Seek + Send {}

impl<T: Read + Write + Seek + Send> Resource for T {}

pub struct ByteStream {
    resource: Option<Box<dyn Resource>>,
    mode: String,
}

impl ByteStream {
    /// Write `bytes` into a fresh in-memory buffer and rewind to the start.
    pub fn new(bytes: impl AsRef<[u8]>) -> Self {
        Self {
            resource: Some(Box::new(Cursor::new(bytes.as_ref().to_vec()))),
            mode: MEMORY_MODE.to_string(),
        }
    }

    /// Wrap an externally owned resource opened with `mode`.
    ///
    /// The resource's current position becomes the stream cursor.
    pub fn from_resource<R: Resource + 'static>(resource: R, mode: &str) -> Self {
        Self {
            resource: Some(Box::new(resource)),
            mode: mode.to_string(),
        }
    }

    /// Read up to `length` bytes from the cursor.
    ///
    /// Returns an empty vector at end of data. A negative length is rejected
    /// before the resource is even looked at.
    pub fn read(&mut self, length: i64) -> Result<Vec<u8>> {
        if length < 0 {
            return Err(Error::InvalidArgument(
                "length must not be negative".to_string(),
            ));
        }
        let readable = self.is_readable();
        let resource = self.resource_mut()?;
        if !readable {
            return Err(Error::Stream("stream is not readable".to_string()));
        }
        let mut chunk = Vec::new();
        Read::take(&mut **resource, length as u64)
            .read_to_end(&mut chunk)
            .map_err(stream_error)?;
        Ok(chunk)
    }

    /// Write `bytes` at the cursor and return how many were accepted.
    pub fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let writable = self.is_writable();
        let resource = self.resource_mut()?;
        if !writable {
            return Err(Error::Stream("stream is not writable".to_string()));
        }
        resource.write_all(bytes).map_err(stream_error)?;
        Ok(bytes.len())
    }

    /// Move the cursor and return its new offset.
    pub fn seek(&mut self, position: SeekFrom) -> Result<u64> {
        self.resource_mut()?.seek(position).map_err(stream_error)
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Current byte offset of the cursor.
    pub fn tell(&mut self) -> Result<u64> {
        self.resource_mut()?.stream_position().map_err(stream_error)
    }

    /// Total length in bytes, or `None` when it cannot be determined.
    pub fn size(&mut self) -> Option<u64> {
        let resource = self.resource.as_mut()?;
        let current = resource.stream_position().ok()?;
        let end = resource.seek(SeekFrom::End(0)).ok()?;
        resource.seek(SeekFrom::Start(current)).ok()?;
        Some(end)
    }

    pub fn eof(&mut self) -> Result<bool> {
        let position = self.tell()?;
        Ok(Some(position) == self.size())
    }

    pub fn is_seekable(&self) -> bool {
        self.resource.is_some()
    }

    pub fn is_writable(&self) -> bool {
        self.resource.is_some() && self.mode.contains('w')
    }

    pub fn is_readable(&self) -> bool {
        self.resource.is_some() && (self.mode.contains("w+") || self.mode.contains('r'))
    }

    /// Everything between the cursor and the end of the stream.
    pub fn contents(&mut self) -> Result<Vec<u8>> {
        let position = self.tell()?;
        let size = self
            .size()
            .ok_or_else(|| Error::Stream("stream size is unknown".to_string()))?;
        self.read(size.saturating_sub(position) as i64)
    }

    /// Best-effort read of the whole stream.
    ///
    /// Rewinds first when seekable. Never fails: an unreadable stream or a
    /// failed read yields an empty vector.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        if !self.is_readable() {
            return Vec::new();
        }
        if self.is_seekable() && self.rewind().is_err() {
            return Vec::new();
        }
        self.contents().unwrap_or_default()
    }

    /// `to_bytes` decoded as UTF-8, replacing invalid sequences.
    pub fn to_string_lossy(&mut self) -> String {
        String::from_utf8_lossy(&self.to_bytes()).into_owned()
    }

    /// Look up one metadata entry: `mode`, `seekable` or `size`.
    pub fn metadata(&mut self, key: &str) -> Option<Value> {
        self.resource.as_ref()?;
        match key {
            "mode" => Some(Value::from(self.mode.clone())),
            "seekable" => Some(Value::from(self.is_seekable())),
            "size" => self.size().map(Value::from),
            _ => None,
        }
    }

    /// Release ownership of the resource and return it.
    ///
    /// The stream is unusable afterwards.
    pub fn detach(&mut self) -> Option<Box<dyn Resource>> {
        self.resource.take()
    }

    /// Flush and drop the resource. Safe to call more than once.
    pub fn close(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            if let Err(err) = resource.flush() {
                log::warn!("flush on close failed: {err}");
            }
        }
    }

    fn resource_mut(&mut self) -> Result<&mut Box<dyn Resource>> {
        self.resource
            .as_mut()
            .ok_or_else(|| Error::Stream(DETACHED.to_string()))
    }
}

fn stream_error(err: std::io::Error) -> Error {
    Error::Stream(err.to_string())
}

impl Default for ByteStream {
    fn default() -> Self {
        Self::new(b"")
    }
}

impl fmt::Debug for ByteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStream")
            .field("mode", &self.mode)
            .field("attached", &self.resource.is_some())
            .finish()
    }
}

impl From<Vec<u8>> for ByteStream {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteStream {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<&str> for ByteStream {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ByteStream {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}
