//! Behavior shared by requests and responses.
//!
//! # Design
//! Implementors expose their header collection, protocol version and body
//! slot; everything else is provided. The `with_*` methods take the message
//! by value and hand back the changed message, so a value the caller still
//! holds is never altered behind its back.

use crate::headers::{HeaderField, HeaderMap};
use crate::stream::ByteStream;

pub trait Message: Sized {
    /// Protocol version, e.g. `HTTP/1.1`.
    fn protocol_version(&self) -> &str;

    fn set_protocol_version(&mut self, version: String);

    fn header_map(&self) -> &HeaderMap;

    fn header_map_mut(&mut self) -> &mut HeaderMap;

    /// The body stream, if one was set.
    fn body(&mut self) -> Option<&mut ByteStream>;

    fn set_body(&mut self, body: ByteStream);

    fn has_header(&self, name: &str) -> bool {
        self.header_map().contains(name)
    }

    /// Every value for `name`; empty when absent.
    fn header(&self, name: &str) -> Vec<&str> {
        self.header_map().get_all(name)
    }

    /// Values for `name` joined with `", "`; empty string when absent.
    fn header_line(&self, name: &str) -> String {
        self.header_map().line(name).unwrap_or_default()
    }

    fn with_protocol_version(mut self, version: impl Into<String>) -> Self {
        self.set_protocol_version(version.into());
        self
    }

    /// Replace any existing values for `name`.
    fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_map_mut().set(name, value);
        self
    }

    /// Keep existing values for `name` and append another.
    fn with_added_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.header_map_mut().add(HeaderField::new(name, value));
        self
    }

    fn without_header(mut self, name: &str) -> Self {
        self.header_map_mut().remove(name);
        self
    }

    /// Raw bytes are wrapped in an in-memory stream.
    fn with_body(mut self, body: impl Into<ByteStream>) -> Self {
        self.set_body(body.into());
        self
    }
}
