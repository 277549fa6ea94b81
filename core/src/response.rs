//! Incoming response assembled from a parsed head and the body bytes.

use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::headers::{HeaderEntity, HeaderMap};
use crate::message::Message;
use crate::stream::ByteStream;

/// A response value.
///
/// Status code and reason phrase fall back to the parsed status line unless
/// set explicitly with `with_status`.
#[derive(Debug)]
pub struct Response {
    entity: HeaderEntity,
    body: Option<ByteStream>,
    status_code: Option<u16>,
    reason_phrase: Option<String>,
}

impl Response {
    pub fn new(entity: HeaderEntity) -> Self {
        Self {
            entity,
            body: None,
            status_code: None,
            reason_phrase: None,
        }
    }

    /// Build the response for one executed call: `status_code` comes from the
    /// transport, the reason from the parsed head, the body from the bytes
    /// after the head.
    pub fn assemble(entity: HeaderEntity, status_code: u16, body: &[u8]) -> Self {
        let reason = entity.message().to_string();
        Self::new(entity)
            .with_body(body)
            .with_status(status_code, reason)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code.unwrap_or_else(|| self.entity.code())
    }

    pub fn reason_phrase(&self) -> &str {
        self.reason_phrase
            .as_deref()
            .unwrap_or_else(|| self.entity.message())
    }

    pub fn with_status(mut self, code: u16, reason_phrase: impl Into<String>) -> Self {
        self.status_code = Some(code);
        self.reason_phrase = Some(reason_phrase.into());
        self
    }

    pub fn header_entity(&self) -> &HeaderEntity {
        &self.entity
    }

    /// Decode the whole body as JSON.
    pub fn json<T: DeserializeOwned>(&mut self) -> Result<T> {
        let bytes = self.body.as_mut().map(ByteStream::to_bytes).unwrap_or_default();
        serde_json::from_slice(&bytes).map_err(Error::from)
    }
}

impl Message for Response {
    fn protocol_version(&self) -> &str {
        self.entity.protocol()
    }

    fn set_protocol_version(&mut self, version: String) {
        self.entity.set_protocol(version);
    }

    fn header_map(&self) -> &HeaderMap {
        self.entity.fields()
    }

    fn header_map_mut(&mut self) -> &mut HeaderMap {
        self.entity.fields_mut()
    }

    fn body(&mut self) -> Option<&mut ByteStream> {
        self.body.as_mut()
    }

    fn set_body(&mut self, body: ByteStream) {
        self.body = Some(body);
    }
}
