//! Synchronous client tying request building, transport execution and
//! response parsing together.
//!
//! # Design
//! `Client` owns the transport and a shared configuration and nothing else;
//! every call builds its own `Request`, handle and body stream. A call runs
//! start to finish on the caller's thread. Transport failures are reported,
//! never retried.

use std::sync::Arc;

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::headers::{HeaderEntity, HeaderMap};
use crate::request::{Data, Request, DELETE, GET, HEAD, PATCH, POST, PUT};
use crate::response::Response;
use crate::transport::Transport;

pub struct Client<T: Transport> {
    transport: T,
    configuration: Arc<Configuration>,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self::with_configuration(transport, Configuration::default())
    }

    pub fn with_configuration(transport: T, configuration: Configuration) -> Self {
        Self {
            transport,
            configuration: Arc::new(configuration),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn head(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        self.send_request(self.request(url, headers, Data::new(), HEAD)?)
    }

    pub fn get(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        self.send_request(self.request(url, headers, Data::new(), GET)?)
    }

    /// GET with `data` appended to the URL as a query string.
    pub fn get_with_query(&self, url: &str, data: Data, headers: &[(&str, &str)]) -> Result<Response> {
        self.send_request(self.request(url, headers, data, GET)?)
    }

    pub fn post(&self, url: &str, data: Data, headers: &[(&str, &str)]) -> Result<Response> {
        self.send_request(self.request(url, headers, data, POST)?)
    }

    pub fn put(&self, url: &str, data: Data, headers: &[(&str, &str)]) -> Result<Response> {
        self.send_request(self.request(url, headers, data, PUT)?)
    }

    pub fn patch(&self, url: &str, data: Data, headers: &[(&str, &str)]) -> Result<Response> {
        self.send_request(self.request(url, headers, data, PATCH)?)
    }

    pub fn delete(&self, url: &str, headers: &[(&str, &str)]) -> Result<Response> {
        self.send_request(self.request(url, headers, Data::new(), DELETE)?)
    }

    /// Build a request bound to this client's configuration.
    pub fn request(
        &self,
        url: &str,
        headers: &[(&str, &str)],
        data: Data,
        method: &str,
    ) -> Result<Request> {
        let headers: HeaderMap = headers.iter().copied().collect();
        Request::new(Arc::clone(&self.configuration), url, headers, data, method)
    }

    /// Execute `request` once and assemble the response.
    ///
    /// The transport handle is closed before this returns, whatever the
    /// outcome.
    pub fn send_request(&self, mut request: Request) -> Result<Response> {
        log::debug!("{} {}", request.method(), request.uri());

        let mut handle = request
            .request_handle(&self.transport)?
            .ok_or_else(|| Error::Client("request handle was not initiated".to_string()))?;

        let raw = handle.execute()?;
        let info = handle.info()?;
        let errno = handle.error_number()?;
        let error = handle.error_message()?;
        handle.close();

        let status_code = match info.http_code {
            Some(code) if errno == 0 && code != 0 => code,
            _ => {
                log::warn!(
                    "{} {} failed: errno {errno}: {error}",
                    request.method(),
                    request.uri()
                );
                return Err(Error::Client(error));
            }
        };

        let split = info.header_size.min(raw.len());
        let (head, body) = raw.split_at(split);
        let entity = HeaderEntity::parse(head)?;
        log::debug!(
            "{} {} -> {status_code} ({} body bytes)",
            request.method(),
            request.uri(),
            body.len()
        );

        Ok(Response::assemble(entity, status_code, body))
    }
}
