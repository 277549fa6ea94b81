//! Outgoing request and its translation into transport options.
//!
//! # Design
//! A `Request` is plain data: method, URI, headers, data map, optional body
//! and the client's configuration. `transport_options` derives everything the
//! transport needs from that data without touching the transport; `request_handle`
//! acquires a handle, opens the debug sink if configured, and applies the
//! options. The handle is single-use, so `Client::send_request` consumes the
//! request.
//!
//! Outgoing headers get two rewrites before they reach the wire: a
//! `User-Agent` header is lifted out into the dedicated option, and the
//! pseudo-header `type` expands into `Accept` plus `Content-Type`. A
//! form-encoded payload without a caller-supplied `Content-Type` gets
//! `application/x-www-form-urlencoded`.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use url::Url;

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::headers::HeaderMap;
use crate::message::Message;
use crate::stream::ByteStream;
use crate::transport::{DebugSink, RequestHandle, Transport, TransportOption};

/// Request data: query parameters for GET, payload for POST/PUT/PATCH.
pub type Data = Map<String, Value>;

pub const GET: &str = "GET";
pub const HEAD: &str = "HEAD";
pub const POST: &str = "POST";
pub const PUT: &str = "PUT";
pub const PATCH: &str = "PATCH";
pub const DELETE: &str = "DELETE";

const JSON: &str = "application/json";
const XML: &str = "application/xml";
const FORM: &str = "application/x-www-form-urlencoded";
const TYPE_ALIAS: &str = "type";
const DEFAULT_PROTOCOL: &str = "HTTP/1.1";

/// A request URI, either already parsed or still a raw string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UriInput {
    Parsed(Url),
    Raw(String),
}

impl From<Url> for UriInput {
    fn from(url: Url) -> Self {
        UriInput::Parsed(url)
    }
}

impl From<&str> for UriInput {
    fn from(raw: &str) -> Self {
        UriInput::Raw(raw.to_string())
    }
}

impl From<String> for UriInput {
    fn from(raw: String) -> Self {
        UriInput::Raw(raw)
    }
}

pub struct Request {
    config: Arc<Configuration>,
    method: String,
    uri: Url,
    request_target: Option<String>,
    headers: HeaderMap,
    data: Data,
    body: Option<ByteStream>,
    protocol: String,
}

impl Request {
    /// Validate the method and resolve the URI.
    ///
    /// For a GET given a raw string and non-empty `data`, the data is appended
    /// as a query string before parsing. A pre-parsed `Url` is used untouched.
    pub fn new(
        config: Arc<Configuration>,
        uri: impl Into<UriInput>,
        headers: HeaderMap,
        data: Data,
        method: &str,
    ) -> Result<Self> {
        let method = normalize_method(method)?;
        let uri = match uri.into() {
            UriInput::Parsed(url) => url,
            UriInput::Raw(raw) => {
                let raw = if method == GET && !data.is_empty() {
                    append_query(&raw, &data)
                } else {
                    raw
                };
                parse_uri(&raw)?
            }
        };

        Ok(Self {
            config,
            method,
            uri,
            request_target: None,
            headers,
            data,
            body: None,
            protocol: DEFAULT_PROTOCOL.to_string(),
        })
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn with_method(mut self, method: &str) -> Result<Self> {
        self.method = normalize_method(method)?;
        Ok(self)
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn with_uri(mut self, uri: Url) -> Self {
        self.uri = uri;
        self
    }

    /// Path plus query, unless overridden with `with_request_target`.
    pub fn request_target(&self) -> String {
        if let Some(target) = &self.request_target {
            return target.clone();
        }
        let mut target = match self.uri.path() {
            "" => "/".to_string(),
            path => path.to_string(),
        };
        if let Some(query) = self.uri.query().filter(|q| !q.is_empty()) {
            target.push('?');
            target.push_str(query);
        }
        target
    }

    pub fn with_request_target(mut self, target: &str) -> Result<Self> {
        if target.chars().any(char::is_whitespace) {
            return Err(Error::InvalidArgument(
                "request target cannot contain whitespace".to_string(),
            ));
        }
        self.request_target = Some(target.to_string());
        Ok(self)
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Every option the transport needs for this request, in the order it is
    /// applied. The debug sink is not included; it is opened by
    /// `request_handle`.
    pub fn transport_options(&mut self) -> Result<Vec<TransportOption>> {
        let mut headers = self.headers.clone();
        let user_agent = headers
            .take("User-Agent")
            .unwrap_or_else(|| self.config.user_agent().to_string());
        if let Some(alias) = headers.take(TYPE_ALIAS) {
            let mime = content_type_for(&alias)?;
            headers.set("Accept", mime.clone());
            headers.set("Content-Type", mime);
        }
        let is_json = headers
            .get("Content-Type")
            .is_some_and(|field| field.value() == JSON);
        let sends_form = self.carries_body() && self.body.is_none() && !is_json;
        if sends_form && !headers.contains("Content-Type") {
            headers.set("Content-Type", FORM);
        }

        let mut options = vec![TransportOption::HttpHeader(
            headers.iter().map(ToString::to_string).collect(),
        )];
        if self.uri.scheme() == "https" {
            options.push(TransportOption::SslVerifyPeer(true));
            options.push(TransportOption::SslVerifyHost(2));
        }
        options.extend([
            TransportOption::ReturnTransfer(true),
            TransportOption::FollowLocation(true),
            TransportOption::MaxRedirects(1),
            TransportOption::UserAgent(user_agent),
            TransportOption::Header(true),
            TransportOption::NoBody(self.method == HEAD),
            TransportOption::Url(self.uri.to_string()),
            TransportOption::CustomRequest(self.method.clone()),
        ]);

        if self.method == POST {
            options.push(TransportOption::Post(true));
        }
        if self.carries_body() {
            options.push(TransportOption::PostFields(self.payload(is_json)?));
        }

        options.push(TransportOption::Timeout(self.config.timeout()));
        if let (Some(username), Some(password)) = (self.config.username(), self.config.password()) {
            if !username.is_empty() && !password.is_empty() {
                options.push(TransportOption::Username(username.to_string()));
                options.push(TransportOption::Password(password.to_string()));
            }
        }
        if let Some(referer) = self.config.referer().filter(|r| !r.is_empty()) {
            options.push(TransportOption::Referer(referer.to_string()));
        }
        if self.config.debug() {
            options.push(TransportOption::Verbose(true));
        }
        Ok(options)
    }

    /// Acquire and configure a transport handle for this request.
    ///
    /// `Ok(None)` means the transport could not allocate a handle; the caller
    /// decides how to report that.
    pub fn request_handle<'t, T: Transport>(
        &mut self,
        transport: &'t T,
    ) -> Result<Option<RequestHandle<'t, T>>> {
        let Some(mut handle) = RequestHandle::acquire(transport) else {
            return Ok(None);
        };
        let mut options = self.transport_options()?;
        if self.config.debug() {
            options.push(TransportOption::Stderr(DebugSink::open(
                self.config.debug_file(),
            )?));
        }
        handle.configure(options)?;
        Ok(Some(handle))
    }

    fn carries_body(&self) -> bool {
        matches!(self.method.as_str(), POST | PUT | PATCH)
    }

    /// Explicit body first, then JSON or form encoding of the data map.
    fn payload(&mut self, is_json: bool) -> Result<Vec<u8>> {
        if let Some(body) = self.body.as_mut() {
            return Ok(body.to_bytes());
        }
        if is_json {
            return Ok(serde_json::to_vec(&self.data)?);
        }
        Ok(form_encode(&self.data).into_bytes())
    }
}

impl Message for Request {
    fn protocol_version(&self) -> &str {
        &self.protocol
    }

    fn set_protocol_version(&mut self, version: String) {
        self.protocol = version;
    }

    fn header_map(&self) -> &HeaderMap {
        &self.headers
    }

    fn header_map_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn body(&mut self) -> Option<&mut ByteStream> {
        self.body.as_mut()
    }

    fn set_body(&mut self, body: ByteStream) {
        self.body = Some(body);
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri.as_str())
            .field("headers", &self.headers)
            .field("data", &self.data)
            .field("body", &self.body)
            .finish()
    }
}

fn normalize_method(method: &str) -> Result<String> {
    if method.trim().is_empty() {
        return Err(Error::InvalidArgument(
            "method must be a non-empty string".to_string(),
        ));
    }
    Ok(method.to_ascii_uppercase())
}

fn parse_uri(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::InvalidArgument(format!("invalid URI {raw:?}: {e}")))
}

/// Map the `type` pseudo-header to a media type.
fn content_type_for(alias: &str) -> Result<String> {
    if alias.contains('/') {
        return Ok(alias.to_string());
    }
    match alias {
        "json" => Ok(JSON.to_string()),
        "xml" => Ok(XML.to_string()),
        other => Err(Error::Client(format!("unknown type alias '{other}'"))),
    }
}

/// The fragment is set aside so the query lands before it.
fn append_query(raw: &str, data: &Data) -> String {
    let (base, fragment) = match raw.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (raw, None),
    };
    let separator = if base.ends_with(['?', '&']) {
        ""
    } else if base.contains('?') {
        "&"
    } else {
        "?"
    };
    let mut uri = format!("{base}{separator}{}", form_encode(data));
    if let Some(fragment) = fragment {
        uri.push('#');
        uri.push_str(fragment);
    }
    uri
}

fn form_encode(data: &Data) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(data.iter().map(|(k, v)| (k, plain_value(v))))
        .finish()
}

/// Strings go out bare; everything else as its JSON text.
fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::testing::ScriptedTransport;

    fn data(value: Value) -> Data {
        match value {
            Value::Object(map) => map,
            _ => panic!("data must be an object"),
        }
    }

    fn build(uri: &str, headers: &[(&str, &str)], data: Data, method: &str) -> Request {
        Request::new(
            Arc::new(Configuration::default()),
            uri,
            headers.iter().copied().collect(),
            data,
            method,
        )
        .unwrap()
    }

    fn option<'a>(options: &'a [TransportOption], name: &str) -> Option<&'a TransportOption> {
        options.iter().find(|o| o.name() == name)
    }

    #[test]
    fn creates_post_request_with_raw_body() {
        let mut request = build("http://localhost", &[], Data::new(), "POST")
            .with_body(r#"{"unit": "test"}"#);
        assert_eq!(request.method(), "POST");
        assert_eq!(request.uri().as_str(), "http://localhost/");
        assert_eq!(request.body().unwrap().to_string_lossy(), r#"{"unit": "test"}"#);

        let moved = request.with_uri(Url::parse("https://www.google.com").unwrap());
        assert_eq!(moved.uri().host_str(), Some("www.google.com"));
    }

    #[test]
    fn rejects_blank_methods() {
        let result = Request::new(
            Arc::new(Configuration::default()),
            "http://h/",
            HeaderMap::new(),
            Data::new(),
            "  ",
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let request = build("http://h/", &[], Data::new(), "get");
        assert_eq!(request.method(), "GET");
        assert!(matches!(request.with_method(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn with_method_upper_cases() {
        let request = build("http://h/", &[], Data::new(), "GET")
            .with_method("patch")
            .unwrap();
        assert_eq!(request.method(), "PATCH");
    }

    #[test]
    fn rejects_unparseable_uri() {
        let result = Request::new(
            Arc::new(Configuration::default()),
            "not a uri",
            HeaderMap::new(),
            Data::new(),
            "GET",
        );
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn get_data_becomes_query_string() {
        let plain = build("http://h/path", &[], data(json!({"a": "1"})), "GET");
        assert_eq!(plain.uri().as_str(), "http://h/path?a=1");

        let existing = build("http://h/path?x=1", &[], data(json!({"a": "1"})), "GET");
        assert_eq!(existing.uri().as_str(), "http://h/path?x=1&a=1");

        let mixed = build("http://h/p", &[], data(json!({"n": 2, "q": "a b"})), "GET");
        assert_eq!(mixed.uri().as_str(), "http://h/p?n=2&q=a+b");
    }

    #[test]
    fn get_query_goes_before_the_fragment() {
        let request = build("http://h/p#frag", &[], data(json!({"a": "1"})), "GET");
        assert_eq!(request.uri().query(), Some("a=1"));
        assert_eq!(request.uri().fragment(), Some("frag"));
        assert_eq!(request.uri().as_str(), "http://h/p?a=1#frag");

        // a question mark inside the fragment does not count as a query
        let request = build("http://h/p#x?y", &[], data(json!({"a": "1"})), "GET");
        assert_eq!(request.uri().as_str(), "http://h/p?a=1#x?y");

        let request = build("http://h/p?x=1#top", &[], data(json!({"a": "1"})), "GET");
        assert_eq!(request.uri().as_str(), "http://h/p?x=1&a=1#top");
    }

    #[test]
    fn parsed_uri_is_not_extended_with_query() {
        let url = Url::parse("http://h/path").unwrap();
        let request = Request::new(
            Arc::new(Configuration::default()),
            url,
            HeaderMap::new(),
            data(json!({"a": "1"})),
            "GET",
        )
        .unwrap();
        assert_eq!(request.uri().as_str(), "http://h/path");
    }

    #[test]
    fn request_target_defaults_to_path_and_query() {
        let request = build("http://h/a/b?c=d", &[], Data::new(), "GET");
        assert_eq!(request.request_target(), "/a/b?c=d");

        let request = request.with_request_target("*").unwrap();
        assert_eq!(request.request_target(), "*");
        assert!(matches!(
            request.with_request_target("/a b"),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn type_alias_expands_into_accept_and_content_type() {
        let mut request = build("http://h/", &[("type", "json"), ("X-Id", "7")], Data::new(), "GET");
        let options = request.transport_options().unwrap();
        let Some(TransportOption::HttpHeader(lines)) = option(&options, "HTTPHEADER") else {
            panic!("missing header option");
        };
        assert_eq!(
            lines,
            &vec![
                "X-Id: 7".to_string(),
                "Accept: application/json".to_string(),
                "Content-Type: application/json".to_string(),
            ]
        );
    }

    #[test]
    fn type_alias_with_slash_is_used_verbatim() {
        let mut request = build("http://h/", &[("type", "text/csv")], Data::new(), "GET");
        let options = request.transport_options().unwrap();
        let Some(TransportOption::HttpHeader(lines)) = option(&options, "HTTPHEADER") else {
            panic!("missing header option");
        };
        assert!(lines.contains(&"Content-Type: text/csv".to_string()));
        assert!(lines.contains(&"Accept: text/csv".to_string()));
    }

    #[test]
    fn unknown_type_alias_is_a_client_error() {
        let mut request = build("http://h/", &[("type", "unknown")], Data::new(), "GET");
        match request.transport_options() {
            Err(Error::Client(message)) => assert!(message.contains("unknown")),
            other => panic!("expected client error, got {other:?}"),
        }
    }

    #[test]
    fn user_agent_header_overrides_configuration() {
        let mut request = build("http://h/", &[("user-agent", "custom/2")], Data::new(), "GET");
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "USERAGENT"),
            Some(&TransportOption::UserAgent("custom/2".to_string()))
        );
        assert_eq!(
            option(&options, "HTTPHEADER"),
            Some(&TransportOption::HttpHeader(Vec::new()))
        );

        let mut request = build("http://h/", &[], Data::new(), "GET");
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "USERAGENT"),
            Some(&TransportOption::UserAgent(
                Configuration::default().user_agent().to_string()
            ))
        );
    }

    #[test]
    fn json_content_type_encodes_data_for_write_methods() {
        for method in [POST, PUT, PATCH] {
            let mut request = build(
                "http://h/",
                &[("Content-Type", "application/json")],
                data(json!({"title": "x", "done": true})),
                method,
            );
            let options = request.transport_options().unwrap();
            assert_eq!(
                option(&options, "POSTFIELDS"),
                Some(&TransportOption::PostFields(br#"{"title":"x","done":true}"#.to_vec())),
                "{method}"
            );
        }
    }

    #[test]
    fn explicit_body_wins_over_json_data() {
        let mut request = build(
            "http://h/",
            &[("type", "json")],
            data(json!({"ignored": 1})),
            "PUT",
        )
        .with_body("raw-body");
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "POSTFIELDS"),
            Some(&TransportOption::PostFields(b"raw-body".to_vec()))
        );
    }

    #[test]
    fn non_json_data_is_form_encoded() {
        let mut request = build("http://h/", &[], data(json!({"a": "1", "b": "x y"})), "POST");
        let options = request.transport_options().unwrap();
        assert_eq!(option(&options, "POST"), Some(&TransportOption::Post(true)));
        assert_eq!(
            option(&options, "POSTFIELDS"),
            Some(&TransportOption::PostFields(b"a=1&b=x+y".to_vec()))
        );
        assert_eq!(
            option(&options, "HTTPHEADER"),
            Some(&TransportOption::HttpHeader(vec![
                "Content-Type: application/x-www-form-urlencoded".to_string()
            ]))
        );
    }

    #[test]
    fn form_content_type_respects_caller_choice() {
        let mut request = build(
            "http://h/",
            &[("content-type", "text/plain")],
            data(json!({"a": "1"})),
            "PATCH",
        );
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "HTTPHEADER"),
            Some(&TransportOption::HttpHeader(vec!["content-type: text/plain".to_string()]))
        );

        let mut request = build("http://h/", &[], Data::new(), "PUT").with_body("raw");
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "HTTPHEADER"),
            Some(&TransportOption::HttpHeader(Vec::new()))
        );

        let mut request = build("http://h/", &[], data(json!({"a": "1"})), "GET");
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "HTTPHEADER"),
            Some(&TransportOption::HttpHeader(Vec::new()))
        );
    }

    #[test]
    fn read_methods_never_send_a_body() {
        for method in [GET, HEAD, DELETE] {
            let mut request = build("http://h/", &[], Data::new(), method).with_body("nope");
            let options = request.transport_options().unwrap();
            assert!(option(&options, "POSTFIELDS").is_none(), "{method}");
            assert!(option(&options, "POST").is_none(), "{method}");
        }
    }

    #[test]
    fn head_requests_expect_no_body() {
        let mut request = build("http://h/", &[], Data::new(), "HEAD");
        let options = request.transport_options().unwrap();
        assert_eq!(option(&options, "NOBODY"), Some(&TransportOption::NoBody(true)));
    }

    #[test]
    fn https_enables_certificate_verification() {
        let mut secure = build("https://h/", &[], Data::new(), "GET");
        let options = secure.transport_options().unwrap();
        assert_eq!(option(&options, "SSL_VERIFYPEER"), Some(&TransportOption::SslVerifyPeer(true)));
        assert_eq!(option(&options, "SSL_VERIFYHOST"), Some(&TransportOption::SslVerifyHost(2)));

        let mut plain = build("http://h/", &[], Data::new(), "GET");
        let options = plain.transport_options().unwrap();
        assert!(option(&options, "SSL_VERIFYPEER").is_none());
    }

    #[test]
    fn fixed_options_cap_redirects_at_one() {
        let mut request = build("http://h/x", &[], Data::new(), "delete");
        let options = request.transport_options().unwrap();
        assert_eq!(option(&options, "FOLLOWLOCATION"), Some(&TransportOption::FollowLocation(true)));
        assert_eq!(option(&options, "MAXREDIRS"), Some(&TransportOption::MaxRedirects(1)));
        assert_eq!(option(&options, "HEADER"), Some(&TransportOption::Header(true)));
        assert_eq!(option(&options, "URL"), Some(&TransportOption::Url("http://h/x".to_string())));
        assert_eq!(
            option(&options, "CUSTOMREQUEST"),
            Some(&TransportOption::CustomRequest("DELETE".to_string()))
        );
    }

    #[test]
    fn configuration_supplies_timeout_auth_and_referer() {
        let config = Configuration::new()
            .with_timeout(std::time::Duration::from_secs(7))
            .with_credentials("user", "pass")
            .with_referer("https://ref/");
        let mut request = Request::new(
            Arc::new(config),
            "http://h/",
            HeaderMap::new(),
            Data::new(),
            "GET",
        )
        .unwrap();
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "TIMEOUT"),
            Some(&TransportOption::Timeout(std::time::Duration::from_secs(7)))
        );
        assert_eq!(option(&options, "USERNAME"), Some(&TransportOption::Username("user".to_string())));
        assert_eq!(option(&options, "PASSWORD"), Some(&TransportOption::Password("pass".to_string())));
        assert_eq!(option(&options, "REFERER"), Some(&TransportOption::Referer("https://ref/".to_string())));
        assert!(option(&options, "VERBOSE").is_none());
    }

    #[test]
    fn sub_second_timeout_reaches_the_transport() {
        let config = Configuration::new().with_timeout(std::time::Duration::from_millis(500));
        let mut request =
            Request::new(Arc::new(config), "http://h/", HeaderMap::new(), Data::new(), "GET").unwrap();
        let options = request.transport_options().unwrap();
        assert_eq!(
            option(&options, "TIMEOUT"),
            Some(&TransportOption::Timeout(std::time::Duration::from_millis(500)))
        );
    }

    #[test]
    fn debug_configuration_opens_sink_on_handle() {
        let path = std::env::temp_dir().join(format!("httpmsg-request-{}.log", std::process::id()));
        let config = Configuration::new().with_debug(&path);
        let mut request = Request::new(
            Arc::new(config),
            "http://h/",
            HeaderMap::new(),
            Data::new(),
            "GET",
        )
        .unwrap();
        let transport = ScriptedTransport::default();
        let handle = request.request_handle(&transport).unwrap().unwrap();
        handle.close();

        let options = transport.options.borrow();
        assert_eq!(option(&options, "VERBOSE"), Some(&TransportOption::Verbose(true)));
        match option(&options, "STDERR") {
            Some(TransportOption::Stderr(sink)) => assert_eq!(sink.path(), path.as_path()),
            other => panic!("expected debug sink, got {other:?}"),
        }
        assert_eq!(transport.count("close"), 1);
        drop(options);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn failed_init_returns_no_handle() {
        let mut request = build("http://h/", &[], Data::new(), "GET");
        let transport = ScriptedTransport {
            fail_init: true,
            ..ScriptedTransport::default()
        };
        assert!(request.request_handle(&transport).unwrap().is_none());
    }

    #[test]
    fn option_errors_still_close_the_handle() {
        let mut request = build("http://h/", &[("type", "bogus")], Data::new(), "GET");
        let transport = ScriptedTransport::default();
        assert!(matches!(request.request_handle(&transport), Err(Error::Client(_))));
        assert_eq!(transport.count("init"), 1);
        assert_eq!(transport.count("close"), 1);
    }

    #[test]
    fn header_mutators_follow_message_contract() {
        let request = build("http://h/", &[("Accept", "text/html")], Data::new(), "GET")
            .with_added_header("accept", "text/plain")
            .with_header("X-Trace", "1");
        assert!(request.has_header("ACCEPT"));
        assert_eq!(request.header_line("accept"), "text/html, text/plain");

        let request = request.with_header("Accept", "application/json").without_header("x-trace");
        assert_eq!(request.header("accept"), vec!["application/json"]);
        assert!(!request.has_header("X-Trace"));
        assert_eq!(request.header_line("missing"), "");

        let request = request.with_protocol_version("HTTP/2");
        assert_eq!(request.protocol_version(), "HTTP/2");
    }
}
