//! Reusable blocking connection and the request pipeline.
//!
//! A [`Connection`] owns exactly one engine handle for its whole life.
//! Configuration accumulates through plain setters; each verb call translates
//! the accumulated configuration plus the verb-specific options into one
//! blocking engine invocation, assembles the outcome into a
//! [`Response`](crate::Response), captures [`LastRequest`] diagnostics, and
//! resets the handle so the next call starts from a clean slate while the
//! engine may keep the underlying session alive.

mod diagnostics;
mod handler;

pub use diagnostics::{Info, LastRequest};
pub use handler::{ProgressObserver, WriteFunction};

use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Duration;

use curl::easy::{Easy2, Form, List};
use tracing::{debug, instrument, warn};

use crate::error::Error;
use crate::form::FormData;
use crate::global;
use crate::headers::HeaderFields;
use crate::response::Response;
use crate::user_agent;

use self::handler::{BodySink, TransferHandler, UploadSource};

/// Externally observable lifecycle state of a [`Connection`].
///
/// Within one request the pipeline walks configuring, transferring, and back
/// to idle; completed-vs-failed is carried by the returned response and the
/// diagnostics rather than by a state. Terminated is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Ready to issue a request.
    Idle,
    /// Options are being bound to the handle.
    Configuring,
    /// A blocking transfer is in flight on the calling thread.
    Transferring,
    /// The handle has been destroyed; every request fails from now on.
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl Verb {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

/// Request body handed to one transfer.
enum Payload<'a> {
    Empty,
    Bytes(&'a [u8]),
    Form(Form),
}

impl Payload<'_> {
    fn bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Empty | Self::Form(_) => &[],
        }
    }
}

/// A reusable blocking HTTP connection.
///
/// Constructed with an immutable base URL that every request path is
/// appended to. Setters mutate configuration between requests and never
/// fail; the verb methods perform one blocking transfer each. Transfer
/// failures (DNS, connect, timeout, redirect limit, aborted callbacks) are
/// reported through the returned [`Response`](crate::Response), carrying the
/// engine's error code and message; `Err` is reserved for fatal conditions
/// such as use after [`terminate`](Self::terminate).
///
/// Connections are independent of each other and may be driven from
/// separate threads, one blocking request at a time each.
///
/// # Example
///
/// ```no_run
/// use restclient::Connection;
///
/// # fn main() -> Result<(), restclient::Error> {
/// restclient::init()?;
/// let mut conn = Connection::new("https://api.example.test")?;
/// conn.append_header("Accept", "application/json");
/// conn.set_timeout(5);
/// let res = conn.get("/user/1")?;
/// println!("{} {}", res.code, res.body_str());
/// # Ok(())
/// # }
/// ```
pub struct Connection {
    easy: Option<Easy2<TransferHandler>>,
    base_url: String,
    headers: HeaderFields,
    timeout_secs: u64,
    follow_redirects: bool,
    max_redirects: i64,
    no_signal: bool,
    basic_auth: Option<(String, String)>,
    custom_user_agent: Option<String>,
    ca_info_file_path: Option<PathBuf>,
    cert_path: Option<PathBuf>,
    cert_type: Option<String>,
    key_path: Option<PathBuf>,
    key_password: Option<String>,
    verify_peer: bool,
    verify_host: bool,
    proxy: Option<String>,
    unix_socket_path: Option<String>,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    last_request: LastRequest,
    state: ConnectionState,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("base_url", &self.base_url)
            .field("state", &self.state)
            .field("headers", &self.headers)
            .field("timeout_secs", &self.timeout_secs)
            .field("follow_redirects", &self.follow_redirects)
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Creates a connection rooted at `base_url`.
    ///
    /// The base URL is concatenated, unchanged, with the path passed to each
    /// verb method. Pass an empty base URL to supply full URLs per call.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInitialized`] before [`init`](crate::init) has run
    /// and [`Error::Disabled`] after [`disable`](crate::disable).
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        global::ensure_ready()?;
        Ok(Self {
            easy: Some(Easy2::new(TransferHandler::new())),
            base_url: base_url.into(),
            headers: HeaderFields::new(),
            timeout_secs: 0,
            follow_redirects: false,
            max_redirects: -1,
            no_signal: false,
            basic_auth: None,
            custom_user_agent: None,
            ca_info_file_path: None,
            cert_path: None,
            cert_type: None,
            key_path: None,
            key_password: None,
            verify_peer: true,
            verify_host: true,
            proxy: None,
            unix_socket_path: None,
            input_file: None,
            output_file: None,
            last_request: LastRequest::default(),
            state: ConnectionState::Idle,
        })
    }

    /// Sets basic-auth credentials sent with every request.
    pub fn set_basic_auth(&mut self, username: impl Into<String>, password: impl Into<String>) {
        self.basic_auth = Some((username.into(), password.into()));
    }

    /// Sets the transfer timeout in seconds; 0 disables the timeout.
    ///
    /// A non-zero timeout also suppresses engine-internal signal delivery so
    /// a timeout on a non-main thread does not raise a signal.
    pub fn set_timeout(&mut self, seconds: u64) {
        self.timeout_secs = seconds;
    }

    /// Sets a custom User-Agent prefix.
    ///
    /// The effective header value becomes `"<prefix> <product>/<version>"`;
    /// without a prefix just `"<product>/<version>"`. Computed fresh on
    /// every request.
    pub fn set_user_agent(&mut self, prefix: impl Into<String>) {
        self.custom_user_agent = Some(prefix.into());
    }

    /// The effective User-Agent the next request will send.
    #[must_use]
    pub fn user_agent(&self) -> String {
        user_agent::effective_user_agent(self.custom_user_agent.as_deref())
    }

    /// Replaces all request headers with `headers` (no merge).
    pub fn set_headers(&mut self, headers: HeaderFields) {
        self.headers = headers;
    }

    /// Inserts one request header, replacing any existing value for `key`.
    pub fn append_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(key, value);
    }

    /// Headers currently sent with every request.
    #[must_use]
    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    /// Enables or disables redirect following, with no hop bound.
    pub fn follow_redirects(&mut self, follow: bool) {
        self.follow_redirects = follow;
        self.max_redirects = -1;
    }

    /// Enables or disables redirect following with an explicit hop bound.
    ///
    /// Exceeding the bound fails the transfer with the engine's
    /// too-many-redirects code.
    pub fn follow_redirects_with_limit(&mut self, follow: bool, max_redirects: u32) {
        self.follow_redirects = follow;
        self.max_redirects = i64::from(max_redirects);
    }

    /// Suppresses engine-internal signal delivery regardless of timeout.
    pub fn set_no_signal(&mut self, no_signal: bool) {
        self.no_signal = no_signal;
    }

    /// Path to a CA bundle used to verify the peer.
    pub fn set_ca_info_file_path(&mut self, path: impl Into<PathBuf>) {
        self.ca_info_file_path = Some(path.into());
    }

    /// Path to the client certificate.
    pub fn set_cert_path(&mut self, path: impl Into<PathBuf>) {
        self.cert_path = Some(path.into());
    }

    /// Client certificate type, e.g. `"PEM"` or `"DER"`.
    pub fn set_cert_type(&mut self, kind: impl Into<String>) {
        self.cert_type = Some(kind.into());
    }

    /// Path to the client private key.
    pub fn set_key_path(&mut self, path: impl Into<PathBuf>) {
        self.key_path = Some(path.into());
    }

    /// Passphrase for the client private key.
    pub fn set_key_password(&mut self, password: impl Into<String>) {
        self.key_password = Some(password.into());
    }

    /// Controls verification of the peer certificate (on by default).
    pub fn set_verify_peer(&mut self, verify: bool) {
        self.verify_peer = verify;
    }

    /// Controls verification of the certificate hostname (on by default).
    pub fn set_verify_host(&mut self, verify: bool) {
        self.verify_host = verify;
    }

    /// Routes requests through a proxy; an empty URI clears it.
    ///
    /// A non-empty URI that does not already start with an HTTP scheme token
    /// (matched case-insensitively) is stored with `"http://"` prepended.
    pub fn set_proxy(&mut self, uri: impl Into<String>) {
        let uri = uri.into();
        if uri.is_empty() {
            self.proxy = None;
        } else if uri
            .get(..4)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
        {
            self.proxy = Some(uri);
        } else {
            self.proxy = Some(format!("http://{uri}"));
        }
    }

    /// The proxy URI requests are routed through, after normalization.
    #[must_use]
    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    /// Routes requests over a unix domain socket instead of TCP.
    pub fn set_unix_socket_path(&mut self, path: impl Into<String>) {
        self.unix_socket_path = Some(path.into());
    }

    /// Registers a progress observer, replacing any previous one.
    ///
    /// The observer is called periodically during transfers; returning
    /// `false` aborts the transfer, which surfaces as a failed response
    /// carrying the engine's abort code.
    pub fn set_progress_observer(&mut self, observer: impl ProgressObserver + 'static) {
        if let Some(easy) = &mut self.easy {
            easy.get_mut().set_observer(Some(Box::new(observer)));
        }
    }

    /// Removes the progress observer.
    pub fn clear_progress_observer(&mut self) {
        if let Some(easy) = &mut self.easy {
            easy.get_mut().set_observer(None);
        }
    }

    /// Overrides the default body-accumulating sink with `function`.
    ///
    /// While set, response bodies are handed to the function chunk by chunk
    /// and [`Response::body`](crate::Response::body) stays empty. An output
    /// file configured with [`output_to_file`](Self::output_to_file) takes
    /// precedence over the override.
    pub fn set_write_function(&mut self, function: impl WriteFunction + 'static) {
        if let Some(easy) = &mut self.easy {
            easy.get_mut().set_write_function(Some(Box::new(function)));
        }
    }

    /// Restores the default body-accumulating sink.
    pub fn clear_write_function(&mut self) {
        if let Some(easy) = &mut self.easy {
            easy.get_mut().set_write_function(None);
        }
    }

    /// Streams request bodies from `path` instead of the bytes passed to
    /// [`post`](Self::post), [`put`](Self::put) or [`patch`](Self::patch).
    pub fn input_from_file(&mut self, path: impl Into<PathBuf>) {
        self.input_file = Some(path.into());
    }

    /// Stops sourcing request bodies from a file.
    pub fn clear_input_file(&mut self) {
        self.input_file = None;
    }

    /// Streams response bodies into `path`; the in-memory body stays empty.
    ///
    /// The file is created before each transfer and closed on every exit
    /// path, success or failure.
    pub fn output_to_file(&mut self, path: impl Into<PathBuf>) {
        self.output_file = Some(path.into());
    }

    /// Stops redirecting response bodies to a file.
    pub fn clear_output_file(&mut self) {
        self.output_file = None;
    }

    /// Base URL every request path is appended to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Diagnostics of the most recent transfer.
    #[must_use]
    pub fn last_request(&self) -> &LastRequest {
        &self.last_request
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Read-only snapshot of the full configuration plus the diagnostics of
    /// the most recent transfer.
    #[must_use]
    pub fn info(&self) -> Info {
        Info {
            base_url: self.base_url.clone(),
            headers: self.headers.clone(),
            timeout_secs: self.timeout_secs,
            follow_redirects: self.follow_redirects,
            max_redirects: self.max_redirects,
            no_signal: self.no_signal,
            basic_auth: self.basic_auth.clone(),
            custom_user_agent: self.custom_user_agent.clone(),
            ca_info_file_path: self.ca_info_file_path.clone(),
            cert_path: self.cert_path.clone(),
            cert_type: self.cert_type.clone(),
            key_path: self.key_path.clone(),
            key_password: self.key_password.clone(),
            verify_peer: self.verify_peer,
            verify_host: self.verify_host,
            proxy: self.proxy.clone(),
            unix_socket_path: self.unix_socket_path.clone(),
            input_file: self.input_file.clone(),
            output_file: self.output_file.clone(),
            last_request: self.last_request.clone(),
        }
    }

    /// Destroys the engine handle.
    ///
    /// The underlying session is released immediately; every subsequent verb
    /// call fails with [`Error::Terminated`], deterministically.
    pub fn terminate(&mut self) {
        self.easy = None;
        self.state = ConnectionState::Terminated;
        debug!("connection terminated");
    }

    /// Performs a GET request for `path`.
    ///
    /// # Errors
    ///
    /// `Err` only for fatal conditions (terminated connection, file sink
    /// failure, configuration the engine rejects); transfer failures come
    /// back as an `Ok` response carrying the engine's code and message.
    pub fn get(&mut self, path: &str) -> Result<Response, Error> {
        self.execute(Verb::Get, path, Payload::Empty)
    }

    /// Performs a POST request for `path` with `body` as the payload.
    ///
    /// # Errors
    ///
    /// Same contract as [`get`](Self::get); an unreadable input file is also
    /// fatal.
    pub fn post(&mut self, path: &str, body: impl AsRef<[u8]>) -> Result<Response, Error> {
        self.execute(Verb::Post, path, Payload::Bytes(body.as_ref()))
    }

    /// Performs a multipart form POST for `path`.
    ///
    /// # Errors
    ///
    /// Same contract as [`get`](Self::get).
    pub fn post_form(&mut self, path: &str, form: FormData) -> Result<Response, Error> {
        self.execute(Verb::Post, path, Payload::Form(form.into_form()))
    }

    /// Performs a PUT request for `path`, streaming `body` upload-style.
    ///
    /// # Errors
    ///
    /// Same contract as [`post`](Self::post).
    pub fn put(&mut self, path: &str, body: impl AsRef<[u8]>) -> Result<Response, Error> {
        self.execute(Verb::Put, path, Payload::Bytes(body.as_ref()))
    }

    /// Performs a PATCH request for `path`, streaming `body` upload-style.
    ///
    /// # Errors
    ///
    /// Same contract as [`post`](Self::post).
    pub fn patch(&mut self, path: &str, body: impl AsRef<[u8]>) -> Result<Response, Error> {
        self.execute(Verb::Patch, path, Payload::Bytes(body.as_ref()))
    }

    /// Performs a DELETE request for `path`.
    ///
    /// # Errors
    ///
    /// Same contract as [`get`](Self::get).
    pub fn del(&mut self, path: &str) -> Result<Response, Error> {
        self.execute(Verb::Delete, path, Payload::Empty)
    }

    /// Performs a HEAD request for `path`. The body fetch is suppressed.
    ///
    /// # Errors
    ///
    /// Same contract as [`get`](Self::get).
    pub fn head(&mut self, path: &str) -> Result<Response, Error> {
        self.execute(Verb::Head, path, Payload::Empty)
    }

    /// Performs an OPTIONS request for `path`. The body fetch is suppressed.
    ///
    /// # Errors
    ///
    /// Same contract as [`get`](Self::get).
    pub fn options(&mut self, path: &str) -> Result<Response, Error> {
        self.execute(Verb::Options, path, Payload::Empty)
    }

    /// Runs one transfer through the pipeline: bind options, perform,
    /// assemble the response, capture diagnostics, reset the handle.
    #[instrument(skip(self, payload), fields(method = verb.as_str()))]
    fn execute(&mut self, verb: Verb, path: &str, payload: Payload<'_>) -> Result<Response, Error> {
        let Some(mut easy) = self.easy.take() else {
            return Err(Error::Terminated);
        };
        self.state = ConnectionState::Configuring;
        let url = format!("{}{}", self.base_url, path);

        let outcome = match self.arm(&mut easy, &url, verb, payload) {
            Ok(()) => {
                self.state = ConnectionState::Transferring;
                debug!(%url, "performing request");
                easy.perform()
            }
            Err(fatal) => {
                if let Err(error) = easy.get_mut().release() {
                    warn!(%error, "sink teardown failed");
                }
                easy.reset();
                self.easy = Some(easy);
                self.state = ConnectionState::Idle;
                return Err(fatal);
            }
        };

        let (captured_body, captured_headers) = easy.get_mut().take_captured();
        let flushed = easy.get_mut().release();

        let (response, diagnostics) = match outcome {
            Ok(()) => {
                let code = i32::try_from(easy.response_code().unwrap_or(0)).unwrap_or(0);
                debug!(code, "transfer complete");
                let diagnostics = LastRequest::capture(&mut easy, 0, String::new());
                let response = Response {
                    code,
                    body: captured_body,
                    headers: captured_headers,
                };
                (response, diagnostics)
            }
            Err(error) => {
                let code = i32::try_from(error.code()).unwrap_or(0);
                let message = error.description().to_string();
                debug!(code, message, "transfer failed");
                let diagnostics = LastRequest::capture(&mut easy, code, message.clone());
                let response = Response {
                    code,
                    body: message.into_bytes(),
                    headers: captured_headers,
                };
                (response, diagnostics)
            }
        };

        easy.reset();
        self.easy = Some(easy);
        self.last_request = diagnostics;
        self.state = ConnectionState::Idle;

        flushed?;
        Ok(response)
    }

    /// Binds the accumulated configuration and the verb-specific options
    /// onto the handle and arms the transfer sinks. Rebuilt fresh on every
    /// call; nothing is cached across requests.
    fn arm(
        &self,
        easy: &mut Easy2<TransferHandler>,
        url: &str,
        verb: Verb,
        payload: Payload<'_>,
    ) -> Result<(), Error> {
        easy.url(url)?;

        let mut header_list = List::new();
        for (key, value) in &self.headers {
            header_list.append(&format!("{key}: {value}"))?;
        }
        easy.http_headers(header_list)?;

        easy.useragent(&self.user_agent())?;

        if let Some((username, password)) = &self.basic_auth {
            easy.username(username)?;
            easy.password(password)?;
        }

        if self.timeout_secs > 0 {
            easy.timeout(Duration::from_secs(self.timeout_secs))?;
            // A timeout firing on a non-main thread must not raise signals.
            easy.signal(false)?;
        }

        if self.follow_redirects {
            easy.follow_location(true)?;
            if let Ok(bound) = u32::try_from(self.max_redirects) {
                easy.max_redirections(bound)?;
            }
        }

        if self.no_signal {
            easy.signal(false)?;
        }

        if easy.get_ref().has_observer() {
            easy.progress(true)?;
        }

        if let Some(path) = &self.ca_info_file_path {
            easy.cainfo(path)?;
        }
        if let Some(path) = &self.cert_path {
            easy.ssl_cert(path)?;
        }
        if let Some(kind) = &self.cert_type {
            easy.ssl_cert_type(kind)?;
        }
        if let Some(path) = &self.key_path {
            easy.ssl_key(path)?;
        }
        if let Some(password) = &self.key_password {
            easy.key_password(password)?;
        }
        if !self.verify_peer {
            easy.ssl_verify_peer(false)?;
        }
        if !self.verify_host {
            easy.ssl_verify_host(false)?;
        }

        if let Some(proxy) = &self.proxy {
            easy.proxy(proxy)?;
            easy.http_proxy_tunnel(true)?;
        }

        if let Some(socket_path) = &self.unix_socket_path {
            easy.unix_socket(socket_path)?;
        }

        let mut source = None;
        match verb {
            Verb::Get => easy.get(true)?,
            Verb::Post => match payload {
                Payload::Form(form) => easy.httppost(form)?,
                payload => {
                    easy.post(true)?;
                    if let Some(path) = &self.input_file {
                        let (file, len) = open_upload_file(path)?;
                        easy.post_field_size(len)?;
                        source = Some(UploadSource::from_file(file, len));
                    } else {
                        let bytes = payload.bytes();
                        easy.post_field_size(bytes.len() as u64)?;
                        easy.post_fields_copy(bytes)?;
                    }
                }
            },
            Verb::Put | Verb::Patch => {
                easy.upload(true)?;
                let (upload, len) = if let Some(path) = &self.input_file {
                    let (file, len) = open_upload_file(path)?;
                    (UploadSource::from_file(file, len), len)
                } else {
                    let bytes = payload.bytes().to_vec();
                    let len = bytes.len() as u64;
                    (UploadSource::from_bytes(bytes), len)
                };
                easy.in_filesize(len)?;
                source = Some(upload);
                if verb == Verb::Patch {
                    easy.custom_request("PATCH")?;
                }
            }
            Verb::Delete => easy.custom_request("DELETE")?,
            Verb::Head => {
                easy.nobody(true)?;
                easy.custom_request("HEAD")?;
            }
            Verb::Options => {
                easy.nobody(true)?;
                easy.custom_request("OPTIONS")?;
            }
        }

        let sink = if let Some(path) = &self.output_file {
            let file =
                File::create(path).map_err(|source| Error::file(path.clone(), source))?;
            BodySink::File {
                path: path.clone(),
                writer: BufWriter::new(file),
            }
        } else if easy.get_ref().has_write_function() {
            BodySink::Custom
        } else {
            BodySink::Buffer
        };
        easy.get_mut().begin(sink, source);

        Ok(())
    }
}

fn open_upload_file(path: &Path) -> Result<(File, u64), Error> {
    let file = File::open(path).map_err(|source| Error::file(path, source))?;
    let len = file
        .metadata()
        .map_err(|source| Error::file(path, source))?
        .len();
    Ok((file, len))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn connection(base_url: &str) -> Connection {
        let _ = global::init();
        Connection::new(base_url).unwrap()
    }

    #[test]
    fn test_connection_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Connection>();
    }

    #[test]
    fn test_new_connection_starts_idle() {
        let conn = connection("http://localhost");
        assert_eq!(conn.state(), ConnectionState::Idle);
        assert_eq!(conn.base_url(), "http://localhost");
        assert!(conn.headers().is_empty());
    }

    #[test]
    fn test_proxy_normalization() {
        let mut conn = connection("http://localhost");

        conn.set_proxy("127.0.0.1:3128");
        assert_eq!(conn.proxy(), Some("http://127.0.0.1:3128"));

        conn.set_proxy("http://proxy.internal:8080");
        assert_eq!(conn.proxy(), Some("http://proxy.internal:8080"));

        conn.set_proxy("https://proxy.internal:8080");
        assert_eq!(conn.proxy(), Some("https://proxy.internal:8080"));

        conn.set_proxy("HTTPS://PROXY:1");
        assert_eq!(conn.proxy(), Some("HTTPS://PROXY:1"));

        conn.set_proxy("");
        assert_eq!(conn.proxy(), None);
    }

    #[test]
    fn test_user_agent_contract() {
        let mut conn = connection("http://localhost");
        let version = env!("CARGO_PKG_VERSION");
        assert_eq!(conn.user_agent(), format!("restclient-rs/{version}"));

        conn.set_user_agent("foobar/1.2.3");
        assert_eq!(
            conn.user_agent(),
            format!("foobar/1.2.3 restclient-rs/{version}")
        );
    }

    #[test]
    fn test_set_headers_replaces_and_append_upserts() {
        let mut conn = connection("http://localhost");
        conn.append_header("Accept", "text/html");
        conn.append_header("Accept", "application/json");
        assert_eq!(conn.headers().get("Accept"), Some("application/json"));
        assert_eq!(conn.headers().len(), 1);

        let mut replacement = HeaderFields::new();
        replacement.insert("X-Only", "this");
        conn.set_headers(replacement.clone());
        assert_eq!(conn.headers(), &replacement);
        assert!(!conn.headers().contains_key("Accept"));
    }

    #[test]
    fn test_terminate_is_deterministic_and_permanent() {
        let mut conn = connection("http://localhost");
        conn.terminate();
        assert_eq!(conn.state(), ConnectionState::Terminated);

        for _ in 0..3 {
            let err = conn.get("/any").unwrap_err();
            assert!(matches!(err, Error::Terminated));
        }
        let err = conn.post("/any", b"body").unwrap_err();
        assert!(matches!(err, Error::Terminated));
        assert_eq!(conn.state(), ConnectionState::Terminated);
    }

    #[test]
    fn test_info_reflects_configuration() {
        let mut conn = connection("http://localhost:8998");
        conn.set_timeout(7);
        conn.follow_redirects_with_limit(true, 3);
        conn.set_no_signal(true);
        conn.set_basic_auth("user", "secret");
        conn.set_user_agent("agent/0.1");
        conn.set_proxy("proxy.host:3128");
        conn.set_verify_peer(false);
        conn.append_header("Accept", "*/*");

        let info = conn.info();
        assert_eq!(info.base_url, "http://localhost:8998");
        assert_eq!(info.timeout_secs, 7);
        assert!(info.follow_redirects);
        assert_eq!(info.max_redirects, 3);
        assert!(info.no_signal);
        assert_eq!(
            info.basic_auth,
            Some(("user".to_string(), "secret".to_string()))
        );
        assert_eq!(info.custom_user_agent.as_deref(), Some("agent/0.1"));
        assert_eq!(info.proxy.as_deref(), Some("http://proxy.host:3128"));
        assert!(!info.verify_peer);
        assert!(info.verify_host);
        assert_eq!(info.headers.get("Accept"), Some("*/*"));
        assert_eq!(info.last_request, LastRequest::default());
    }

    #[test]
    fn test_debug_shows_configuration_not_handle() {
        let mut conn = connection("http://localhost:9001");
        conn.set_timeout(4);
        conn.terminate();

        let printed = format!("{conn:?}");
        assert!(printed.contains("http://localhost:9001"), "got: {printed}");
        assert!(printed.contains("Terminated"), "got: {printed}");
        assert!(printed.contains("timeout_secs: 4"), "got: {printed}");
    }

    #[test]
    fn test_follow_redirects_resets_bound() {
        let mut conn = connection("http://localhost");
        conn.follow_redirects_with_limit(true, 2);
        assert_eq!(conn.info().max_redirects, 2);

        conn.follow_redirects(true);
        assert_eq!(conn.info().max_redirects, -1);
    }
}
