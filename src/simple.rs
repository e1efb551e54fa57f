//! One-shot convenience functions.
//!
//! Each function constructs a throwaway [`Connection`] with an empty base
//! URL, performs a single request against the full URL given, and discards
//! the connection. For repeated requests against the same host, configure a
//! [`Connection`] directly and reuse it.

use crate::connection::Connection;
use crate::error::Error;
use crate::form::FormData;
use crate::response::Response;

/// Performs a one-shot GET request.
///
/// # Example
///
/// ```no_run
/// # fn main() -> Result<(), restclient::Error> {
/// restclient::init()?;
/// let res = restclient::get("https://example.test/health")?;
/// assert!(res.is_success());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// `Err` only for fatal conditions; transfer failures come back as an `Ok`
/// response carrying the engine's code and message.
pub fn get(url: &str) -> Result<Response, Error> {
    Connection::new("")?.get(url)
}

/// Performs a one-shot POST request with the given `Content-Type`.
///
/// # Errors
///
/// Same contract as [`get`].
pub fn post(url: &str, content_type: &str, body: impl AsRef<[u8]>) -> Result<Response, Error> {
    let mut conn = Connection::new("")?;
    conn.append_header("Content-Type", content_type);
    conn.post(url, body)
}

/// Performs a one-shot multipart form POST.
///
/// # Errors
///
/// Same contract as [`get`].
pub fn post_form(url: &str, form: FormData) -> Result<Response, Error> {
    Connection::new("")?.post_form(url, form)
}

/// Performs a one-shot PUT request with the given `Content-Type`.
///
/// # Errors
///
/// Same contract as [`get`].
pub fn put(url: &str, content_type: &str, body: impl AsRef<[u8]>) -> Result<Response, Error> {
    let mut conn = Connection::new("")?;
    conn.append_header("Content-Type", content_type);
    conn.put(url, body)
}

/// Performs a one-shot PATCH request with the given `Content-Type`.
///
/// # Errors
///
/// Same contract as [`get`].
pub fn patch(url: &str, content_type: &str, body: impl AsRef<[u8]>) -> Result<Response, Error> {
    let mut conn = Connection::new("")?;
    conn.append_header("Content-Type", content_type);
    conn.patch(url, body)
}

/// Performs a one-shot DELETE request.
///
/// # Errors
///
/// Same contract as [`get`].
pub fn del(url: &str) -> Result<Response, Error> {
    Connection::new("")?.del(url)
}

/// Performs a one-shot HEAD request.
///
/// # Errors
///
/// Same contract as [`get`].
pub fn head(url: &str) -> Result<Response, Error> {
    Connection::new("")?.head(url)
}

/// Performs a one-shot OPTIONS request.
///
/// # Errors
///
/// Same contract as [`get`].
pub fn options(url: &str) -> Result<Response, Error> {
    Connection::new("")?.options(url)
}
