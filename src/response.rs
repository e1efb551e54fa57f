//! Normalized response type and raw header parsing.
//!
//! Every request produces a [`Response`], whether the transfer reached the
//! server or not. HTTP outcomes carry the status code and body; engine
//! failures (DNS, connect, timeout, aborted transfer) carry the engine's
//! native error code in [`Response::code`] and its human-readable message in
//! the body, so callers branch on one value instead of two channels.

use std::borrow::Cow;

use crate::headers::HeaderFields;

/// Engine error codes are always below this bound, HTTP status codes always
/// at or above it.
const ENGINE_CODE_BOUND: i32 = 100;

/// Outcome of a single request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code (100-599), or the engine's native error code
    /// (always < 100) when the transfer itself failed.
    pub code: i32,
    /// Response body bytes. Empty when the body was redirected to a file or
    /// consumed by a custom write function; holds the engine's error message
    /// when the transfer failed.
    pub body: Vec<u8>,
    /// Response headers captured during the transfer.
    pub headers: HeaderFields,
}

impl Response {
    /// Body decoded as UTF-8, with invalid sequences replaced.
    #[must_use]
    pub fn body_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Returns `true` when [`code`](Self::code) is an engine error code
    /// rather than an HTTP status.
    #[must_use]
    pub fn is_engine_error(&self) -> bool {
        (0..ENGINE_CODE_BOUND).contains(&self.code)
    }
}

/// Parses one raw header line as delivered by the engine's header callback.
///
/// Splits on the first colon with both sides trimmed. Lines without a colon
/// (the status line, folded continuations) are stored whole with the value
/// `"present"`. Returns `None` for blank lines, which end a header block and
/// carry no field.
pub(crate) fn parse_header_line(line: &[u8]) -> Option<(String, String)> {
    let line = String::from_utf8_lossy(line);
    match line.find(':') {
        Some(separator) => {
            let key = line[..separator].trim().to_string();
            let value = line[separator + 1..].trim().to_string();
            Some((key, value))
        }
        None => {
            let line = line.trim();
            if line.is_empty() {
                None
            } else {
                Some((line.to_string(), String::from("present")))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_first_colon_and_trims() {
        let parsed = parse_header_line(b"Content-Type: text/html; charset=utf-8\r\n").unwrap();
        assert_eq!(parsed.0, "Content-Type");
        assert_eq!(parsed.1, "text/html; charset=utf-8");

        let parsed = parse_header_line(b"Date: Tue, 01 Jan 2030 00:00:00 GMT\r\n").unwrap();
        assert_eq!(parsed.0, "Date");
        assert_eq!(
            parsed.1, "Tue, 01 Jan 2030 00:00:00 GMT",
            "only the first colon separates key from value"
        );
    }

    #[test]
    fn test_parse_empty_value() {
        let parsed = parse_header_line(b"X-Empty:\r\n").unwrap();
        assert_eq!(parsed.0, "X-Empty");
        assert_eq!(parsed.1, "");
    }

    #[test]
    fn test_parse_blank_line_is_ignored() {
        assert!(parse_header_line(b"\r\n").is_none());
        assert!(parse_header_line(b"").is_none());
        assert!(parse_header_line(b"   \r\n").is_none());
    }

    #[test]
    fn test_parse_line_without_colon_is_present() {
        let parsed = parse_header_line(b"HTTP/1.1 200 OK\r\n").unwrap();
        assert_eq!(parsed.0, "HTTP/1.1 200 OK");
        assert_eq!(parsed.1, "present");
    }

    #[test]
    fn test_response_success_ranges() {
        let mut res = Response {
            code: 200,
            ..Response::default()
        };
        assert!(res.is_success());
        assert!(!res.is_engine_error());

        res.code = 299;
        assert!(res.is_success());
        res.code = 301;
        assert!(!res.is_success());
        res.code = 404;
        assert!(!res.is_success());

        res.code = 28;
        assert!(res.is_engine_error());
        assert!(!res.is_success());
    }

    #[test]
    fn test_body_str_lossy() {
        let res = Response {
            code: 200,
            body: vec![0x68, 0x69, 0xFF],
            headers: HeaderFields::new(),
        };
        assert!(res.body_str().starts_with("hi"));
    }
}
