//! Blocking REST client over a libcurl transport engine.
//!
//! This library issues single HTTP requests through a reusable
//! [`Connection`]: configuration accumulates through plain setters (headers,
//! auth, timeouts, redirects, proxy, TLS material, progress observation,
//! file redirection), each verb method performs one blocking transfer, and
//! every outcome is normalized into a [`Response`] carrying status, body,
//! headers, and timing diagnostics. Transfer failures are data, not
//! exceptions: the response's code holds the engine's native error code and
//! the body its message.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`connection`] - reusable connection, request pipeline, diagnostics
//! - [`headers`] - insertion-ordered header storage
//! - [`response`] - normalized responses and raw header parsing
//! - [`form`] - multipart form request bodies
//! - [`simple`] - one-shot convenience functions
//! - [`error`] - fatal error taxonomy
//!
//! # Quick start
//!
//! ```no_run
//! # fn main() -> Result<(), restclient::Error> {
//! restclient::init()?;
//!
//! let mut conn = restclient::Connection::new("https://api.example.test")?;
//! conn.set_timeout(5);
//! conn.append_header("Accept", "application/json");
//!
//! let res = conn.get("/status")?;
//! if res.is_success() {
//!     println!("{}", res.body_str());
//! }
//!
//! restclient::disable();
//! # Ok(())
//! # }
//! ```

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod connection;
pub mod error;
pub mod form;
pub mod headers;
pub mod response;
pub mod simple;

mod global;
mod user_agent;

// Re-export commonly used types
pub use connection::{
    Connection, ConnectionState, Info, LastRequest, ProgressObserver, WriteFunction,
};
pub use error::Error;
pub use form::FormData;
pub use global::{disable, init};
pub use headers::HeaderFields;
pub use response::Response;
pub use simple::{del, get, head, options, patch, post, post_form, put};
