//! Error types for the client library.
//!
//! Only fatal conditions surface as [`Error`]: lifecycle misuse, a terminated
//! connection, file redirection that cannot be opened, and configuration the
//! engine rejects outright. Transfer failures (DNS, connect, timeout, aborted
//! callbacks) are not errors at this level; they come back as a normal
//! [`Response`](crate::Response) carrying the engine's code and message.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors from connection construction and request setup.
#[derive(Debug, Error)]
pub enum Error {
    /// A connection was created before [`init`](crate::init) was called.
    #[error("client library not initialized; call init() first")]
    NotInitialized,

    /// [`init`](crate::init) was called a second time.
    #[error("client library already initialized")]
    AlreadyInitialized,

    /// The library was shut down with [`disable`](crate::disable).
    #[error("client library disabled")]
    Disabled,

    /// A request was issued on a connection after
    /// [`terminate`](crate::Connection::terminate).
    #[error("connection terminated")]
    Terminated,

    /// Opening or flushing a redirected input/output file failed.
    #[error("IO error on {path}: {source}")]
    File {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The engine rejected a configuration value before the transfer started.
    #[error("engine rejected request configuration: {source}")]
    Setup {
        /// The underlying engine error.
        #[source]
        source: curl::Error,
    },

    /// Building a multipart form part failed.
    #[error("multipart form construction failed: {source}")]
    Form {
        /// The underlying form error.
        #[source]
        source: curl::FormError,
    },
}

impl Error {
    /// Creates a file IO error.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}

impl From<curl::Error> for Error {
    fn from(source: curl::Error) -> Self {
        Self::Setup { source }
    }
}

impl From<curl::FormError> for Error {
    fn from(source: curl::FormError) -> Self {
        Self::Form { source }
    }
}
