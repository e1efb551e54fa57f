//! Streaming adapters between the engine's callbacks and caller-visible state.
//!
//! The engine drives all body and header traffic through synchronous
//! callbacks on the calling thread. [`TransferHandler`] implements that
//! callback surface: it accumulates response bytes and parsed headers, pulls
//! request bytes from a bounds-checked [`UploadSource`], and forwards
//! progress ticks to a registered observer. Per-transfer state is armed
//! before `perform` and disarmed on every exit path.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::mem;
use std::path::PathBuf;

use curl::easy::{Handler, ReadError, WriteError};

use crate::error::Error;
use crate::headers::HeaderFields;
use crate::response::parse_header_line;

/// Receives response body chunks in place of the default accumulating sink.
///
/// Implemented for any `FnMut(&[u8]) -> usize + Send` closure. The return
/// value is the number of bytes consumed; any count other than `data.len()`
/// makes the engine abort the transfer, which surfaces as a failed response
/// carrying the engine's write-error code.
pub trait WriteFunction: Send {
    /// Consumes one chunk of response body.
    fn write(&mut self, data: &[u8]) -> usize;
}

impl<F> WriteFunction for F
where
    F: FnMut(&[u8]) -> usize + Send,
{
    fn write(&mut self, data: &[u8]) -> usize {
        self(data)
    }
}

/// Observes transfer progress.
///
/// Implemented for any `FnMut(f64, f64, f64, f64) -> bool + Send` closure.
/// Called periodically with cumulative byte totals: expected then transferred
/// download bytes, expected then transferred upload bytes. Returning `false`
/// aborts the in-flight transfer, which surfaces as a failed response
/// carrying the engine's abort code.
pub trait ProgressObserver: Send {
    /// Reports cumulative progress; `false` aborts the transfer.
    fn progress(&mut self, dltotal: f64, dlnow: f64, ultotal: f64, ulnow: f64) -> bool;
}

impl<F> ProgressObserver for F
where
    F: FnMut(f64, f64, f64, f64) -> bool + Send,
{
    fn progress(&mut self, dltotal: f64, dlnow: f64, ultotal: f64, ulnow: f64) -> bool {
        self(dltotal, dlnow, ultotal, ulnow)
    }
}

/// Bounds-checked request body source for upload-style verbs.
///
/// Owns its bytes (or file reader) together with the cursor, so the read
/// callback cannot pull past the declared bound: each read copies
/// `min(remaining, requested)` and a read of zero means exhaustion, exactly
/// once the cursor reaches the end.
pub(crate) enum UploadSource {
    Bytes {
        data: Vec<u8>,
        offset: usize,
    },
    File {
        reader: BufReader<File>,
        remaining: u64,
    },
}

impl UploadSource {
    pub(crate) fn from_bytes(data: Vec<u8>) -> Self {
        Self::Bytes { data, offset: 0 }
    }

    /// Wraps an open file, bounded to `len` bytes from the current position.
    pub(crate) fn from_file(file: File, len: u64) -> Self {
        Self::File {
            reader: BufReader::new(file),
            remaining: len,
        }
    }

    fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        match self {
            Self::Bytes { data, offset } => {
                let remaining = data.len().saturating_sub(*offset);
                let count = remaining.min(buf.len());
                buf[..count].copy_from_slice(&data[*offset..*offset + count]);
                *offset += count;
                Ok(count)
            }
            Self::File { reader, remaining } => {
                if *remaining == 0 {
                    return Ok(0);
                }
                let bound = usize::try_from(*remaining).unwrap_or(usize::MAX);
                let want = buf.len().min(bound);
                match reader.read(&mut buf[..want]) {
                    Ok(count) => {
                        *remaining -= count as u64;
                        Ok(count)
                    }
                    Err(_) => Err(ReadError::Abort),
                }
            }
        }
    }
}

/// Destination for response body bytes during one transfer.
pub(crate) enum BodySink {
    /// Append to the in-memory body buffer (the default).
    Buffer,
    /// Stream to a file; the in-memory body stays empty.
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    /// Forward to the connection's registered write function.
    Custom,
}

/// Callback handler bound to a connection's engine handle.
///
/// Connection-scoped overrides (write function, progress observer) persist
/// across requests; captured body/headers, the armed sink, and the upload
/// source belong to the transfer in flight and are reset by
/// [`begin`](Self::begin) / [`release`](Self::release).
pub(crate) struct TransferHandler {
    body: Vec<u8>,
    headers: HeaderFields,
    sink: BodySink,
    source: Option<UploadSource>,
    write_function: Option<Box<dyn WriteFunction>>,
    observer: Option<Box<dyn ProgressObserver>>,
}

impl TransferHandler {
    pub(crate) fn new() -> Self {
        Self {
            body: Vec::new(),
            headers: HeaderFields::new(),
            sink: BodySink::Buffer,
            source: None,
            write_function: None,
            observer: None,
        }
    }

    /// Arms per-transfer state, discarding anything captured previously.
    pub(crate) fn begin(&mut self, sink: BodySink, source: Option<UploadSource>) {
        self.body.clear();
        self.headers.clear();
        self.sink = sink;
        self.source = source;
    }

    /// Disarms per-transfer state, flushing and closing a file sink.
    ///
    /// # Errors
    ///
    /// Returns [`Error::File`] when flushing a file sink fails; the file is
    /// closed regardless.
    pub(crate) fn release(&mut self) -> Result<(), Error> {
        self.source = None;
        match mem::replace(&mut self.sink, BodySink::Buffer) {
            BodySink::File { path, mut writer } => {
                writer.flush().map_err(|source| Error::file(path, source))
            }
            BodySink::Buffer | BodySink::Custom => Ok(()),
        }
    }

    /// Takes the captured body and headers, leaving the handler empty.
    pub(crate) fn take_captured(&mut self) -> (Vec<u8>, HeaderFields) {
        (mem::take(&mut self.body), mem::take(&mut self.headers))
    }

    pub(crate) fn set_write_function(&mut self, function: Option<Box<dyn WriteFunction>>) {
        self.write_function = function;
    }

    pub(crate) fn set_observer(&mut self, observer: Option<Box<dyn ProgressObserver>>) {
        self.observer = observer;
    }

    pub(crate) fn has_write_function(&self) -> bool {
        self.write_function.is_some()
    }

    pub(crate) fn has_observer(&self) -> bool {
        self.observer.is_some()
    }
}

impl Handler for TransferHandler {
    fn write(&mut self, data: &[u8]) -> Result<usize, WriteError> {
        match &mut self.sink {
            BodySink::Buffer => {
                self.body.extend_from_slice(data);
                Ok(data.len())
            }
            BodySink::File { writer, .. } => match writer.write_all(data) {
                Ok(()) => Ok(data.len()),
                // Short count; the engine turns it into a write-error abort.
                Err(_) => Ok(0),
            },
            BodySink::Custom => Ok(self
                .write_function
                .as_mut()
                .map_or(data.len(), |function| function.write(data))),
        }
    }

    fn header(&mut self, data: &[u8]) -> bool {
        if let Some((key, value)) = parse_header_line(data) {
            self.headers.insert(key, value);
        }
        true
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, ReadError> {
        match &mut self.source {
            Some(source) => source.read_into(buf),
            None => Ok(0),
        }
    }

    fn progress(&mut self, dltotal: f64, dlnow: f64, ultotal: f64, ulnow: f64) -> bool {
        match &mut self.observer {
            Some(observer) => observer.progress(dltotal, dlnow, ultotal, ulnow),
            None => true,
        }
    }
}
