//! Process-wide engine lifecycle.
//!
//! The underlying engine keeps global state that must be set up once before
//! the first connection and torn down once at the end of the program. This
//! module guards that lifecycle behind an explicit state machine
//! (uninitialized, ready, disabled) so misuse is a typed error instead of
//! undefined behavior: double initialization, connections created before
//! [`init`] or after [`disable`], all fail deterministically.

use std::sync::atomic::{AtomicU8, Ordering};

use tracing::debug;

use crate::error::Error;

const UNINITIALIZED: u8 = 0;
const READY: u8 = 1;
const DISABLED: u8 = 2;

static STATE: AtomicU8 = AtomicU8::new(UNINITIALIZED);

/// Initializes the client library for the whole process.
///
/// Must be called once, before the first [`Connection`](crate::Connection)
/// is created and before any other thread is spawned that uses the library.
///
/// # Errors
///
/// Returns [`Error::AlreadyInitialized`] on a second call and
/// [`Error::Disabled`] once [`disable`] has run; the disabled state is
/// terminal for the process.
pub fn init() -> Result<(), Error> {
    match STATE.compare_exchange(UNINITIALIZED, READY, Ordering::SeqCst, Ordering::SeqCst) {
        Ok(_) => {
            curl::init();
            debug!("client library initialized");
            Ok(())
        }
        Err(READY) => Err(Error::AlreadyInitialized),
        Err(_) => Err(Error::Disabled),
    }
}

/// Shuts the client library down for the whole process.
///
/// Existing connections keep working until dropped, but every subsequent
/// [`Connection`](crate::Connection) construction fails with
/// [`Error::Disabled`]. Idempotent; safe to call without a prior [`init`].
pub fn disable() {
    STATE.store(DISABLED, Ordering::SeqCst);
    debug!("client library disabled");
}

/// Checks that the library is initialized and not disabled.
pub(crate) fn ensure_ready() -> Result<(), Error> {
    match STATE.load(Ordering::SeqCst) {
        READY => Ok(()),
        UNINITIALIZED => Err(Error::NotInitialized),
        _ => Err(Error::Disabled),
    }
}
