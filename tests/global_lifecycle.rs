//! Process-wide lifecycle walk: uninitialized, ready, disabled.
//!
//! This file holds a single test on purpose. The lifecycle state is global
//! to the process and integration test binaries each get their own process,
//! so only here can the full walk start from a genuinely uninitialized
//! library without racing other tests.

use restclient::{Connection, Error};

#[test]
fn test_lifecycle_walk() {
    // Before init: connections are refused.
    let err = Connection::new("http://localhost").unwrap_err();
    assert!(matches!(err, Error::NotInitialized), "got: {err:?}");

    // First init succeeds, second is rejected.
    restclient::init().expect("first init");
    let err = restclient::init().unwrap_err();
    assert!(matches!(err, Error::AlreadyInitialized), "got: {err:?}");

    // Ready: connections construct and existing ones keep working.
    let mut conn = Connection::new("http://localhost").expect("connection while ready");

    // Disabled: new connections are refused, init cannot revive the library.
    restclient::disable();
    let err = Connection::new("http://localhost").unwrap_err();
    assert!(matches!(err, Error::Disabled), "got: {err:?}");
    let err = restclient::init().unwrap_err();
    assert!(matches!(err, Error::Disabled), "got: {err:?}");

    // Disable is idempotent.
    restclient::disable();

    // A terminated connection reports termination, not lifecycle state.
    conn.terminate();
    let err = conn.get("/any").unwrap_err();
    assert!(matches!(err, Error::Terminated), "got: {err:?}");
}
