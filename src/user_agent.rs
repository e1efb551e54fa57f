//! User-Agent assembly for outgoing requests.
//!
//! Single source for the product token so every request identifies the
//! library consistently, with or without a caller-supplied prefix.

/// Product token sent in every User-Agent header.
const PRODUCT: &str = "restclient-rs";

/// Builds the User-Agent for a request.
///
/// A non-empty custom prefix is prepended to the product token, separated by
/// a single space; otherwise the bare product token is used. The value is
/// recomputed per request so a prefix change takes effect immediately.
#[must_use]
pub(crate) fn effective_user_agent(custom_prefix: Option<&str>) -> String {
    let version = env!("CARGO_PKG_VERSION");
    match custom_prefix.filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => format!("{prefix} {PRODUCT}/{version}"),
        None => format!("{PRODUCT}/{version}"),
    }
}
