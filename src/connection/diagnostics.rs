//! Post-transfer diagnostics and configuration snapshots.

use std::path::PathBuf;
use std::time::Duration;

use curl::easy::Easy2;

use crate::headers::HeaderFields;

/// Timing breakdown and engine result of the most recent transfer.
///
/// Captured fresh after every request, success or failure; stale values are
/// overwritten whole, never merged. All durations are measured by the engine
/// from the start of the transfer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LastRequest {
    /// Total time of the transfer, including name lookup and redirects.
    pub total_time: Duration,
    /// Time until name resolution completed.
    pub name_lookup_time: Duration,
    /// Time until the TCP connect completed.
    pub connect_time: Duration,
    /// Time until the TLS handshake completed (zero for plain connections).
    pub app_connect_time: Duration,
    /// Time until the transfer was about to begin.
    pub pre_transfer_time: Duration,
    /// Time until the first response byte arrived.
    pub start_transfer_time: Duration,
    /// Time spent on redirect hops before the final request.
    pub redirect_time: Duration,
    /// Number of redirect hops followed.
    pub redirect_count: u32,
    /// The engine's native result code, 0 on success.
    pub engine_code: i32,
    /// The engine's human-readable error message, empty on success.
    pub error_message: String,
}

impl LastRequest {
    /// Reads the timing counters off the handle after a transfer.
    pub(crate) fn capture<H>(
        easy: &mut Easy2<H>,
        engine_code: i32,
        error_message: String,
    ) -> Self {
        Self {
            total_time: easy.total_time().unwrap_or_default(),
            name_lookup_time: easy.namelookup_time().unwrap_or_default(),
            connect_time: easy.connect_time().unwrap_or_default(),
            app_connect_time: easy.appconnect_time().unwrap_or_default(),
            pre_transfer_time: easy.pretransfer_time().unwrap_or_default(),
            start_transfer_time: easy.starttransfer_time().unwrap_or_default(),
            redirect_time: easy.redirect_time().unwrap_or_default(),
            redirect_count: easy.redirect_count().unwrap_or_default(),
            engine_code,
            error_message,
        }
    }
}

/// Read-only snapshot of a connection's configuration plus the diagnostics
/// of its most recent transfer.
#[derive(Debug, Clone, Default)]
pub struct Info {
    /// Immutable URL prefix every request path is appended to.
    pub base_url: String,
    /// Headers sent with every request.
    pub headers: HeaderFields,
    /// Transfer timeout in seconds, 0 when disabled.
    pub timeout_secs: u64,
    /// Whether redirects are followed.
    pub follow_redirects: bool,
    /// Redirect hop bound, negative for unlimited.
    pub max_redirects: i64,
    /// Whether engine-internal signal delivery is suppressed.
    pub no_signal: bool,
    /// Basic-auth credentials as `(username, password)`.
    pub basic_auth: Option<(String, String)>,
    /// Custom User-Agent prefix.
    pub custom_user_agent: Option<String>,
    /// CA bundle override.
    pub ca_info_file_path: Option<PathBuf>,
    /// Client certificate path.
    pub cert_path: Option<PathBuf>,
    /// Client certificate type, e.g. `"PEM"`.
    pub cert_type: Option<String>,
    /// Client key path.
    pub key_path: Option<PathBuf>,
    /// Client key passphrase.
    pub key_password: Option<String>,
    /// Whether the peer certificate is verified.
    pub verify_peer: bool,
    /// Whether the certificate hostname is verified.
    pub verify_host: bool,
    /// Proxy URI, already normalized to carry a scheme.
    pub proxy: Option<String>,
    /// Unix domain socket the connection is routed over.
    pub unix_socket_path: Option<String>,
    /// Request body source file.
    pub input_file: Option<PathBuf>,
    /// Response body sink file.
    pub output_file: Option<PathBuf>,
    /// Diagnostics of the most recent transfer.
    pub last_request: LastRequest,
}
