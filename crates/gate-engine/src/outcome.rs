/// Classified result of the single launch-time probe request.
///
/// Constructed once per launch by the probe client and consumed
/// immediately by the decision logic; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Any transport-level failure: DNS, TLS/certificate, refused
    /// connection, timeout. Sub-causes are deliberately not distinguished.
    TransportError,
    /// HTTP 200. `has_body` is false for an empty body or an explicit
    /// `Content-Length: 0`.
    HttpSuccess { status: u16, has_body: bool },
    /// Any 3xx, surfaced as-is because the probe transport never follows
    /// redirects.
    HttpRedirect { status: u16 },
    /// Any other status, 4xx and 5xx included.
    HttpError { status: u16 },
    /// A reply that could not be interpreted as an HTTP response at all.
    NoResponse,
}

impl ProbeOutcome {
    /// Buckets a raw status line the same way the remote contract is
    /// interpreted: exactly 200 is a success, 3xx is a redirect, and
    /// everything else (including other 2xx) is an error status.
    pub fn from_status(status: u16, has_body: bool) -> Self {
        match status {
            200 => ProbeOutcome::HttpSuccess { status, has_body },
            300..=399 => ProbeOutcome::HttpRedirect { status },
            _ => ProbeOutcome::HttpError { status },
        }
    }
}
