use crate::outcome::ProbeOutcome;

/// Launch-scoped gate decision. `blocked` selects the surface
/// (true = native UI); `decided` is transient and flips once the
/// first probe of the launch has resolved.
#[derive(Debug, Clone, Copy)]
pub struct GateDecision {
    pub blocked: bool,
    pub decided: bool,
}

impl GateDecision {
    /// Launch default: native UI until a probe says otherwise.
    pub fn fail_safe() -> Self {
        Self {
            blocked: true,
            decided: false,
        }
    }
}

impl Default for GateDecision {
    fn default() -> Self {
        Self::fail_safe()
    }
}

/// Maps a probe outcome to the blocked flag. Pure function; the
/// classification rules are a fixed remote contract and must not grow
/// additional branches.
pub fn classify(outcome: &ProbeOutcome) -> bool {
    match outcome {
        // Any transport failure, certificate problems included.
        ProbeOutcome::TransportError => true,
        // An empty 200 is the remote side's explicit "do nothing".
        ProbeOutcome::HttpSuccess { has_body: false, .. } => true,
        // A 200 with content means the web surface should be shown.
        ProbeOutcome::HttpSuccess { has_body: true, .. } => false,
        // Any redirect status is read the same way.
        ProbeOutcome::HttpRedirect { .. } => false,
        ProbeOutcome::HttpError { .. } => true,
        ProbeOutcome::NoResponse => true,
    }
}
