//! Session lifecycle states.

/// Lifecycle of a playback session.
///
/// `Idle → Initializing → Playing → Finished | Stopped → Closed`.
/// `Finished` means the stream ran out (or failed mid-stream) on its own;
/// `Stopped` means an external stop request. Both funnel into `Closed`
/// through the same idempotent teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No playback requested yet.
    Idle,
    /// Decoder opening, surface and audio being set up.
    Initializing,
    /// Decode thread running, frames flowing.
    Playing,
    /// Stream exhausted or failed; teardown pending or in progress.
    Finished,
    /// Externally stopped; teardown pending or in progress.
    Stopped,
    /// Teardown complete, all resources released.
    Closed,
}

impl SessionState {
    pub fn is_playing(&self) -> bool {
        matches!(self, SessionState::Playing)
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, SessionState::Closed)
    }

    /// True once playback can no longer resume.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Finished | SessionState::Stopped | SessionState::Closed
        )
    }
}
