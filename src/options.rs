use crate::BackoffSchedule;

/// Configures transport timeout and retry behavior.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestOptions {
    /// Per-attempt timeout in milliseconds. `None` leaves the transport default.
    pub timeout_ms: Option<u64>,
    /// Delays slept between attempts after a transport failure.
    pub backoff: BackoffSchedule,
}

