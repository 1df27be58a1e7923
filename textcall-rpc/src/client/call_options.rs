use std::time::Duration;

/// Per-call options a stub applies when it issues a call.
///
/// Plain value; rebinding a stub with different options never mutates the
/// options of the stub it came from.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    deadline: Option<Duration>,
}

impl CallOptions {
    /// Options with no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the call with `Status::DeadlineExceeded` if no response has
    /// arrived within `deadline` of sending the request.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The configured deadline, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}
