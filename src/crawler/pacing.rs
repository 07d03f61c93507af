use std::time::Duration;

/// Decides how long to wait after each detail-page request.
pub trait Pacing {
    fn next_delay(&mut self) -> Duration;
}

/// Same pause after every request.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(Duration);

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self(delay)
    }
}

impl Pacing for FixedDelay {
    fn next_delay(&mut self) -> Duration {
        self.0
    }
}
