use std::time::Instant;

/// Process uptime clock.
///
/// Started once at the top of `main` and handed to the state, so the reported
/// uptime also covers startup.
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started_at: Instant,
}

impl Uptime {
    /// Starts the clock now.
    pub fn start() -> Self {
        Self {
            started_at: Instant::now(),
        }
    }

    /// Creates a clock that started at `started_at`.
    pub fn since(started_at: Instant) -> Self {
        Self { started_at }
    }

    /// Returns the elapsed time in fractional seconds.
    #[inline]
    pub fn seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_monotonic() {
        let uptime = Uptime::start();
        let first = uptime.seconds();
        let second = uptime.seconds();

        assert!(first >= 0.0);
        assert!(second >= first);
    }
}
