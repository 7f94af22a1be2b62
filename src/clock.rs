//! Monotonic simulation clock.
//!
//! Every timer in the core reads seconds from this clock rather than the
//! wall clock, so simulated-time tests are deterministic and system time
//! changes never reach the state machine.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ClockError {
    #[error("clock went backwards: {previous:.4}s -> {requested:.4}s")]
    NonMonotonic { previous: f64, requested: f64 },

    #[error("clock step is not finite: {0}")]
    NotFinite(f64),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SimClock {
    now: f64,
}

impl SimClock {
    pub fn new() -> Self {
        Self { now: 0.0 }
    }

    /// Seconds since the clock was created.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Step forward by `dt` seconds.
    pub fn advance(&mut self, dt: f64) -> Result<f64, ClockError> {
        if !dt.is_finite() {
            return Err(ClockError::NotFinite(dt));
        }
        self.advance_to(self.now + dt)
    }

    /// Jump to an absolute reading from the collaborator's monotonic source.
    pub fn advance_to(&mut self, now: f64) -> Result<f64, ClockError> {
        if !now.is_finite() {
            return Err(ClockError::NotFinite(now));
        }
        if now < self.now {
            return Err(ClockError::NonMonotonic {
                previous: self.now,
                requested: now,
            });
        }
        self.now = now;
        Ok(self.now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_forward() {
        let mut clock = SimClock::new();
        clock.advance(0.5).unwrap();
        clock.advance_to(2.0).unwrap();
        assert_eq!(clock.now(), 2.0);
    }

    #[test]
    fn rejects_backward_step() {
        let mut clock = SimClock::new();
        clock.advance_to(3.0).unwrap();
        let err = clock.advance_to(1.0).unwrap_err();
        assert_eq!(
            err,
            ClockError::NonMonotonic {
                previous: 3.0,
                requested: 1.0
            }
        );
        assert_eq!(clock.now(), 3.0);
    }

    #[test]
    fn rejects_nan_step() {
        let mut clock = SimClock::new();
        assert!(clock.advance(f64::NAN).is_err());
        assert_eq!(clock.now(), 0.0);
    }
}
