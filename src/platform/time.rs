//! Frame timing

use std::time::Instant;

/// Source of per-frame deltas in seconds
pub trait Clock {
    fn delta(&mut self) -> f32;
}

/// Monotonic wall clock, capped so a stall doesn't skip the game ahead
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    max_dt: f32,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        Self {
            last: Instant::now(),
            max_dt,
        }
    }

    /// Delta between the previous call and `now`
    pub fn delta_at(&mut self, now: Instant) -> f32 {
        let dt = now.saturating_duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(self.max_dt)
    }
}

impl Clock for FrameClock {
    fn delta(&mut self) -> f32 {
        self.delta_at(Instant::now())
    }
}

/// Fixed step clock for headless runs
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub step: f32,
}

impl Clock for FixedClock {
    fn delta(&mut self) -> f32 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_delta_is_capped() {
        let start = Instant::now();
        let mut clock = FrameClock {
            last: start,
            max_dt: 0.25,
        };
        let dt = clock.delta_at(start + Duration::from_millis(100));
        assert!((dt - 0.1).abs() < 1e-6);
        let dt = clock.delta_at(start + Duration::from_secs(5));
        assert_eq!(dt, 0.25);
    }

    #[test]
    fn test_backwards_time_is_zero() {
        let start = Instant::now();
        let mut clock = FrameClock {
            last: start + Duration::from_secs(1),
            max_dt: 0.25,
        };
        assert_eq!(clock.delta_at(start), 0.0);
    }

    #[test]
    fn test_fixed_clock() {
        let mut clock = FixedClock { step: 1.0 / 60.0 };
        assert_eq!(clock.delta(), 1.0 / 60.0);
    }
}
