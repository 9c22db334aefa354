//! Update laws for the heart parameter `h`.
//!
//! Both laws advance by a fixed amount per frame rather than by wall-clock
//! delta, so the animation speed assumes a steady frame rate.

#[derive(Clone, Debug, PartialEq)]
pub enum ParameterClock {
    /// `h = base + amplitude·sin(time·speed)`, `time` grows without bound.
    Breathing {
        base: f64,
        amplitude: f64,
        speed: f64,
        time_step: f64,
        time: f64,
    },
    /// `h` walks between the bounds, reversing exactly at each one.
    PingPong {
        lower: f64,
        upper: f64,
        step: f64,
        h: f64,
        increasing: bool,
    },
}

impl ParameterClock {
    pub fn breathing(base: f64, amplitude: f64, speed: f64, time_step: f64) -> Self {
        Self::Breathing {
            base,
            amplitude: amplitude.abs(),
            speed,
            time_step,
            time: 0.0,
        }
    }

    /// Starts at `lower`, moving up.
    pub fn ping_pong(lower: f64, upper: f64, step: f64) -> Self {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Self::PingPong {
            lower,
            upper,
            step: step.abs(),
            h: lower,
            increasing: true,
        }
    }

    /// Value for the frame being drawn now.
    pub fn current(&self) -> f64 {
        match *self {
            Self::Breathing {
                base,
                amplitude,
                speed,
                time,
                ..
            } => base + amplitude * (time * speed).sin(),
            Self::PingPong { h, .. } => h,
        }
    }

    /// Inclusive range `h` can take.
    pub fn bounds(&self) -> (f64, f64) {
        match *self {
            Self::Breathing {
                base, amplitude, ..
            } => (base - amplitude, base + amplitude),
            Self::PingPong { lower, upper, .. } => (lower, upper),
        }
    }

    /// Returns the current value and advances by one frame.
    pub fn tick(&mut self) -> f64 {
        let h = self.current();
        match self {
            Self::Breathing {
                time, time_step, ..
            } => *time += *time_step,
            Self::PingPong {
                lower,
                upper,
                step,
                h,
                increasing,
            } => {
                if *increasing {
                    *h += *step;
                    if *h >= *upper {
                        *h = *upper;
                        *increasing = false;
                    }
                } else {
                    *h -= *step;
                    if *h <= *lower {
                        *h = *lower;
                        *increasing = true;
                    }
                }
            }
        }
        h
    }

    pub fn is_increasing(&self) -> Option<bool> {
        match self {
            Self::Breathing { .. } => None,
            Self::PingPong { increasing, .. } => Some(*increasing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breathing_starts_at_base() {
        let mut clock = ParameterClock::breathing(2.25, 1.75, 0.5, 0.02);
        assert_eq!(clock.tick(), 2.25);
        assert!(clock.current() > 2.25);
    }

    #[test]
    fn breathing_stays_within_amplitude() {
        let mut clock = ParameterClock::breathing(2.25, 1.75, 0.5, 0.02);
        let (lo, hi) = clock.bounds();
        assert_eq!((lo, hi), (0.5, 4.0));
        for _ in 0..2_000 {
            let h = clock.tick();
            assert!(h >= lo - 1e-12 && h <= hi + 1e-12);
        }
    }

    #[test]
    fn ping_pong_reverses_at_both_bounds() {
        let mut clock = ParameterClock::ping_pong(0.0, 1.0, 0.25);
        let seen: Vec<f64> = (0..10).map(|_| clock.tick()).collect();
        assert_eq!(
            seen,
            vec![0.0, 0.25, 0.5, 0.75, 1.0, 0.75, 0.5, 0.25, 0.0, 0.25]
        );
    }

    #[test]
    fn ping_pong_clamps_an_overshooting_step() {
        let mut clock = ParameterClock::ping_pong(0.0, 1.0, 0.4);
        let seen: Vec<f64> = (0..5).map(|_| clock.tick()).collect();
        assert_eq!(seen[3], 1.0);
        assert_eq!(clock.is_increasing(), Some(false));
    }

    #[test]
    fn swapped_bounds_are_normalised() {
        let clock = ParameterClock::ping_pong(4.0, 0.5, -0.1);
        assert_eq!(clock.bounds(), (0.5, 4.0));
        assert_eq!(clock.current(), 0.5);
    }
}
