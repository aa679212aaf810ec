//! Fixed-period event accumulators.

/// Comparison used to decide whether the accumulated time reached the period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Boundary {
    /// Fires only once the accumulated time strictly exceeds the period.
    Exclusive,
    /// Fires as soon as the accumulated time equals the period.
    Inclusive,
}

/// Accumulates elapsed time and fires once per period.
///
/// Firing subtracts one period from the accumulator. A single advance fires at
/// most once; any backlog beyond a further full period is dropped.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PeriodicTrigger {
    period: f32,
    elapsed: f32,
    boundary: Boundary,
}

impl PeriodicTrigger {
    /// Creates a trigger with an empty accumulator.
    #[must_use]
    pub const fn new(period: f32, boundary: Boundary) -> Self {
        Self {
            period,
            elapsed: 0.0,
            boundary,
        }
    }

    /// Creates a trigger whose accumulator starts at `elapsed`.
    #[must_use]
    pub const fn with_offset(period: f32, boundary: Boundary, elapsed: f32) -> Self {
        Self {
            period,
            elapsed,
            boundary,
        }
    }

    /// Length of a period in seconds.
    #[must_use]
    pub const fn period(&self) -> f32 {
        self.period
    }

    /// Time accumulated since the last firing.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Adds `dt` to the accumulator and reports whether the trigger fired.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if !(self.period > 0.0) || !self.period.is_finite() {
            self.elapsed = 0.0;
            return true;
        }

        let due = match self.boundary {
            Boundary::Exclusive => self.elapsed > self.period,
            Boundary::Inclusive => self.elapsed >= self.period,
        };
        if due {
            self.elapsed -= self.period;
            if self.elapsed >= self.period {
                self.elapsed = self.elapsed.rem_euclid(self.period);
            }
        }
        due
    }
}
