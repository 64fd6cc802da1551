use chrono::{DateTime, Duration, Utc};

/// Source of "now" for timestamps written into the progress ledger.
#[derive(Debug, Clone, Copy, Default)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn system() -> Self {
        Self::System
    }

    pub fn fixed(at: DateTime<Utc>) -> Self {
        Self::Fixed(at)
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(t) => *t,
        }
    }

    /// Moves a fixed clock forward. Has no effect on `Clock::System`.
    pub fn advance(&mut self, delta: Duration) {
        if let Clock::Fixed(t) = self {
            *t += delta;
        }
    }
}

// 2023-11-14T22:13:20Z
#[cfg(test)]
const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

#[cfg(test)]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0).expect("valid timestamp")
}

#[cfg(test)]
pub fn fixed_clock() -> Clock {
    Clock::fixed(fixed_now())
}
