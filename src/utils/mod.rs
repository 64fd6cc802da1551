mod clock;
pub use clock::Clock;
#[cfg(test)]
pub use clock::{fixed_clock, fixed_now};
