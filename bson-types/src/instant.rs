//! absolute instants

/// An absolute point in time, as seconds and microseconds since the Unix epoch.
///
/// `epoch_seconds` is negative for instants before 1970; `subsec_micros` is
/// always the non-negative distance past that second, so one half second
/// before the epoch is `(-1, 500_000)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcInstant {
    epoch_seconds: i64,
    subsec_micros: u32,
}

impl UtcInstant {
    /// 1970-01-01T00:00:00Z
    pub const EPOCH: UtcInstant = UtcInstant::new(0, 0);

    /// Create a new instant.
    ///
    /// Microseconds beyond one second are carried into `epoch_seconds`.
    pub const fn new(epoch_seconds: i64, subsec_micros: u32) -> Self {
        UtcInstant {
            epoch_seconds: epoch_seconds.saturating_add((subsec_micros / 1_000_000) as i64),
            subsec_micros: subsec_micros % 1_000_000,
        }
    }

    /// Create a new instant from whole seconds and a fraction in `[0, 1)`.
    ///
    /// The fraction is resolved to microseconds, rounding toward negative
    /// infinity. Values outside `[0, 1)` are clamped.
    pub fn from_fractional(epoch_seconds: i64, fractional_second: f64) -> Self {
        let micros = (fractional_second * 1_000_000.0) as u32;
        Self::new(epoch_seconds, micros.min(999_999))
    }

    /// Whole seconds since the epoch, rounded toward negative infinity.
    pub const fn epoch_seconds(&self) -> i64 {
        self.epoch_seconds
    }

    /// The microseconds past [`epoch_seconds`][Self::epoch_seconds], in `0..1_000_000`.
    pub const fn subsec_micros(&self) -> u32 {
        self.subsec_micros
    }

    /// The fraction of a second past [`epoch_seconds`][Self::epoch_seconds], in `[0, 1)`.
    pub fn fractional_second(&self) -> f64 {
        self.subsec_micros as f64 / 1_000_000.0
    }
}
