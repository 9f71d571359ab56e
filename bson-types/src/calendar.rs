//! calendar date-time input values

/// A proleptic Gregorian calendar date-time, with an optional UTC offset.
///
/// This is the input to the UTC-datetime encoder. The fields are wall-clock
/// fields: they are interpreted in the zone given by
/// [`timezone_offset_seconds`][Self::timezone_offset_seconds], or in the
/// encoder's ambient zone if no offset is present.
///
/// Values are not validated on construction; call [`CalendarValue::validate`]
/// to check them. The encoder always validates before converting.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarValue {
    pub year: i32,
    /// `1..=12`
    pub month: u8,
    /// `1..=31`, and no greater than the length of the month.
    pub day: u8,
    /// `0..=23`
    pub hour: u8,
    /// `0..=59`
    pub minute: u8,
    /// `0..=59`; leap seconds are not representable.
    pub second: u8,
    /// The sub-second part of the time, in `[0, 1)`.
    pub fractional_second: f64,
    /// The offset of the wall-clock fields from UTC, in seconds east of UTC.
    ///
    /// `None` means the fields are in the ambient (usually local) zone.
    pub timezone_offset_seconds: Option<i32>,
}

/// An error representing an out-of-range field in a [`CalendarValue`].
///
/// This is returned as an error from [`CalendarValue::validate`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum InvalidCalendar {
    /// The year was outside of [`CalendarValue::MIN_YEAR`]..=[`CalendarValue::MAX_YEAR`].
    Year(i32),
    Month(u8),
    /// The day does not exist in the given month.
    Day { year: i32, month: u8, day: u8 },
    Hour(u8),
    Minute(u8),
    Second(u8),
    /// The fraction was negative, `>= 1.0`, or not a number.
    FractionalSecond(f64),
}

const MICROS_PER_SECOND: f64 = 1_000_000.0;

impl CalendarValue {
    /// The earliest year that can be encoded.
    pub const MIN_YEAR: i32 = -262_000;
    /// The latest year that can be encoded.
    pub const MAX_YEAR: i32 = 262_000;

    /// Midnight on the given date, in the ambient zone.
    pub const fn new(year: i32, month: u8, day: u8) -> Self {
        CalendarValue {
            year,
            month,
            day,
            hour: 0,
            minute: 0,
            second: 0,
            fractional_second: 0.0,
            timezone_offset_seconds: None,
        }
    }

    /// Return a copy of this value with the given time of day.
    pub const fn with_time(self, hour: u8, minute: u8, second: u8) -> Self {
        CalendarValue {
            hour,
            minute,
            second,
            ..self
        }
    }

    /// Return a copy of this value with the given sub-second fraction.
    pub const fn with_fraction(self, fractional_second: f64) -> Self {
        CalendarValue {
            fractional_second,
            ..self
        }
    }

    /// Return a copy of this value pinned to the given UTC offset, in seconds.
    pub const fn with_offset(self, offset_seconds: i32) -> Self {
        CalendarValue {
            timezone_offset_seconds: Some(offset_seconds),
            ..self
        }
    }

    /// Return a copy of this value with no offset, i.e. in the ambient zone.
    pub const fn in_ambient_zone(self) -> Self {
        CalendarValue {
            timezone_offset_seconds: None,
            ..self
        }
    }

    /// Convert a [`SystemTime`][std::time::SystemTime] into a UTC calendar value.
    ///
    /// Times before the epoch are supported. Sub-microsecond precision is
    /// discarded. Returns `None` if the time falls outside
    /// [`MIN_YEAR`][Self::MIN_YEAR]..=[`MAX_YEAR`][Self::MAX_YEAR].
    #[cfg(feature = "std")]
    pub fn from_system_time(time: std::time::SystemTime) -> Option<Self> {
        let (secs, micros) = match time.duration_since(std::time::UNIX_EPOCH) {
            Ok(after) => (i64::try_from(after.as_secs()).ok()?, after.subsec_micros()),
            Err(before) => {
                let before = before.duration();
                let secs = i64::try_from(before.as_secs()).ok()?;
                // round the magnitude up, so the fraction stays non-negative
                let micros = before.subsec_nanos().div_ceil(1000);
                match micros {
                    0 => (-secs, 0),
                    1_000_000 => (-secs - 1, 0),
                    _ => (-secs - 1, 1_000_000 - micros),
                }
            }
        };
        Self::from_epoch_seconds(secs, micros)
    }

    /// Build the UTC calendar fields for the given seconds since the epoch.
    ///
    /// Returns `None` if `micros` is not less than one million, or if the
    /// date falls outside [`MIN_YEAR`][Self::MIN_YEAR]..=[`MAX_YEAR`][Self::MAX_YEAR].
    pub fn from_epoch_seconds(secs: i64, micros: u32) -> Option<Self> {
        if micros >= 1_000_000 {
            return None;
        }
        let days = secs.div_euclid(86_400);
        let secs_of_day = secs.rem_euclid(86_400) as u32;
        let (year, month, day) = civil_from_days(days);
        let year = i32::try_from(year)
            .ok()
            .filter(|year| (Self::MIN_YEAR..=Self::MAX_YEAR).contains(year))?;
        Some(CalendarValue {
            year,
            month,
            day,
            hour: (secs_of_day / 3600) as u8,
            minute: (secs_of_day % 3600 / 60) as u8,
            second: (secs_of_day % 60) as u8,
            fractional_second: micros as f64 / MICROS_PER_SECOND,
            timezone_offset_seconds: Some(0),
        })
    }

    /// The fractional second, quantized (with floor) to whole microseconds.
    pub fn subsec_micros(&self) -> u32 {
        // `as` truncates toward zero, which is floor for non-negative values
        // and saturates for NaN and out-of-range inputs.
        let micros = (self.fractional_second * MICROS_PER_SECOND) as u32;
        micros.min(999_999)
    }

    /// Check that every field is within its range.
    ///
    /// Returns the first invalid field found, checking from the year down to
    /// the fraction.
    pub fn validate(&self) -> Result<(), InvalidCalendar> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&self.year) {
            return Err(InvalidCalendar::Year(self.year));
        }
        if !(1..=12).contains(&self.month) {
            return Err(InvalidCalendar::Month(self.month));
        }
        if self.day == 0 || self.day > days_in_month(self.year, self.month) {
            return Err(InvalidCalendar::Day {
                year: self.year,
                month: self.month,
                day: self.day,
            });
        }
        if self.hour > 23 {
            return Err(InvalidCalendar::Hour(self.hour));
        }
        if self.minute > 59 {
            return Err(InvalidCalendar::Minute(self.minute));
        }
        if self.second > 59 {
            return Err(InvalidCalendar::Second(self.second));
        }
        // written so that NaN fails
        if !(self.fractional_second >= 0.0 && self.fractional_second < 1.0) {
            return Err(InvalidCalendar::FractionalSecond(self.fractional_second));
        }
        Ok(())
    }
}

/// Returns `true` for leap years in the proleptic Gregorian calendar.
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// The number of days in the given month; `0` if the month is invalid.
pub const fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

// Howard Hinnant's civil_from_days
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097); // [0, 146096]
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365; // [0, 399]
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100); // [0, 365]
    let mp = (5 * doy + 2) / 153; // [0, 11]
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = if mp < 10 { mp + 3 } else { mp - 9 } as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}

impl core::fmt::Display for CalendarValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}",
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
            self.subsec_micros()
        )?;
        match self.timezone_offset_seconds {
            None => Ok(()),
            Some(0) => f.write_str("Z"),
            Some(offset) => {
                let sign = if offset < 0 { '-' } else { '+' };
                let abs = offset.unsigned_abs();
                write!(f, "{sign}{:02}:{:02}", abs / 3600, abs % 3600 / 60)
            }
        }
    }
}

impl core::fmt::Display for InvalidCalendar {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            InvalidCalendar::Year(year) => write!(
                f,
                "year {year} outside of supported range {}..={}",
                CalendarValue::MIN_YEAR,
                CalendarValue::MAX_YEAR
            ),
            InvalidCalendar::Month(month) => write!(f, "invalid month {month}"),
            InvalidCalendar::Day { year, month, day } => {
                write!(f, "day {day} does not exist in {year:04}-{month:02}")
            }
            InvalidCalendar::Hour(hour) => write!(f, "invalid hour {hour}"),
            InvalidCalendar::Minute(minute) => write!(f, "invalid minute {minute}"),
            InvalidCalendar::Second(second) => write!(f, "invalid second {second}"),
            InvalidCalendar::FractionalSecond(fract) => {
                write!(f, "fractional second {fract} not in [0, 1)")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidCalendar {}

#[cfg(feature = "chrono")]
mod chrono_impls {
    use super::CalendarValue;
    use chrono::{Datelike, Offset, TimeZone, Timelike};

    impl From<chrono::NaiveDateTime> for CalendarValue {
        /// A naive datetime carries no offset, so the result is in the ambient zone.
        fn from(src: chrono::NaiveDateTime) -> Self {
            // chrono represents a leap second as nanos >= 1e9; fold it into the last micro
            let micros = (src.nanosecond() / 1000).min(999_999);
            CalendarValue::new(src.year(), src.month() as u8, src.day() as u8)
                .with_time(src.hour() as u8, src.minute() as u8, src.second() as u8)
                .with_fraction(micros as f64 / super::MICROS_PER_SECOND)
        }
    }

    impl<Tz: TimeZone> From<chrono::DateTime<Tz>> for CalendarValue {
        fn from(src: chrono::DateTime<Tz>) -> Self {
            let offset = src.offset().fix().local_minus_utc();
            CalendarValue::from(src.naive_local()).with_offset(offset)
        }
    }
}
