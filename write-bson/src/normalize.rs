//! Resolving calendar values to absolute instants
//!
//! There are two interchangeable strategies. [`NativeConversion`] hands the
//! calendar fields to `chrono`; [`ManualConversion`] does the civil-date
//! arithmetic itself and only needs to know the ambient zone's offset at a
//! given instant. The two must agree exactly, for every valid input.
//!
//! Wall-clock times in the ambient zone are resolved the same way by both:
//!
//! - a time that occurs once maps to that instant;
//! - a time that occurs twice (when clocks go back) maps to the earlier one;
//! - a time skipped when clocks go forward is read with the offset that was
//!   in effect a day before, which moves it past the gap.

use chrono::{DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone};

use crate::{
    error::Error,
    types::{CalendarValue, InvalidCalendar, UtcInstant},
    zone::{self, AmbientZone},
};

const SECONDS_PER_DAY: i64 = 86_400;

/// A strategy for converting calendar fields to an absolute instant.
pub trait TimeNormalizer {
    /// Resolve `value` to the instant it describes.
    ///
    /// The value is validated first; fields out of range are reported as
    /// [`Error::InvalidCalendar`], and offsets that are not strictly within a
    /// day of UTC as [`Error::InvalidOffset`].
    fn normalize(&self, value: &CalendarValue) -> Result<UtcInstant, Error>;
}

/// Where a calendar value's wall clock is anchored.
enum Anchor {
    Offset(i32),
    Ambient(AmbientZone),
}

fn anchor_for(value: &CalendarValue, zone: AmbientZone) -> Result<Anchor, Error> {
    value.validate()?;
    match (value.timezone_offset_seconds, zone) {
        (Some(offset), _) => check_offset(offset).map(Anchor::Offset),
        (None, AmbientZone::Fixed(offset)) => check_offset(offset).map(Anchor::Offset),
        (None, zone) => Ok(Anchor::Ambient(zone)),
    }
}

fn check_offset(offset: i32) -> Result<i32, Error> {
    if i64::from(offset).abs() < SECONDS_PER_DAY {
        Ok(offset)
    } else {
        Err(Error::InvalidOffset(offset))
    }
}

/// Conversion through `chrono`'s calendar and time zone support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NativeConversion {
    zone: AmbientZone,
}

impl NativeConversion {
    /// Convert values without an offset in the given zone.
    pub fn new(zone: AmbientZone) -> Self {
        NativeConversion { zone }
    }

    fn naive_datetime(value: &CalendarValue) -> Result<NaiveDateTime, Error> {
        NaiveDate::from_ymd_opt(value.year, value.month.into(), value.day.into())
            .and_then(|date| {
                date.and_hms_micro_opt(
                    value.hour.into(),
                    value.minute.into(),
                    value.second.into(),
                    value.subsec_micros(),
                )
            })
            .ok_or(Error::InvalidCalendar(InvalidCalendar::Day {
                year: value.year,
                month: value.month,
                day: value.day,
            }))
    }
}

/// The UTC seconds for `naive` read as a wall-clock time in `tz`.
fn resolve_in<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> i64 {
    // a mapping only counts if `tz` agrees on the offset at the resulting
    // instant; some zones report the first wall time after a repeated hour
    // as ambiguous
    let consistent = |dt: &DateTime<Tz>| {
        tz.offset_from_utc_datetime(&dt.naive_utc()).fix() == dt.offset().fix()
    };
    let earliest = match tz.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt).filter(consistent).map(|dt| dt.timestamp()),
        LocalResult::Ambiguous(first, second) => [first, second]
            .into_iter()
            .filter(consistent)
            .map(|dt| dt.timestamp())
            .min(),
        LocalResult::None => None,
    };
    earliest.unwrap_or_else(|| {
        let wall = naive.and_utc().timestamp();
        let offset = DateTime::from_timestamp(wall - SECONDS_PER_DAY, 0)
            .map(|day_before| zone::offset_of(tz, &day_before))
            .unwrap_or(0);
        wall - i64::from(offset)
    })
}

impl TimeNormalizer for NativeConversion {
    fn normalize(&self, value: &CalendarValue) -> Result<UtcInstant, Error> {
        let anchor = anchor_for(value, self.zone)?;
        let naive = Self::naive_datetime(value)?;
        let epoch_seconds = match anchor {
            Anchor::Offset(offset) | Anchor::Ambient(AmbientZone::Fixed(offset)) => {
                let tz = FixedOffset::east_opt(offset).ok_or(Error::InvalidOffset(offset))?;
                resolve_in(&tz, &naive)
            }
            Anchor::Ambient(AmbientZone::Utc) => resolve_in(&chrono::Utc, &naive),
            Anchor::Ambient(AmbientZone::Local) => resolve_in(&chrono::Local, &naive),
            Anchor::Ambient(AmbientZone::Named(tz)) => resolve_in(&tz, &naive),
        };
        Ok(UtcInstant::new(
            epoch_seconds,
            naive.and_utc().timestamp_subsec_micros(),
        ))
    }
}

/// Conversion by plain arithmetic on the proleptic Gregorian calendar.
///
/// This is used where `chrono`'s conversion is unavailable or untrusted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ManualConversion {
    zone: AmbientZone,
}

impl ManualConversion {
    const MICROS_PER_SECOND: f64 = 1_000_000.0;

    /// Convert values without an offset in the given zone.
    pub fn new(zone: AmbientZone) -> Self {
        ManualConversion { zone }
    }

    /// `floor(fraction * 1e6)`
    fn micros(fractional_second: f64) -> u32 {
        ((fractional_second * Self::MICROS_PER_SECOND) as u32).min(999_999)
    }

    /// The seconds since the epoch of the fields, read as UTC.
    fn wall_clock_seconds(value: &CalendarValue) -> i64 {
        let days = days_from_civil(value.year.into(), value.month.into(), value.day.into());
        days * SECONDS_PER_DAY
            + i64::from(value.hour) * 3600
            + i64::from(value.minute) * 60
            + i64::from(value.second)
    }

    /// The UTC seconds for wall-clock seconds `wall`, in a zone whose offset
    /// at a given UTC instant is reported by `offset_at`.
    fn resolve_ambient(offset_at: impl Fn(i64) -> i32, wall: i64) -> i64 {
        // transitions are assumed to be more than a day apart, so the offsets
        // around `wall` are the only candidates
        let before = offset_at(wall - SECONDS_PER_DAY);
        [before, offset_at(wall), offset_at(wall + SECONDS_PER_DAY)]
            .into_iter()
            .map(|offset| (offset, wall - i64::from(offset)))
            .filter(|(offset, utc)| offset_at(*utc) == *offset)
            .map(|(_, utc)| utc)
            .min()
            .unwrap_or(wall - i64::from(before))
    }
}

impl TimeNormalizer for ManualConversion {
    fn normalize(&self, value: &CalendarValue) -> Result<UtcInstant, Error> {
        let anchor = anchor_for(value, self.zone)?;
        let micros = Self::micros(value.fractional_second);
        let wall = Self::wall_clock_seconds(value);
        let epoch_seconds = match anchor {
            Anchor::Offset(offset) => wall - i64::from(offset),
            Anchor::Ambient(zone) => Self::resolve_ambient(|utc| zone.offset_at(utc), wall),
        };
        Ok(UtcInstant::new(epoch_seconds, micros))
    }
}

// Howard Hinnant's days_from_civil
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y.rem_euclid(400); // [0, 399]
    let mp = (month + 9) % 12; // March == 0
    let doy = (153 * mp + 2) / 5 + day - 1; // [0, 365]
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy; // [0, 146096]
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1970, 1, 1, 0)]
    #[case(1969, 12, 31, -1)]
    #[case(2000, 3, 1, 11_017)]
    #[case(2000, 2, 29, 11_016)]
    #[case(1, 1, 1, -719_162)]
    #[case(0, 3, 1, -719_468)]
    #[case(-1, 12, 31, -719_529)]
    fn civil_days(#[case] year: i64, #[case] month: i64, #[case] day: i64, #[case] days: i64) {
        assert_eq!(days_from_civil(year, month, day), days);
    }

    #[test]
    fn offsets_rejected_before_conversion() {
        let value = CalendarValue::new(2024, 1, 1).with_offset(86_400);
        let native = NativeConversion::new(AmbientZone::Utc);
        let manual = ManualConversion::new(AmbientZone::Utc);
        assert_eq!(native.normalize(&value), Err(Error::InvalidOffset(86_400)));
        assert_eq!(manual.normalize(&value), Err(Error::InvalidOffset(86_400)));

        let value = value.in_ambient_zone();
        let zone = AmbientZone::Fixed(-90_000);
        assert_eq!(
            NativeConversion::new(zone).normalize(&value),
            Err(Error::InvalidOffset(-90_000))
        );
        assert_eq!(
            ManualConversion::new(zone).normalize(&value),
            Err(Error::InvalidOffset(-90_000))
        );
    }

    #[test]
    fn invalid_fields_rejected() {
        let value = CalendarValue::new(2023, 2, 29).with_offset(0);
        let expected = Err(Error::InvalidCalendar(InvalidCalendar::Day {
            year: 2023,
            month: 2,
            day: 29,
        }));
        assert_eq!(NativeConversion::default().normalize(&value), expected);
        assert_eq!(ManualConversion::default().normalize(&value), expected);
    }

    #[test]
    fn explicit_offset_beats_ambient_zone() {
        let value = CalendarValue::new(2024, 1, 1).with_offset(3600);
        let zone = AmbientZone::Fixed(-18_000);
        let expected = UtcInstant::new(1_704_067_200 - 3600, 0);
        assert_eq!(NativeConversion::new(zone).normalize(&value), Ok(expected));
        assert_eq!(ManualConversion::new(zone).normalize(&value), Ok(expected));
    }

    #[test]
    fn manual_fraction_is_floored() {
        let value = CalendarValue::new(1970, 1, 1)
            .with_fraction(0.9995)
            .with_offset(0);
        let instant = ManualConversion::default().normalize(&value).unwrap();
        assert_eq!(instant, UtcInstant::new(0, 999_500));
    }

    // one hour ahead of UTC from 100_000 to 200_000 seconds after the epoch
    fn summer_time(utc: i64) -> i32 {
        if (100_000..200_000).contains(&utc) {
            3600
        } else {
            0
        }
    }

    /// A zone following [`summer_time`] that, like some host zone databases,
    /// also claims the wall time just after the repeated hour is ambiguous.
    #[derive(Clone, Copy, Debug)]
    struct LooseSummerTime;

    impl TimeZone for LooseSummerTime {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            LooseSummerTime
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> LocalResult<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(chrono::NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> LocalResult<FixedOffset> {
            let fixed = |secs| FixedOffset::east_opt(secs).unwrap();
            match local.and_utc().timestamp() {
                100_000..103_600 => LocalResult::None,
                103_600..200_000 => LocalResult::Single(fixed(3600)),
                200_000..=203_600 => LocalResult::Ambiguous(fixed(3600), fixed(0)),
                _ => LocalResult::Single(fixed(0)),
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(chrono::NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            FixedOffset::east_opt(summer_time(utc.and_utc().timestamp())).unwrap()
        }
    }

    #[rstest]
    #[case::standard_time(50_000, 50_000)]
    #[case::summer_time(150_000, 146_400)]
    #[case::skipped_wall_time(101_000, 101_000)]
    #[case::end_of_skipped_hour(103_600, 100_000)]
    #[case::repeated_wall_time(201_000, 197_400)]
    #[case::start_of_repeated_hour(200_000, 196_400)]
    #[case::end_of_repeated_hour(203_600, 203_600)]
    #[case::after_repeat(204_000, 204_000)]
    fn transitions(#[case] wall: i64, #[case] utc: i64) {
        assert_eq!(ManualConversion::resolve_ambient(summer_time, wall), utc);
        let naive = DateTime::from_timestamp(wall, 0).unwrap().naive_utc();
        assert_eq!(resolve_in(&LooseSummerTime, &naive), utc);
    }
}
