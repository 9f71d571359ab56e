//! The zone used for calendar values without an explicit offset

use chrono::{DateTime, Offset, TimeZone};
use chrono_tz::Tz;

/// The zone a [`CalendarValue`][crate::types::CalendarValue] is interpreted
/// in when it carries no UTC offset of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AmbientZone {
    /// The local time zone of this process, as reported by the OS.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
    /// A constant offset, in seconds east of UTC.
    Fixed(i32),
    /// A zone from the IANA time zone database, with its historical and
    /// daylight saving rules.
    Named(Tz),
}

impl From<Tz> for AmbientZone {
    fn from(tz: Tz) -> Self {
        AmbientZone::Named(tz)
    }
}

impl AmbientZone {
    /// The UTC offset in effect at the given instant, in seconds east of UTC.
    ///
    /// For [`AmbientZone::Local`] and [`AmbientZone::Named`], instants
    /// outside of `chrono`'s range are treated as UTC.
    pub fn offset_at(&self, epoch_seconds: i64) -> i32 {
        let utc = DateTime::from_timestamp(epoch_seconds, 0);
        match self {
            AmbientZone::Utc => Some(0),
            AmbientZone::Fixed(offset) => Some(*offset),
            AmbientZone::Local => utc.map(|utc| offset_of(&chrono::Local, &utc)),
            AmbientZone::Named(tz) => utc.map(|utc| offset_of(tz, &utc)),
        }
        .unwrap_or(0)
    }
}

/// The offset of `tz` at the given UTC datetime, in seconds.
pub(crate) fn offset_of<Tz: TimeZone>(tz: &Tz, utc: &DateTime<chrono::Utc>) -> i32 {
    tz.offset_from_utc_datetime(&utc.naive_utc())
        .fix()
        .local_minus_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_zones() {
        assert_eq!(AmbientZone::Utc.offset_at(0), 0);
        assert_eq!(AmbientZone::Utc.offset_at(-1_000_000_000), 0);
        assert_eq!(AmbientZone::Fixed(-18_000).offset_at(1_704_067_200), -18_000);
        assert_eq!(AmbientZone::default(), AmbientZone::Local);
    }

    #[test]
    fn local_matches_chrono() {
        let instant = 1_704_067_200;
        let expected = chrono::Local
            .timestamp_opt(instant, 0)
            .single()
            .map(|dt| dt.offset().fix().local_minus_utc())
            .unwrap();
        assert_eq!(AmbientZone::Local.offset_at(instant), expected);
    }

    #[test]
    fn local_out_of_range_is_utc() {
        assert_eq!(AmbientZone::Local.offset_at(i64::MAX), 0);
        assert_eq!(AmbientZone::Fixed(3600).offset_at(i64::MAX), 3600);
    }

    #[test]
    fn named_zone_follows_daylight_saving() {
        let new_york = AmbientZone::from(chrono_tz::America::New_York);
        // 2024-01-01T00:00Z and 2024-07-01T00:00Z
        assert_eq!(new_york.offset_at(1_704_067_200), -5 * 3600);
        assert_eq!(new_york.offset_at(1_719_792_000), -4 * 3600);
        // clocks go back at 2024-11-03T06:00Z
        assert_eq!(new_york.offset_at(1_730_613_599), -4 * 3600);
        assert_eq!(new_york.offset_at(1_730_613_600), -5 * 3600);

        let lord_howe = AmbientZone::Named(chrono_tz::Australia::Lord_Howe);
        assert_eq!(lord_howe.offset_at(1_704_067_200), 11 * 3600);
        assert_eq!(lord_howe.offset_at(1_719_792_000), 10 * 3600 + 1800);
        assert_eq!(lord_howe.offset_at(i64::MAX), 0);
    }
}
