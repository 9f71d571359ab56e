//! Choosing between native and manual calendar conversion

use std::sync::OnceLock;

use crate::{
    normalize::{NativeConversion, TimeNormalizer},
    types::{CalendarValue, UtcInstant},
    zone::AmbientZone,
};

/// The environment variable that overrides capability detection.
///
/// Recognized values are `native` and `manual`, in any case.
pub const CONVERSION_ENV_VAR: &str = "BSON_DATETIME_CONVERSION";

static DETECTED: OnceLock<Capability> = OnceLock::new();

/// Whether native calendar-to-instant conversion can be used.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Convert with [`NativeConversion`].
    Native,
    /// Convert with [`ManualConversion`][crate::normalize::ManualConversion].
    Manual,
}

/// Calendar values paired with the instants they must resolve to.
const PROBES: &[(CalendarValue, UtcInstant)] = &[
    (CalendarValue::new(1970, 1, 1).with_offset(0), UtcInstant::EPOCH),
    (
        CalendarValue::new(2000, 1, 1).with_offset(0),
        UtcInstant::new(946_684_800, 0),
    ),
    (
        CalendarValue::new(1969, 12, 31)
            .with_time(23, 59, 59)
            .with_fraction(0.5)
            .with_offset(0),
        UtcInstant::new(-1, 500_000),
    ),
    (
        CalendarValue::new(2023, 12, 31)
            .with_time(19, 0, 0)
            .with_offset(-18_000),
        UtcInstant::new(1_704_067_200, 0),
    ),
    (
        CalendarValue::new(1600, 2, 29).with_offset(3600),
        UtcInstant::new(-11_670_998_400 - 3600, 0),
    ),
];

impl Capability {
    /// Determine the capability of this process.
    ///
    /// The first call inspects the environment; the result is cached for the
    /// life of the process. This never fails: if the inspection is
    /// inconclusive, the result is [`Capability::Manual`].
    pub fn detect() -> Capability {
        *DETECTED.get_or_init(|| {
            let capability = Capability::detect_uncached();
            log::debug!("using {capability:?} datetime conversion");
            capability
        })
    }

    /// Inspect the environment, without consulting or updating the cache.
    pub fn detect_uncached() -> Capability {
        let value = std::env::var_os(CONVERSION_ENV_VAR);
        match value.as_ref().map(|value| value.to_str()) {
            None => Capability::inspect(None),
            Some(Some(value)) => Capability::inspect(Some(value)),
            Some(None) => {
                log::warn!("{CONVERSION_ENV_VAR} is not valid unicode, using manual conversion");
                Capability::Manual
            }
        }
    }

    fn inspect(env_override: Option<&str>) -> Capability {
        match env_override.map(str::trim) {
            None | Some("") => Capability::probe(),
            Some(value) if value.eq_ignore_ascii_case("native") => Capability::Native,
            Some(value) if value.eq_ignore_ascii_case("manual") => Capability::Manual,
            Some(value) => {
                log::warn!("unrecognized {CONVERSION_ENV_VAR} '{value}', using manual conversion");
                Capability::Manual
            }
        }
    }

    /// Check that native conversion resolves a set of known dates correctly.
    fn probe() -> Capability {
        let native = NativeConversion::new(AmbientZone::Utc);
        let failed = PROBES
            .iter()
            .find(|(value, expected)| native.normalize(value) != Ok(*expected));
        match failed {
            None => Capability::Native,
            Some((value, _)) => {
                log::debug!("native conversion failed self check for {value}");
                Capability::Manual
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::ManualConversion;

    #[test]
    fn probes_agree_with_manual() {
        let manual = ManualConversion::new(AmbientZone::Utc);
        for (value, expected) in PROBES {
            assert_eq!(manual.normalize(value), Ok(*expected), "{value}");
        }
    }

    #[test]
    fn chrono_passes_self_check() {
        assert_eq!(Capability::probe(), Capability::Native);
        assert_eq!(Capability::inspect(None), Capability::Native);
        assert_eq!(Capability::inspect(Some("  ")), Capability::Native);
    }

    #[test]
    fn override_values() {
        let _ = env_logger::builder().is_test(true).try_init();
        assert_eq!(Capability::inspect(Some("manual")), Capability::Manual);
        assert_eq!(Capability::inspect(Some("MANUAL")), Capability::Manual);
        assert_eq!(Capability::inspect(Some("Native ")), Capability::Native);
        // inconclusive
        assert_eq!(Capability::inspect(Some("fast")), Capability::Manual);
    }

    #[test]
    fn detection_is_memoized() {
        let first = Capability::detect();
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(Capability::detect))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), first);
        }
    }
}
