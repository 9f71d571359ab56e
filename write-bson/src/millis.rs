//! Converting instants to milliseconds since the epoch

use crate::{
    error::Error,
    types::{UtcDateTime, UtcInstant},
};

/// Convert an instant to whole milliseconds since the epoch.
///
/// The result is rounded toward negative infinity. Since the sub-second part
/// of a [`UtcInstant`] is never negative, this holds for instants before the
/// epoch as well: half a second before the epoch is `-500`, not `500` or
/// `-1500`.
pub fn encode_millis(instant: UtcInstant) -> Result<i64, Error> {
    let epoch_seconds = instant.epoch_seconds();
    // widened so that values just past i64::MIN seconds can still land in range
    let millis = i128::from(epoch_seconds) * 1000 + i128::from(instant.subsec_micros() / 1000);
    i64::try_from(millis).map_err(|_| Error::RangeOverflow { epoch_seconds })
}

/// Convert an instant to a [`UtcDateTime`].
pub fn encode_datetime(instant: UtcInstant) -> Result<UtcDateTime, Error> {
    encode_millis(instant).map(UtcDateTime::from_millis)
}
