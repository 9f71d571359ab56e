//! The public encoding entry points

use crate::{
    capability::Capability,
    error::Error,
    millis::encode_millis,
    normalize::{ManualConversion, NativeConversion, TimeNormalizer},
    types::{CalendarValue, UtcInstant},
    write::{write_millis, ByteSink},
    zone::AmbientZone,
};

#[cfg(test)]
#[path = "tests/encoder.rs"]
mod tests;

/// Encodes calendar values as BSON UTC-datetime values.
///
/// The conversion strategy is fixed when the encoder is created, either from
/// [`Capability::detect`] or explicitly with
/// [`with_capability`][Self::with_capability]. Values without a UTC offset
/// are interpreted in the encoder's [`AmbientZone`], which defaults to the
/// local time zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateTimeEncoder {
    capability: Capability,
    zone: AmbientZone,
}

impl DateTimeEncoder {
    /// An encoder using the detected capability and the local time zone.
    pub fn new() -> Self {
        Self::with_capability(Capability::detect())
    }

    /// An encoder using the given conversion strategy.
    pub fn with_capability(capability: Capability) -> Self {
        DateTimeEncoder {
            capability,
            zone: AmbientZone::default(),
        }
    }

    /// Use `zone` for values that have no UTC offset.
    pub fn with_zone(self, zone: AmbientZone) -> Self {
        DateTimeEncoder { zone, ..self }
    }

    /// The conversion strategy this encoder uses.
    pub fn capability(&self) -> Capability {
        self.capability
    }

    /// The zone used for values that have no UTC offset.
    pub fn zone(&self) -> AmbientZone {
        self.zone
    }

    /// Resolve a calendar value to the instant it describes.
    pub fn normalize(&self, value: &CalendarValue) -> Result<UtcInstant, Error> {
        log::trace!("normalizing {value} with {:?} conversion", self.capability);
        match self.capability {
            Capability::Native => NativeConversion::new(self.zone).normalize(value),
            Capability::Manual => ManualConversion::new(self.zone).normalize(value),
        }
    }

    /// Append the eight bytes encoding `value` to `sink`.
    ///
    /// On error, nothing is written.
    pub fn encode_into(&self, value: &CalendarValue, sink: &mut dyn ByteSink) -> Result<(), Error> {
        let instant = self.normalize(value)?;
        encode_instant_into(instant, sink)
    }

    /// Encode `value` into a new buffer.
    pub fn encode(&self, value: &CalendarValue) -> Result<Vec<u8>, Error> {
        let mut buf = Vec::with_capacity(8);
        self.encode_into(value, &mut buf)?;
        Ok(buf)
    }
}

impl Default for DateTimeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode `value` into a new buffer, with the default [`DateTimeEncoder`].
pub fn encode(value: &CalendarValue) -> Result<Vec<u8>, Error> {
    DateTimeEncoder::new().encode(value)
}

/// Append the encoding of `value` to `sink`, with the default [`DateTimeEncoder`].
///
/// On error, nothing is written.
pub fn encode_into(value: &CalendarValue, sink: &mut dyn ByteSink) -> Result<(), Error> {
    DateTimeEncoder::new().encode_into(value, sink)
}

/// Append the eight bytes encoding an already resolved instant to `sink`.
///
/// This is the second half of [`DateTimeEncoder::encode_into`]; the instant
/// carries no zone, so the result does not depend on the encoder.
///
/// On error, nothing is written.
pub fn encode_instant_into(instant: UtcInstant, sink: &mut dyn ByteSink) -> Result<(), Error> {
    let millis = encode_millis(instant)?;
    write_millis(sink, millis);
    Ok(())
}
