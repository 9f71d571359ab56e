//! the BSON UTC-datetime scalar

/// A BSON UTC datetime.
///
/// This is represented as a signed number of milliseconds since
/// 1970-01-01T00:00:00Z, stored as eight little-endian bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct UtcDateTime(i64);

impl UtcDateTime {
    /// The element type byte that precedes a UTC datetime in a document.
    pub const ELEMENT_TYPE: u8 = 0x09;

    /// The epoch itself.
    pub const EPOCH: UtcDateTime = UtcDateTime(0);

    /// Create a new datetime from milliseconds since the epoch.
    pub const fn from_millis(millis: i64) -> Self {
        UtcDateTime(millis)
    }

    /// The number of milliseconds since 1970-01-01T00:00:00Z.
    ///
    /// This can be a negative number, for dates before the epoch.
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// The encoded form of this value.
    pub const fn to_le_bytes(self) -> [u8; 8] {
        self.0.to_le_bytes()
    }

    /// Decode a value from its encoded form.
    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        UtcDateTime(i64::from_le_bytes(bytes))
    }
}

crate::newtype_scalar!(UtcDateTime, [u8; 8]);

impl core::fmt::Display for UtcDateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixedSize, LittleEndian};

    #[test]
    fn little_endian_wrapper() {
        let raw = LittleEndian::from(UtcDateTime::from_millis(1_704_067_200_000));
        assert_eq!(raw.le_bytes(), &1_704_067_200_000_i64.to_le_bytes());
        assert_eq!(raw.get().as_millis(), 1_704_067_200_000);
        assert_eq!(UtcDateTime::RAW_BYTE_LEN, 8);
    }

    #[test]
    fn pre_epoch_bytes() {
        let value = UtcDateTime::from_millis(-500);
        assert_eq!(
            value.to_le_bytes(),
            [0x0c, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
        assert_eq!(UtcDateTime::from_le_bytes(value.to_le_bytes()), value);
    }
}
