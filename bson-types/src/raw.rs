//! types for working with raw little-endian bytes
//!
//! Every fixed-width numeric value in a BSON document is stored
//! little-endian, so unlike most binary formats there is no big-endian
//! counterpart here.

/// A trait for BSON scalars.
///
/// This is an internal trait for encoding and decoding little-endian bytes.
///
/// You do not need to implement this trait directly; it is an implemention
/// detail of the [`LittleEndian`] wrapper.
pub trait Scalar: Sized {
    /// The raw byte representation of this type.
    type Raw: sealed::LeByteArray;

    /// Create an instance of this type from raw little-endian bytes
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw little-endian bytes
    fn to_raw(self) -> Self::Raw;
}

/// A trait for types that have a known, constant size.
pub trait FixedSize: Sized {
    /// The raw size of this type, in bytes.
    ///
    /// This is the size required to represent this type in a BSON document,
    /// which may differ from the size of the native type.
    const RAW_BYTE_LEN: usize;
}

// we want to keep LeByteArray private
pub(crate) mod sealed {
    /// A trait for a small set of stack-allocated byte arrays.
    pub trait LeByteArray: Copy + AsRef<[u8]> + PartialEq + Eq + core::hash::Hash {
        /// Must always succeed for `[u8; N]` if `slice.len() == N`, must fail otherwise
        fn from_slice(slice: &[u8]) -> Option<Self>;
    }

    impl<const N: usize> LeByteArray for [u8; N] {
        fn from_slice(slice: &[u8]) -> Option<Self> {
            slice.try_into().ok()
        }
    }
}

/// The encoded bytes of a BSON scalar, as they appear in a document.
///
/// Encoders write a value by converting it into this wrapper and copying out
/// [`le_bytes`][Self::le_bytes].
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct LittleEndian<T: Scalar>(pub(crate) T::Raw);

impl<T: Scalar> LittleEndian<T> {
    /// Attempt to read an encoded value from this slice.
    ///
    /// This will fail if `slice.len() != T::RAW_BYTE_LEN`.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        sealed::LeByteArray::from_slice(slice).map(Self)
    }

    /// Convert the encoded bytes back to the value.
    #[inline(always)]
    pub fn get(&self) -> T {
        T::from_raw(self.0)
    }

    /// The raw little-endian bytes.
    pub fn le_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: Scalar> From<T> for LittleEndian<T> {
    #[inline]
    fn from(val: T) -> Self {
        LittleEndian(val.to_raw())
    }
}

impl<T: FixedSize + Scalar> FixedSize for LittleEndian<T> {
    const RAW_BYTE_LEN: usize = T::RAW_BYTE_LEN;
}

/// An internal macro for implementing the `Scalar` trait.
#[macro_export]
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl $crate::Scalar for $name {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                $crate::Scalar::to_raw(self.0)
            }

            fn from_raw(raw: $raw) -> Self {
                Self($crate::Scalar::from_raw(raw))
            }
        }

        impl $crate::FixedSize for $name {
            const RAW_BYTE_LEN: usize = core::mem::size_of::<$raw>();
        }
    };
}

impl Scalar for i64 {
    type Raw = [u8; 8];
    fn to_raw(self) -> [u8; 8] {
        self.to_le_bytes()
    }

    #[inline(always)]
    fn from_raw(raw: [u8; 8]) -> i64 {
        i64::from_le_bytes(raw)
    }
}

impl FixedSize for i64 {
    const RAW_BYTE_LEN: usize = 8;
}

impl<T: core::fmt::Debug + Scalar + Copy> core::fmt::Debug for LittleEndian<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        self.get().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn i64_is_little_endian() {
        let raw = LittleEndian::from(0x0102_0304_0506_0708_i64);
        assert_eq!(raw.le_bytes(), &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(raw.get(), 0x0102_0304_0506_0708);
    }

    #[test]
    fn negative_is_twos_complement() {
        let raw = LittleEndian::from(-1i64);
        assert_eq!(raw.le_bytes(), &[0xff; 8]);
        let raw = LittleEndian::from(-500i64);
        assert_eq!(raw.le_bytes(), &[0x0c, 0xfe, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn from_slice_requires_exact_length() {
        assert!(LittleEndian::<i64>::from_slice(&[0; 7]).is_none());
        assert!(LittleEndian::<i64>::from_slice(&[0; 9]).is_none());
        let raw = LittleEndian::<i64>::from_slice(&[0xff; 8]).unwrap();
        assert_eq!(raw.get(), -1);
        assert_eq!(<LittleEndian<i64> as FixedSize>::RAW_BYTE_LEN, 8);
    }
}
