//! Appending encoded values to a byte buffer

use crate::types::{LittleEndian, Scalar, UtcDateTime};

/// A destination for encoded bytes.
///
/// Sinks are append-only: every write lands after all previous writes, and
/// never touches bytes already written.
pub trait ByteSink {
    /// Append these bytes.
    fn write_slice(&mut self, bytes: &[u8]);
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes)
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    #[inline]
    fn write_slice(&mut self, bytes: &[u8]) {
        (**self).write_slice(bytes)
    }
}

/// A type that can be written out as part of a BSON document.
///
/// Implementors write only their value bytes; the element type byte and
/// field name belong to the enclosing document.
pub trait BsonWrite {
    /// Write our data into this [`ByteSink`].
    fn write_into(&self, sink: &mut dyn ByteSink);
}

/// Serialize a single value into a new buffer.
pub fn dump_value<T: BsonWrite + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = Vec::new();
    value.write_into(&mut out);
    out
}

/// Append the eight little-endian bytes of `millis` to the sink.
#[inline]
pub fn write_millis(sink: &mut dyn ByteSink, millis: i64) {
    UtcDateTime::from_millis(millis).write_into(sink)
}

impl BsonWrite for UtcDateTime {
    #[inline]
    fn write_into(&self, sink: &mut dyn ByteSink) {
        LittleEndian::from(*self).write_into(sink)
    }
}

impl<T: Scalar> BsonWrite for LittleEndian<T> {
    #[inline]
    fn write_into(&self, sink: &mut dyn ByteSink) {
        sink.write_slice(self.le_bytes())
    }
}
