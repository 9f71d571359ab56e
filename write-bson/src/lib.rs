//! Writing BSON UTC-datetime values
//!
//! A [BSON] UTC datetime is an `i64` count of milliseconds since the Unix
//! epoch, written as eight little-endian bytes. This crate converts calendar
//! date-times ([`CalendarValue`][types::CalendarValue]) to that form:
//!
//! ```
//! use write_bson::{types::CalendarValue, DateTimeEncoder};
//!
//! let encoder = DateTimeEncoder::new();
//! let new_year = CalendarValue::new(2023, 12, 31)
//!     .with_time(19, 0, 0)
//!     .with_offset(-5 * 3600);
//! let bytes = encoder.encode(&new_year).unwrap();
//! assert_eq!(bytes, 1_704_067_200_000_i64.to_le_bytes());
//! ```
//!
//! Writing the element type byte (see
//! [`UtcDateTime::ELEMENT_TYPE`][types::UtcDateTime::ELEMENT_TYPE]) and field
//! name is left to the enclosing document encoder.
//!
//! [BSON]: https://bsonspec.org/spec.html

#![forbid(unsafe_code)]

mod capability;
mod encoder;
mod error;
mod millis;
pub mod normalize;
mod write;
mod zone;

pub use capability::{Capability, CONVERSION_ENV_VAR};
pub use encoder::{encode, encode_instant_into, encode_into, DateTimeEncoder};
pub use error::Error;
pub use millis::{encode_datetime, encode_millis};
pub use normalize::TimeNormalizer;
pub use write::{dump_value, write_millis, BsonWrite, ByteSink};
pub use zone::AmbientZone;

/// Public re-export of the bson-types crate.
pub extern crate bson_types as types;
