//! Common scalar data types used in [BSON] documents
//!
//! [BSON]: https://bsonspec.org/spec.html

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod calendar;
mod datetime;
mod instant;
mod raw;

#[cfg(all(test, feature = "serde"))]
mod serde_test;

pub use calendar::{days_in_month, is_leap_year, CalendarValue, InvalidCalendar};
pub use datetime::UtcDateTime;
pub use instant::UtcInstant;
pub use raw::{FixedSize, LittleEndian, Scalar};
