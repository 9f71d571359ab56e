//! Errors that occur during encoding

use crate::types::InvalidCalendar;

/// An error occured while encoding a datetime.
///
/// When an encode call returns an error, nothing has been written to the sink.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// The number of milliseconds since the epoch does not fit in an `i64`.
    RangeOverflow { epoch_seconds: i64 },
    /// The UTC offset, in seconds, was not strictly within one day.
    InvalidOffset(i32),
    /// A calendar field was out of range.
    InvalidCalendar(InvalidCalendar),
}

impl From<InvalidCalendar> for Error {
    fn from(src: InvalidCalendar) -> Error {
        Error::InvalidCalendar(src)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::RangeOverflow { epoch_seconds } => write!(
                f,
                "{epoch_seconds} seconds since the epoch overflows the millisecond range"
            ),
            Error::InvalidOffset(offset) => {
                write!(f, "UTC offset of {offset} seconds is out of range")
            }
            Error::InvalidCalendar(error) => write!(f, "invalid calendar value: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidCalendar(error) => Some(error),
            _ => None,
        }
    }
}
