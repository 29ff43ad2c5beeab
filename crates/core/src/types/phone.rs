//! North American phone number in `ddd-ddd-dddd` form.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not match `ddd-ddd-dddd`.
    #[error("phone number must be in format xxx-xxx-xxxx")]
    InvalidFormat,
}

/// A phone number matching exactly `\d{3}-\d{3}-\d{4}`.
///
/// ```
/// use candy_shop_core::Phone;
///
/// assert!(Phone::parse("123-456-7890").is_ok());
/// assert!(Phone::parse("1234567890").is_err());
/// assert!(Phone::parse("123-45-6789").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Length of a formatted number, dashes included.
    pub const LENGTH: usize = 12;

    /// Byte offsets of the two dashes.
    const DASHES: [usize; 2] = [3, 7];

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] for an empty string and
    /// [`PhoneError::InvalidFormat`] for anything other than `ddd-ddd-dddd`.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if s.len() != Self::LENGTH {
            return Err(PhoneError::InvalidFormat);
        }

        let well_formed = s.bytes().enumerate().all(|(i, b)| {
            if Self::DASHES.contains(&i) {
                b == b'-'
            } else {
                b.is_ascii_digit()
            }
        });

        if !well_formed {
            return Err(PhoneError::InvalidFormat);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
