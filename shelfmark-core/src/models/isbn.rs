use std::fmt;

use serde::Serialize;

use crate::error::ValidationError;

/// Number of digits in an ISBN-13.
pub const ISBN_LEN: usize = 13;

/// A validated 13-digit ISBN. The only way to obtain one is [`Isbn::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Isbn(String);

impl Isbn {
    /// Validate `raw` (surrounding whitespace ignored). No checksum is
    /// computed; any 13 ASCII digits are accepted.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.len() == ISBN_LEN && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(ValidationError::MalformedIsbn(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for Isbn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
