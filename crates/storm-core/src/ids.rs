//! Server identifiers.
//!
//! Storm addresses servers by a six-character `uniq_id` made of upper-case
//! letters and digits. [`UniqId`] keeps that validated form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Length of a server `uniq_id`.
pub const UNIQ_ID_LEN: usize = 6;

/// Validated server identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UniqId(String);

impl UniqId {
    /// Parses an identifier from a string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidId`] unless the input is six upper-case ASCII
    /// letters or digits.
    pub fn parse_str(input: &str) -> Result<Self> {
        let valid = input.len() == UNIQ_ID_LEN
            && input
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());

        if valid {
            Ok(Self(input.to_string()))
        } else {
            Err(Error::InvalidId(input.to_string()))
        }
    }

    /// Generates a random identifier.
    #[must_use]
    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(UNIQ_ID_LEN);
        Self(id.to_ascii_uppercase())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UniqId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl fmt::Display for UniqId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UniqId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<UniqId> for serde_json::Value {
    fn from(id: UniqId) -> Self {
        Self::String(id.0)
    }
}

impl From<&UniqId> for serde_json::Value {
    fn from(id: &UniqId) -> Self {
        Self::String(id.0.clone())
    }
}
