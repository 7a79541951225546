use std::fmt;

use serde::{Deserialize, Serialize};
use validator::validate_email;

/// A syntactically valid address. It is the subscriber's key in the store
/// and the address half of every [`Mailbox`](super::Mailbox). Configured
/// sender and admin addresses are checked when the settings are loaded.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Surrounding whitespace from the form is dropped before validation.
    pub fn parse(s: String) -> Result<Self, String> {
        let trimmed = s.trim();
        if !validate_email(trimmed) {
            return Err(format!("{s} is not a valid email address."));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
