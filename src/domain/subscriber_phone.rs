use serde::Serialize;

/// A ten digit phone number, stored exactly as submitted.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SubscriberPhone(String);

impl SubscriberPhone {
    pub fn parse(s: String) -> Result<Self, String> {
        if s.len() == 10 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s))
        } else {
            Err(format!("{s} is not a valid phone number. Expected exactly 10 digits."))
        }
    }
}

impl AsRef<str> for SubscriberPhone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberPhone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
