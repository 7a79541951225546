use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SubscriberName(String);

impl SubscriberName {
    pub fn parse(s: String) -> Result<Self, String> {
        let is_empty_or_whitespace = s.trim().is_empty();
        let graphemes = s.trim().graphemes(true).count();
        let is_too_short = graphemes < 2;
        let is_too_long = graphemes > 256;

        if is_empty_or_whitespace || is_too_short || is_too_long {
            return Err(format!("{s} is not a valid subscriber name."));
        }
        Ok(Self(s.trim().to_string()))
    }
}

impl AsRef<str> for SubscriberName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
