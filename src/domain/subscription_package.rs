use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionPackage {
    Basic,
    Standard,
    Premium,
}

impl SubscriptionPackage {
    pub const ALL: [SubscriptionPackage; 3] = [Self::Basic, Self::Standard, Self::Premium];

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "basic" => Ok(Self::Basic),
            "standard" => Ok(Self::Standard),
            "premium" => Ok(Self::Premium),
            other => Err(format!(
                "{other} is not a valid package. Use one of `basic`, `standard` or `premium`."
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Standard => "standard",
            Self::Premium => "premium",
        }
    }

    /// Label shown in the subscription form.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Basic => "Basic Package",
            Self::Standard => "Standard Package",
            Self::Premium => "Premium Package",
        }
    }
}

impl fmt::Display for SubscriptionPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
