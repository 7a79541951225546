use serde::{Deserialize, Serialize};

use super::EmailAddress;

/// A display name paired with an address, as the email API expects it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub name: String,
    pub email: EmailAddress,
}
