use chrono::{DateTime, SecondsFormat, Utc};

use super::{EmailAddress, SubscriberName, SubscriberPhone, SubscriptionPackage};

/// One row of the keyed store. `email` is the identity; writing a record with
/// an existing email replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub email: EmailAddress,
    pub name: SubscriberName,
    pub phone: SubscriberPhone,
    pub package: SubscriptionPackage,
    pub subscription_date: DateTime<Utc>,
}

impl SubscriptionRecord {
    /// ISO-8601 with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
    pub fn subscription_date_iso(&self) -> String {
        self.subscription_date
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
