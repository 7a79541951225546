use chrono::{DateTime, Utc};

use crate::subscription::SubscriptionFormData;

use super::{EmailAddress, SubscriberName, SubscriberPhone, SubscriptionPackage, SubscriptionRecord};

#[derive(Debug)]
pub struct NewSubscription {
    pub name: SubscriberName,
    pub email: EmailAddress,
    pub phone: SubscriberPhone,
    pub package: SubscriptionPackage,
}

impl NewSubscription {
    pub fn into_record(self, subscription_date: DateTime<Utc>) -> SubscriptionRecord {
        SubscriptionRecord {
            email: self.email,
            name: self.name,
            phone: self.phone,
            package: self.package,
            subscription_date,
        }
    }
}

impl TryFrom<SubscriptionFormData> for NewSubscription {
    type Error = String;

    fn try_from(value: SubscriptionFormData) -> Result<Self, Self::Error> {
        let name = SubscriberName::parse(value.name)?;
        let email = EmailAddress::parse(value.email)?;
        let phone = SubscriberPhone::parse(value.phone)?;
        let package = SubscriptionPackage::parse(&value.package)?;
        Ok(Self {
            name,
            email,
            phone,
            package,
        })
    }
}
