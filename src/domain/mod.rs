mod application_base_url;
mod email_address;
mod mailbox;
mod new_subscription;
mod subscriber_name;
mod subscriber_phone;
mod subscription_package;
mod subscription_record;

pub use application_base_url::ApplicationBaseUrl;
pub use email_address::EmailAddress;
pub use mailbox::Mailbox;
pub use new_subscription::NewSubscription;
pub use subscriber_name::SubscriberName;
pub use subscriber_phone::SubscriberPhone;
pub use subscription_package::SubscriptionPackage;
pub use subscription_record::SubscriptionRecord;
