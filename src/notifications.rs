use askama::Template;

use crate::domain::{Mailbox, SubscriptionRecord};
use crate::email_client::EmailMessage;

pub const CONFIRMATION_SUBJECT: &str = "Thanks for Subscribing to Our Blog!";
pub const ADMIN_NOTIFICATION_SUBJECT: &str = "New Blog Subscription";

// Templates with an .html extension escape every interpolated value.
#[derive(Template)]
#[template(path = "emails/confirmation.html")]
struct ConfirmationEmail<'a> {
    name: &'a str,
    package: &'a str,
    signature: &'a str,
}

#[derive(Template)]
#[template(path = "emails/admin_notification.html")]
struct AdminNotificationEmail<'a> {
    name: &'a str,
    email: &'a str,
    phone: &'a str,
    package: &'a str,
    date: &'a str,
}

/// The "thanks for subscribing" email, addressed to the subscriber and signed by `sender`.
pub fn confirmation_email(record: &SubscriptionRecord, sender: &Mailbox) -> anyhow::Result<EmailMessage> {
    let html_content = ConfirmationEmail {
        name: record.name.as_ref(),
        package: record.package.as_str(),
        signature: &sender.name,
    }
    .render()
    .map_err(|e| anyhow::anyhow!("Failed to render the confirmation email. {e}"))?;

    Ok(EmailMessage {
        to: Mailbox {
            name: record.name.as_ref().to_owned(),
            email: record.email.clone(),
        },
        subject: CONFIRMATION_SUBJECT.to_owned(),
        html_content,
    })
}

pub fn admin_notification_email(record: &SubscriptionRecord, admin: &Mailbox) -> anyhow::Result<EmailMessage> {
    let date = record.subscription_date_iso();
    let html_content = AdminNotificationEmail {
        name: record.name.as_ref(),
        email: record.email.as_ref(),
        phone: record.phone.as_ref(),
        package: record.package.as_str(),
        date: &date,
    }
    .render()
    .map_err(|e| anyhow::anyhow!("Failed to render the admin notification email. {e}"))?;

    Ok(EmailMessage {
        to: admin.clone(),
        subject: ADMIN_NOTIFICATION_SUBJECT.to_owned(),
        html_content,
    })
}
