use crate::domain::Mailbox;
use crate::email_client::EmailClient;

use super::ProvisioningError;

/// Requests verification of each mailbox in turn, stopping at the first failure.
/// Confirmation happens out of band: the provider mails each address a link.
pub async fn verify_senders(
    email_client: &EmailClient,
    mailboxes: &[&Mailbox],
) -> Result<(), ProvisioningError> {
    for mailbox in mailboxes {
        email_client
            .verify_sender(mailbox)
            .await
            .map_err(|e| ProvisioningError::SenderVerification(mailbox.email.clone(), e))?;
        tracing::info!("Verification email sent to {}", mailbox.email);
    }
    Ok(())
}
