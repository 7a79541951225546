use std::future::Future;
use std::time::Duration;

use reqwest::{header, Client, ClientBuilder, Url};
use secrecy::ExposeSecret;
use serde::Serialize;

use crate::configuration::EmailSettings;
use crate::domain::Mailbox;

/// A single HTML email, ready to hand to the provider.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: Mailbox,
    pub subject: String,
    pub html_content: String,
}

pub trait EmailSender: Send + Sync {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = anyhow::Result<()>> + Send;
}

pub struct EmailClient {
    http_client: Client,
    url: Url,
    sender: Mailbox,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender: &'a Mailbox,
    to: Vec<&'a Mailbox>,
    subject: &'a str,
    html_content: &'a str,
}

impl EmailClient {
    pub fn new(config: EmailSettings) -> anyhow::Result<Self> {
        let url = Url::parse(&config.endpoint).map_err(|e| anyhow::anyhow!(e.to_string()))?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            "api-key",
            config
                .api_key
                .expose_secret()
                .parse()
                .map_err(|e| anyhow::anyhow!("Failed to parse api_key: {e}"))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http_client = ClientBuilder::new()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_millis))
            .build()
            .map_err(|e| anyhow::anyhow!(e.to_string()))?;

        Ok(Self {
            http_client,
            url,
            sender: config.sender,
        })
    }

    #[tracing::instrument(name = "Sending an email", skip(self, html_content), fields(recipient = %recipient.email))]
    pub async fn send_email(
        &self,
        recipient: &Mailbox,
        subject: &str,
        html_content: &str,
    ) -> anyhow::Result<()> {
        let url = self
            .url
            .join("/v3/smtp/email")
            .map_err(|e| anyhow::anyhow!(e))?;
        let body = SendEmailRequest {
            sender: &self.sender,
            to: vec![recipient],
            subject,
            html_content,
        };

        self.http_client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send an email to {}. {e}", recipient.email))?
            .error_for_status()
            .map_err(|e| {
                anyhow::anyhow!("Error while sending an email to {}. {e}", recipient.email)
            })?;
        Ok(())
    }

    /// Asks the provider to register `mailbox` as a sender. The provider mails a
    /// confirmation link to the address; nothing here waits for it.
    #[tracing::instrument(name = "Requesting sender verification", skip(self), fields(sender = %mailbox.email))]
    pub async fn verify_sender(&self, mailbox: &Mailbox) -> anyhow::Result<()> {
        let url = self
            .url
            .join("/v3/senders")
            .map_err(|e| anyhow::anyhow!(e))?;

        self.http_client
            .post(url)
            .json(mailbox)
            .send()
            .await
            .map_err(|e| {
                anyhow::anyhow!("Failed to request verification of {}. {e}", mailbox.email)
            })?
            .error_for_status()
            .map_err(|e| {
                anyhow::anyhow!("Error while requesting verification of {}. {e}", mailbox.email)
            })?;
        Ok(())
    }
}

impl EmailSender for EmailClient {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        self.send_email(&message.to, &message.subject, &message.html_content)
            .await
    }
}

impl<T: EmailSender> EmailSender for std::sync::Arc<T> {
    fn send(&self, message: &EmailMessage) -> impl Future<Output = anyhow::Result<()>> + Send {
        (**self).send(message)
    }
}
