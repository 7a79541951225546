//! The subscription handler: one HTTP-shaped request in, one HTTP-shaped
//! response out. Both the local axum server and the function host adapt their
//! requests into [`HttpRequest`] and relay the returned [`HttpResponse`].
//!
//! Side effects are not transactional. The record is written before either
//! email is sent, so a failed send leaves the record in place while the caller
//! still receives the failure envelope.

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{field::display, Span};

use crate::domain::{Mailbox, NewSubscription, SubscriptionRecord};
use crate::email_client::EmailSender;
use crate::notifications::{admin_notification_email, confirmation_email};
use crate::store::SubscriptionStore;
use crate::utils::error_chain_fmt;

pub const ALLOWED_HEADERS: &str = "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token";
pub const ALLOWED_METHODS: &str = "OPTIONS,POST";

/// Inbound request in the shape of an API Gateway proxy event.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRequest {
    pub http_method: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionFormData {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub package: String,
}

#[derive(Debug, Clone)]
pub struct NotificationSettings {
    pub sender: Mailbox,
    pub admin: Mailbox,
}

#[derive(Debug, Clone)]
pub struct CorsSettings {
    pub allowed_origin: String,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origin: "*".into(),
        }
    }
}

impl CorsSettings {
    fn headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Access-Control-Allow-Origin".into(), self.allowed_origin.clone()),
            ("Access-Control-Allow-Headers".into(), ALLOWED_HEADERS.into()),
            ("Access-Control-Allow-Methods".into(), ALLOWED_METHODS.into()),
            ("Access-Control-Allow-Credentials".into(), "true".into()),
            ("Content-Type".into(), "application/json".into()),
        ])
    }
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    InputError(String),
    #[error(transparent)]
    DependencyError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub struct SubscriptionService<S, N> {
    store: S,
    email_sender: N,
    notifications: NotificationSettings,
    cors: CorsSettings,
}

impl<S, N> SubscriptionService<S, N>
where
    S: SubscriptionStore,
    N: EmailSender,
{
    pub fn new(store: S, email_sender: N, notifications: NotificationSettings, cors: CorsSettings) -> Self {
        Self {
            store,
            email_sender,
            notifications,
            cors,
        }
    }

    #[tracing::instrument(
        name = "Handling a subscription request",
        skip(self, request),
        fields(http_method = %request.http_method, subscriber_email = tracing::field::Empty)
    )]
    pub async fn handle(&self, request: HttpRequest) -> HttpResponse {
        if request.http_method.eq_ignore_ascii_case("OPTIONS") {
            return self.respond(200, json!({ "message": "CORS preflight response" }));
        }

        match self.subscribe(request.body.as_deref()).await {
            Ok(_) => self.respond(
                200,
                json!({ "message": "Subscription successful", "success": true }),
            ),
            Err(e) => {
                tracing::error!(error.cause_chain = ?e, "Error processing subscription");
                self.reject(&e)
            }
        }
    }

    /// The failure envelope, for requests the front door could not hand over.
    pub fn reject(&self, error: &dyn std::fmt::Display) -> HttpResponse {
        self.respond(
            500,
            json!({
                "message": "Failed to process subscription",
                "success": false,
                "error": error.to_string(),
            }),
        )
    }

    /// Validates `body`, stores the record and sends both emails, in that order.
    pub async fn subscribe(&self, body: Option<&str>) -> Result<SubscriptionRecord, SubscribeError> {
        let form = parse_form(body)?;
        let new_subscription: NewSubscription =
            form.try_into().map_err(SubscribeError::InputError)?;
        Span::current().record("subscriber_email", &display(&new_subscription.email));
        tracing::info!(
            subscriber_name = %new_subscription.name,
            phone = %new_subscription.phone,
            package = %new_subscription.package,
            "Received form submission"
        );

        let record = new_subscription.into_record(Utc::now());

        tracing::info!("Storing subscription");
        self.store.put(&record).await?;
        tracing::info!("Subscription stored");

        let confirmation = confirmation_email(&record, &self.notifications.sender)?;
        self.email_sender.send(&confirmation).await?;
        tracing::info!("Confirmation email sent to subscriber");

        let notification = admin_notification_email(&record, &self.notifications.admin)?;
        self.email_sender.send(&notification).await?;
        tracing::info!("Notification email sent to admin");

        Ok(record)
    }

    fn respond(&self, status_code: u16, body: serde_json::Value) -> HttpResponse {
        HttpResponse {
            status_code,
            headers: self.cors.headers(),
            body: body.to_string(),
        }
    }
}

fn parse_form(body: Option<&str>) -> Result<SubscriptionFormData, SubscribeError> {
    let body = match body {
        Some(body) if !body.trim().is_empty() => body,
        _ => return Err(SubscribeError::InputError("The request body is missing.".into())),
    };
    serde_json::from_str(body)
        .map_err(|e| SubscribeError::InputError(format!("The request body is not a valid subscription. {e}")))
}
