use std::sync::Arc;

use domain::ApplicationBaseUrl;
use subscription::SubscriptionService;

pub mod configuration;
pub mod domain;
pub mod email_client;
pub mod notifications;
pub mod provisioning;
pub mod routes;
pub mod startup;
pub mod store;
pub mod subscription;
pub mod telemetry;
pub mod utils;

pub struct AppState<S, N> {
    pub subscription_service: Arc<SubscriptionService<S, N>>,
    pub application_base_url: Arc<ApplicationBaseUrl>,
}

impl<S, N> Clone for AppState<S, N> {
    fn clone(&self) -> Self {
        Self {
            subscription_service: Arc::clone(&self.subscription_service),
            application_base_url: Arc::clone(&self.application_base_url),
        }
    }
}
