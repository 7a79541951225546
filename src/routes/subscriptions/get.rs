use askama_axum::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::domain::SubscriptionPackage;
use crate::email_client::EmailSender;
use crate::store::SubscriptionStore;
use crate::utils::e500;
use crate::AppState;

#[derive(Template)]
#[template(path = "subscribe.html")]
struct SubscribeForm {
    action: String,
    packages: &'static [SubscriptionPackage],
}

pub async fn subscribe_form<S, N>(state: State<AppState<S, N>>) -> Response
where
    S: SubscriptionStore + 'static,
    N: EmailSender + 'static,
{
    match state.application_base_url.join("api/subscribe") {
        Ok(action) => SubscribeForm {
            action: action.to_string(),
            packages: &SubscriptionPackage::ALL,
        }
        .into_response(),
        Err(e) => e500(e).into_response(),
    }
}
