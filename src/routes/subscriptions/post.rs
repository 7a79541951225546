use axum::body::{Body, Bytes};
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::email_client::EmailSender;
use crate::store::SubscriptionStore;
use crate::subscription::{HttpRequest, HttpResponse};
use crate::utils::e500;
use crate::AppState;

/// Front door for `POST` and `OPTIONS /api/subscribe`: adapts the inbound
/// request into the handler's shape and relays whatever it answers.
/// Bodies axum cannot buffer still get the handler's failure envelope.
#[tracing::instrument(name = "Relaying a subscription request", skip_all, fields(http_method = %method))]
pub async fn subscribe<S, N>(
    state: State<AppState<S, N>>,
    method: Method,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response
where
    S: SubscriptionStore + 'static,
    N: EmailSender + 'static,
{
    let body = match body {
        Ok(body) => body,
        Err(rejection) => {
            tracing::warn!("Failed to read the request body: {rejection}");
            return relay(state.subscription_service.reject(&rejection));
        }
    };
    let body = match String::from_utf8(body.to_vec()) {
        Ok(body) => body,
        Err(e) => {
            // Left to the handler, which rejects it as malformed JSON.
            tracing::warn!("The request body is not valid UTF-8: {e}");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    let request = HttpRequest {
        http_method: method.as_str().to_owned(),
        body: (!body.is_empty()).then_some(body),
        headers: Some(
            headers
                .iter()
                .filter_map(|(name, value)| {
                    value
                        .to_str()
                        .ok()
                        .map(|value| (name.as_str().to_owned(), value.to_owned()))
                })
                .collect(),
        ),
    };
    let response = state.subscription_service.handle(request).await;
    relay(response)
}

fn relay(response: HttpResponse) -> Response {
    let status = match StatusCode::from_u16(response.status_code) {
        Ok(status) => status,
        Err(e) => return e500(e).into_response(),
    };
    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        builder = builder.header(name, value);
    }
    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|e| e500(e).into_response())
}
