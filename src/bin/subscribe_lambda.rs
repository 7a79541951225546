use blog_subscriptions::configuration::get_configuration;
use blog_subscriptions::email_client::EmailClient;
use blog_subscriptions::startup::get_connection_pool;
use blog_subscriptions::store::PgSubscriptionStore;
use blog_subscriptions::subscription::{HttpRequest, HttpResponse, SubscriptionService};
use blog_subscriptions::telemetry::init_subscriber;
use lambda_runtime::{service_fn, Error, LambdaEvent};

type Service = SubscriptionService<PgSubscriptionStore, EmailClient>;

async fn handle_request(service: &Service, event: LambdaEvent<HttpRequest>) -> Result<HttpResponse, Error> {
    tracing::info!(request_id = %event.context.request_id, "Invocation received");
    Ok(service.handle(event.payload).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let configuration = get_configuration()?;
    init_subscriber(
        "subscribe_lambda".into(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
    );

    let service = SubscriptionService::new(
        PgSubscriptionStore::new(get_connection_pool(&configuration.database)),
        configuration.email.client()?,
        configuration.email.notifications(),
        configuration.cors(),
    );
    let service = &service;

    lambda_runtime::run(service_fn(move |event| handle_request(service, event))).await
}
