use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::configuration::{DatabaseSettings, Settings};
use crate::email_client::EmailSender;
use crate::routes::{health_check, subscribe, subscribe_form};
use crate::store::{PgSubscriptionStore, SubscriptionStore};
use crate::subscription::SubscriptionService;
use crate::AppState;

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Wires the Postgres store and the email API client from `configuration`.
    pub async fn build(configuration: Settings) -> anyhow::Result<Self> {
        let store = PgSubscriptionStore::new(get_connection_pool(&configuration.database));
        let email_client = configuration.email.client()?;
        Self::build_with(configuration, store, email_client).await
    }

    pub async fn build_with<S, N>(configuration: Settings, store: S, email_sender: N) -> anyhow::Result<Self>
    where
        S: SubscriptionStore + 'static,
        N: EmailSender + 'static,
    {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address).await?;
        let port = listener.local_addr()?.port();
        tracing::info!("Listening on {}", listener.local_addr()?);

        let subscription_service = SubscriptionService::new(
            store,
            email_sender,
            configuration.email.notifications(),
            configuration.cors(),
        );
        let app_state = AppState {
            subscription_service: Arc::new(subscription_service),
            application_base_url: Arc::new(configuration.application.base_url),
        };

        Ok(Self {
            port,
            listener,
            router: router(app_state),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        axum::serve(self.listener, self.router.into_make_service()).await
    }
}

pub fn router<S, N>(app_state: AppState<S, N>) -> Router
where
    S: SubscriptionStore + 'static,
    N: EmailSender + 'static,
{
    Router::new()
        .route("/", get(subscribe_form::<S, N>))
        .route("/health_check", get(health_check))
        .route(
            "/api/subscribe",
            post(subscribe::<S, N>).options(subscribe::<S, N>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(app_state)
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new()
        .acquire_timeout(Duration::from_secs(2))
        .connect_lazy_with(configuration.with_db())
}
