use std::sync::Arc;

use blog_subscriptions::configuration::{get_configuration, Settings};
use blog_subscriptions::store::InMemorySubscriptionStore;
use blog_subscriptions::startup::Application;
use blog_subscriptions::telemetry::init_subscriber;
use once_cell::sync::Lazy;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    let configuration = get_configuration().expect("Failed to read configuration.");

    if std::env::var("TEST_LOG").is_ok() {
        init_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::stdout,
            &configuration.telemetry,
        );
    } else {
        init_subscriber(
            subscriber_name,
            default_filter_level,
            std::io::sink,
            &configuration.telemetry,
        );
    }
});

pub struct TestApp {
    pub address: String,
    pub store: Arc<InMemorySubscriptionStore>,
    pub email_server: MockServer,
    pub configuration: Settings,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscription(&self, body: impl Into<reqwest::Body>) -> reqwest::Response {
        self.api_client
            .post(format!("{}/api/subscribe", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscription_json(&self, body: &Value) -> reqwest::Response {
        self.post_subscription(body.to_string()).await
    }

    pub async fn preflight(&self) -> reqwest::Response {
        self.api_client
            .request(reqwest::Method::OPTIONS, format!("{}/api/subscribe", &self.address))
            .header("Origin", "https://blog.example.com")
            .header("Access-Control-Request-Method", "POST")
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscribe_form(&self) -> String {
        self.api_client
            .get(&self.address)
            .send()
            .await
            .expect("Failed to execute request.")
            .text()
            .await
            .unwrap()
    }

    /// Every email the mock provider has received, as JSON bodies.
    pub async fn sent_emails(&self) -> Vec<Value> {
        self.email_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|request| serde_json::from_slice(&request.body).unwrap())
            .collect()
    }

    pub async fn accept_emails(&self) {
        Mock::given(path("/v3/smtp/email"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&self.email_server)
            .await;
    }
}

pub fn valid_subscription() -> Value {
    serde_json::json!({
        "name": "Ursula Le Guin",
        "email": "ursula_le_guin@gmail.com",
        "phone": "5551234567",
        "package": "premium",
    })
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = 0;
        c.email.endpoint = email_server.uri();
        c
    };

    let store = Arc::new(InMemorySubscriptionStore::new());
    let email_client = configuration
        .email
        .client()
        .expect("Failed to build the email client.");
    let application = Application::build_with(configuration.clone(), store.clone(), email_client)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());
    tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        store,
        email_server,
        configuration,
        api_client: reqwest::Client::new(),
    }
}
