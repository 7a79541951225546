use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use sqlx::ConnectOptions;

use crate::domain::{ApplicationBaseUrl, Mailbox};
use crate::email_client::EmailClient;
use crate::subscription::{CorsSettings, NotificationSettings};

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub email: EmailSettings,
    pub aws: AwsSettings,
    pub deployment: DeploymentSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Base url the subscription form posts to.
    pub base_url: ApplicationBaseUrl,
    pub allowed_origin: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub username: String,
    pub password: Secret<String>,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
    pub database_name: String,
    pub require_ssl: bool,
}

impl DatabaseSettings {
    pub fn without_db(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };
        PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .port(self.port)
            .ssl_mode(ssl_mode)
    }

    pub fn with_db(&self) -> PgConnectOptions {
        self.without_db()
            .database(&self.database_name)
            .log_statements(tracing::log::LevelFilter::Trace)
    }
}

#[derive(Deserialize, Clone)]
pub struct EmailSettings {
    pub endpoint: String,
    pub api_key: Secret<String>,
    pub sender: Mailbox,
    pub admin: Mailbox,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_millis: u64,
}

impl EmailSettings {
    pub fn client(&self) -> anyhow::Result<EmailClient> {
        EmailClient::new(self.clone())
    }

    pub fn notifications(&self) -> NotificationSettings {
        NotificationSettings {
            sender: self.sender.clone(),
            admin: self.admin.clone(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct AwsSettings {
    pub region: String,
}

#[derive(Deserialize, Clone)]
pub struct DeploymentSettings {
    pub function_name: String,
    pub role_name: String,
    /// Path of the compiled function binary packaged as `bootstrap`.
    pub binary_path: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_seconds: i32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub memory_size_mb: i32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub role_propagation_attempts: u32,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub role_propagation_delay_millis: u64,
    /// Subnets the function joins to reach the database. Empty keeps it outside any VPC.
    #[serde(default)]
    pub subnet_ids: Vec<String>,
    #[serde(default)]
    pub security_group_ids: Vec<String>,
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    pub enabled: bool,
    pub json: bool,
    pub endpoint: String,
    pub api_key: Secret<String>,
}

impl Settings {
    pub fn cors(&self) -> CorsSettings {
        CorsSettings {
            allowed_origin: self.application.allowed_origin.clone(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory. {e}")))?;
    let configuration_directory = base_path.join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("application.port", std::env::var("PORT").ok())?
        .set_override_option("application.base_url", std::env::var("API_BASE_URL").ok())?
        .set_override_option("aws.region", std::env::var("AWS_REGION").ok())?
        .set_override_option("email.admin.email", std::env::var("ADMIN_EMAIL").ok())?
        .set_override_option("email.sender.email", std::env::var("FROM_EMAIL").ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
