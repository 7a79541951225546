use sqlx::PgPool;

use super::ProvisioningError;

const DUPLICATE_TABLE: &str = "42P07";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Created,
    AlreadyExists,
}

/// Creates `blog_subscriptions` keyed by email. An existing table counts as success.
#[tracing::instrument(name = "Creating the subscriptions table", skip(pg_pool))]
pub async fn create_subscriptions_table(pg_pool: &PgPool) -> Result<TableStatus, ProvisioningError> {
    let outcome = sqlx::query(
        r#"
        CREATE TABLE blog_subscriptions (
            email TEXT NOT NULL PRIMARY KEY,
            name TEXT NOT NULL,
            phone TEXT NOT NULL,
            package TEXT NOT NULL,
            subscription_date TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pg_pool)
    .await;

    match outcome {
        Ok(_) => {
            tracing::info!("Subscriptions table created");
            Ok(TableStatus::Created)
        }
        Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(DUPLICATE_TABLE) => {
            tracing::info!("Subscriptions table already exists");
            Ok(TableStatus::AlreadyExists)
        }
        Err(e) => {
            tracing::error!("Failed to create the subscriptions table: {e:?}");
            Err(ProvisioningError::Table(e))
        }
    }
}
