use std::collections::HashMap;
use std::future::Future;
use std::sync::{Mutex, PoisonError};

use sqlx::PgPool;

use crate::domain::SubscriptionRecord;

/// Write-or-replace access to the keyed subscription store.
pub trait SubscriptionStore: Send + Sync {
    /// Stores `record` under its email, replacing whatever was there.
    fn put(&self, record: &SubscriptionRecord) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[derive(Clone)]
pub struct PgSubscriptionStore {
    pg_pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pg_pool: PgPool) -> Self {
        Self { pg_pool }
    }
}

impl SubscriptionStore for PgSubscriptionStore {
    #[tracing::instrument(
        name = "Saving subscription in the database",
        skip(self, record),
        fields(subscriber_email = %record.email)
    )]
    async fn put(&self, record: &SubscriptionRecord) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO blog_subscriptions (email, name, phone, package, subscription_date)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (email) DO UPDATE SET
                name = EXCLUDED.name,
                phone = EXCLUDED.phone,
                package = EXCLUDED.package,
                subscription_date = EXCLUDED.subscription_date
            "#,
        )
        .bind(record.email.as_ref())
        .bind(record.name.as_ref())
        .bind(record.phone.as_ref())
        .bind(record.package.as_str())
        .bind(record.subscription_date)
        .execute(&self.pg_pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {e:?}");
            anyhow::anyhow!("Failed to store the subscription for {}. {e}", record.email)
        })?;
        Ok(())
    }
}

/// Process-local store keyed by email. Used by tests and local experiments.
#[derive(Default)]
pub struct InMemorySubscriptionStore {
    records: Mutex<HashMap<String, SubscriptionRecord>>,
}

impl InMemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, email: &str) -> Option<SubscriptionRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(email)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SubscriptionStore for InMemorySubscriptionStore {
    async fn put(&self, record: &SubscriptionRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .map_err(|_| anyhow::anyhow!("The in-memory subscription store is poisoned"))?
            .insert(record.email.as_ref().to_owned(), record.clone());
        Ok(())
    }
}

impl<T: SubscriptionStore> SubscriptionStore for std::sync::Arc<T> {
    fn put(&self, record: &SubscriptionRecord) -> impl Future<Output = anyhow::Result<()>> + Send {
        (**self).put(record)
    }
}
