use blog_subscriptions::configuration::{get_configuration, DatabaseSettings};
use blog_subscriptions::domain::{EmailAddress, SubscriberName, SubscriberPhone, SubscriptionPackage, SubscriptionRecord};
use blog_subscriptions::provisioning::{create_subscriptions_table, TableStatus};
use blog_subscriptions::store::{PgSubscriptionStore, SubscriptionStore};
use chrono::{TimeZone, Utc};
use claims::assert_ok;
use sqlx::{Connection, Executor, PgConnection, PgPool, Row};
use uuid::Uuid;

async fn fresh_database() -> PgPool {
    let mut configuration: DatabaseSettings = get_configuration()
        .expect("Failed to read configuration.")
        .database;
    configuration.database_name = Uuid::new_v4().to_string();

    let mut connection = PgConnection::connect_with(&configuration.without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, configuration.database_name).as_str())
        .await
        .expect("Failed to create database.");

    PgPool::connect_with(configuration.with_db())
        .await
        .expect("Failed to connect to Postgres.")
}

fn record(name: &str, package: SubscriptionPackage) -> SubscriptionRecord {
    SubscriptionRecord {
        email: EmailAddress::parse("ursula_le_guin@gmail.com".into()).unwrap(),
        name: SubscriberName::parse(name.into()).unwrap(),
        phone: SubscriberPhone::parse("5551234567".into()).unwrap(),
        package,
        subscription_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
    }
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn creating_the_table_twice_is_not_an_error() {
    let pg_pool = fresh_database().await;

    assert_eq!(
        assert_ok!(create_subscriptions_table(&pg_pool).await),
        TableStatus::Created
    );
    assert_eq!(
        assert_ok!(create_subscriptions_table(&pg_pool).await),
        TableStatus::AlreadyExists
    );
}

#[tokio::test]
#[ignore = "requires a running Postgres"]
async fn put_replaces_the_row_for_the_same_email() {
    let pg_pool = fresh_database().await;
    create_subscriptions_table(&pg_pool).await.unwrap();
    let store = PgSubscriptionStore::new(pg_pool.clone());

    assert_ok!(store.put(&record("Ursula Le Guin", SubscriptionPackage::Premium)).await);
    assert_ok!(store.put(&record("Ursula K. Le Guin", SubscriptionPackage::Basic)).await);

    let rows = sqlx::query("SELECT name, package FROM blog_subscriptions")
        .fetch_all(&pg_pool)
        .await
        .expect("Failed to fetch saved subscriptions.");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get::<String, _>("name"), "Ursula K. Le Guin");
    assert_eq!(rows[0].get::<String, _>("package"), "basic");
}
