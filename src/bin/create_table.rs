use blog_subscriptions::configuration::get_configuration;
use blog_subscriptions::provisioning::create_subscriptions_table;
use blog_subscriptions::startup::get_connection_pool;
use blog_subscriptions::telemetry::init_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration()?;
    init_subscriber(
        "create_table".into(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
    );

    let pg_pool = get_connection_pool(&configuration.database);
    if let Err(e) = create_subscriptions_table(&pg_pool).await {
        tracing::error!(error.cause_chain = ?e, "Table setup failed");
        return Err(e.into());
    }
    Ok(())
}
