use blog_subscriptions::configuration::get_configuration;
use blog_subscriptions::startup::Application;
use blog_subscriptions::telemetry::init_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration().expect("Failed to read configuration.");
    init_subscriber(
        "blog_subscriptions".into(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
    );

    let application = Application::build(configuration).await?;
    application.run_until_stopped().await?;
    Ok(())
}
