use blog_subscriptions::configuration::get_configuration;
use blog_subscriptions::provisioning::verify_senders;
use blog_subscriptions::telemetry::init_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration()?;
    init_subscriber(
        "verify_senders".into(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
    );

    let email_client = configuration.email.client()?;
    let mailboxes = [&configuration.email.admin, &configuration.email.sender];
    if let Err(e) = verify_senders(&email_client, &mailboxes).await {
        tracing::error!(error.cause_chain = ?e, "Sender verification failed");
        return Err(e.into());
    }
    tracing::info!(
        "IMPORTANT: check each inbox and confirm the sender verification requests."
    );
    Ok(())
}
