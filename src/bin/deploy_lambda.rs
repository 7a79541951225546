use std::path::Path;

use blog_subscriptions::configuration::get_configuration;
use blog_subscriptions::provisioning::{deploy_function, ensure_execution_role, package_function};
use blog_subscriptions::telemetry::init_subscriber;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let configuration = get_configuration()?;
    init_subscriber(
        "deploy_lambda".into(),
        "info".into(),
        std::io::stdout,
        &configuration.telemetry,
    );
    let deployment = &configuration.deployment;

    let aws_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(configuration.aws.region.clone()))
        .load()
        .await;
    let iam = aws_sdk_iam::Client::new(&aws_config);
    let lambda = aws_sdk_lambda::Client::new(&aws_config);

    let outcome = async {
        let role = ensure_execution_role(&iam, &deployment.role_name).await?;
        if role.created {
            tracing::info!("New role; function creation will wait for it to propagate");
        }
        let archive = package_function(
            Path::new(&deployment.binary_path),
            &std::env::current_dir()?.join("configuration"),
        )?;
        let outcome = deploy_function(&lambda, deployment, &role.arn, archive).await?;
        tracing::info!(?outcome, function_name = %deployment.function_name, "Function deployed");
        anyhow::Ok(())
    }
    .await;

    match outcome {
        Ok(()) => {
            tracing::info!("Function deployment completed successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error.cause_chain = ?e, "Function deployment failed");
            Err(e)
        }
    }
}
