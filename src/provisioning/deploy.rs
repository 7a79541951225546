use std::future::Future;
use std::time::Duration;

use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::{Environment, FunctionCode, Runtime, VpcConfig};

use crate::configuration::DeploymentSettings;

use super::ProvisioningError;

/// How long to keep retrying while a freshly created role cannot yet be
/// assumed by the function host.
#[derive(Debug, Clone, Copy)]
pub struct RolePropagation {
    pub attempts: u32,
    pub delay: Duration,
}

impl From<&DeploymentSettings> for RolePropagation {
    fn from(settings: &DeploymentSettings) -> Self {
        Self {
            attempts: settings.role_propagation_attempts.max(1),
            delay: Duration::from_millis(settings.role_propagation_delay_millis),
        }
    }
}

pub enum AttemptError {
    /// The role exists but the identity provider has not propagated it yet.
    RoleNotReady(anyhow::Error),
    Fatal(anyhow::Error),
}

/// Runs `operation` until it succeeds, fails fatally, or `propagation.attempts`
/// tries have reported [`AttemptError::RoleNotReady`].
pub async fn retry_while_role_propagates<T, F, Fut>(
    propagation: RolePropagation,
    mut operation: F,
) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AttemptError>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(AttemptError::Fatal(e)) => return Err(e),
            Err(AttemptError::RoleNotReady(e)) if attempt >= propagation.attempts => {
                return Err(e.context(format!(
                    "The execution role was still not assumable after {attempt} attempts"
                )))
            }
            Err(AttemptError::RoleNotReady(e)) => {
                tracing::info!(
                    "Execution role not assumable yet (attempt {attempt} of {}): {e}",
                    propagation.attempts
                );
                tokio::time::sleep(propagation.delay).await;
                attempt += 1;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentOutcome {
    Updated,
    Created,
}

/// Replaces the code of the existing function, or creates the function when
/// the host does not know it yet.
#[tracing::instrument(name = "Deploying the function", skip(lambda, settings, archive), fields(function_name = %settings.function_name))]
pub async fn deploy_function(
    lambda: &aws_sdk_lambda::Client,
    settings: &DeploymentSettings,
    role_arn: &str,
    archive: Vec<u8>,
) -> Result<DeploymentOutcome, ProvisioningError> {
    let deployment_error =
        |e: anyhow::Error| ProvisioningError::Deployment(settings.function_name.clone(), e);

    let updated = lambda
        .update_function_code()
        .function_name(&settings.function_name)
        .zip_file(Blob::new(archive.clone()))
        .send()
        .await;

    match updated {
        Ok(output) => {
            tracing::info!(
                "Function updated: {}",
                output.function_arn().unwrap_or(&settings.function_name)
            );
            Ok(DeploymentOutcome::Updated)
        }
        Err(e) => {
            let e = e.into_service_error();
            if !e.is_resource_not_found_exception() {
                return Err(deployment_error(anyhow::anyhow!("{}", DisplayErrorContext(&e))));
            }
            tracing::info!("Creating new function: {}", settings.function_name);
            let function_arn = retry_while_role_propagates(RolePropagation::from(settings), || {
                create_function(lambda, settings, role_arn, archive.clone())
            })
            .await
            .map_err(deployment_error)?;
            tracing::info!("Function created: {function_arn}");
            Ok(DeploymentOutcome::Created)
        }
    }
}

async fn create_function(
    lambda: &aws_sdk_lambda::Client,
    settings: &DeploymentSettings,
    role_arn: &str,
    archive: Vec<u8>,
) -> Result<String, AttemptError> {
    let output = lambda
        .create_function()
        .function_name(&settings.function_name)
        .runtime(Runtime::Providedal2023)
        .role(role_arn)
        .handler("bootstrap")
        .code(FunctionCode::builder().zip_file(Blob::new(archive)).build())
        .description("Handles blog subscription form submissions")
        .timeout(settings.timeout_seconds)
        .memory_size(settings.memory_size_mb)
        .set_vpc_config(vpc_config(settings))
        .environment(
            Environment::builder()
                .variables("APP_ENVIRONMENT", "production")
                .build(),
        )
        .send()
        .await
        .map_err(|e| {
            let e = e.into_service_error();
            // Lambda reports a role it cannot assume yet as an invalid parameter.
            if e.is_invalid_parameter_value_exception() {
                AttemptError::RoleNotReady(anyhow::anyhow!("{}", DisplayErrorContext(&e)))
            } else {
                AttemptError::Fatal(anyhow::anyhow!("{}", DisplayErrorContext(&e)))
            }
        })?;
    Ok(output
        .function_arn()
        .unwrap_or(&settings.function_name)
        .to_owned())
}

/// VPC attachment is applied when the function is created; code updates leave it alone.
fn vpc_config(settings: &DeploymentSettings) -> Option<VpcConfig> {
    if settings.subnet_ids.is_empty() {
        return None;
    }
    Some(
        VpcConfig::builder()
            .set_subnet_ids(Some(settings.subnet_ids.clone()))
            .set_security_group_ids(Some(settings.security_group_ids.clone()))
            .build(),
    )
}
