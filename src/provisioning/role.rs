use aws_sdk_iam::error::DisplayErrorContext;

use super::ProvisioningError;

/// Lets the Lambda service assume the role.
pub const TRUST_POLICY: &str = r#"{
  "Version": "2012-10-17",
  "Statement": [
    {
      "Effect": "Allow",
      "Principal": { "Service": "lambda.amazonaws.com" },
      "Action": "sts:AssumeRole"
    }
  ]
}"#;

/// Logs to CloudWatch and reaches Postgres from inside a VPC.
pub const EXECUTION_POLICIES: [&str; 2] = [
    "arn:aws:iam::aws:policy/service-role/AWSLambdaBasicExecutionRole",
    "arn:aws:iam::aws:policy/service-role/AWSLambdaVPCAccessExecutionRole",
];

#[derive(Debug, Clone)]
pub struct ExecutionRole {
    pub arn: String,
    /// `false` when the role already existed.
    pub created: bool,
}

/// Gets or creates `role_name`. Policies are attached only when the role is
/// created here; an existing role is returned as is.
#[tracing::instrument(name = "Provisioning the execution role", skip(iam))]
pub async fn ensure_execution_role(
    iam: &aws_sdk_iam::Client,
    role_name: &str,
) -> Result<ExecutionRole, ProvisioningError> {
    let role_error = |e: anyhow::Error| ProvisioningError::Role(role_name.to_owned(), e);

    let created = iam
        .create_role()
        .role_name(role_name)
        .assume_role_policy_document(TRUST_POLICY)
        .description("Execution role of the blog subscription handler")
        .send()
        .await;

    match created {
        Ok(output) => {
            let arn = output
                .role()
                .map(|role| role.arn().to_owned())
                .ok_or_else(|| role_error(anyhow::anyhow!("CreateRole returned no role")))?;
            tracing::info!("Execution role created: {arn}");

            for policy_arn in EXECUTION_POLICIES {
                iam.attach_role_policy()
                    .role_name(role_name)
                    .policy_arn(policy_arn)
                    .send()
                    .await
                    .map_err(|e| {
                        role_error(anyhow::anyhow!(
                            "Failed to attach {policy_arn}. {}",
                            DisplayErrorContext(&e)
                        ))
                    })?;
                tracing::info!("Policy {policy_arn} attached to role");
            }
            Ok(ExecutionRole { arn, created: true })
        }
        Err(e) => {
            let e = e.into_service_error();
            if !e.is_entity_already_exists_exception() {
                return Err(role_error(anyhow::anyhow!("{}", DisplayErrorContext(&e))));
            }
            tracing::info!("Role already exists, retrieving it");
            let output = iam
                .get_role()
                .role_name(role_name)
                .send()
                .await
                .map_err(|e| role_error(anyhow::anyhow!("{}", DisplayErrorContext(&e))))?;
            let arn = output
                .role()
                .map(|role| role.arn().to_owned())
                .ok_or_else(|| role_error(anyhow::anyhow!("GetRole returned no role")))?;
            tracing::info!("Retrieved existing role: {arn}");
            Ok(ExecutionRole {
                arn,
                created: false,
            })
        }
    }
}
