//! Out-of-band setup: the subscriptions table, sender verification, the
//! function's execution role, packaging and deployment. None of this runs on
//! the request path; the binaries under `src/bin` drive it.

mod deploy;
mod package;
mod role;
mod senders;
mod table;

pub use deploy::*;
pub use package::*;
pub use role::*;
pub use senders::*;
pub use table::*;

use crate::domain::EmailAddress;
use crate::utils::error_chain_fmt;

#[derive(thiserror::Error)]
pub enum ProvisioningError {
    #[error("Failed to create the subscriptions table.")]
    Table(#[source] sqlx::Error),
    #[error("Failed to request verification of sender {0}.")]
    SenderVerification(EmailAddress, #[source] anyhow::Error),
    #[error("Failed to provision execution role {0}.")]
    Role(String, #[source] anyhow::Error),
    #[error("Failed to package the function.")]
    Packaging(#[source] anyhow::Error),
    #[error("Failed to deploy function {0}.")]
    Deployment(String, #[source] anyhow::Error),
}

impl std::fmt::Debug for ProvisioningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}
