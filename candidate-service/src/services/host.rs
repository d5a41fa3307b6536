use async_trait::async_trait;
use service_core::error::AppError;
use std::env;
use tokio::process::Command;

/// Source of the network-visible identity reported by the health check.
#[async_trait]
pub trait HostIdentity: Send + Sync {
    async fn identity(&self) -> Result<String, AppError>;
}

/// Asks the operating system: `hostname -I` first, then `$HOSTNAME`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemHostIdentity;

#[async_trait]
impl HostIdentity for SystemHostIdentity {
    async fn identity(&self) -> Result<String, AppError> {
        match Command::new("hostname").arg("-I").output().await {
            Ok(output) if output.status.success() => {
                let addresses = String::from_utf8_lossy(&output.stdout).trim().to_string();
                if !addresses.is_empty() {
                    return Ok(addresses);
                }
                tracing::debug!("hostname -I returned no addresses");
            }
            Ok(output) => {
                tracing::debug!(status = ?output.status, "hostname -I exited unsuccessfully");
            }
            Err(e) => {
                tracing::debug!(error = %e, "hostname -I could not be run");
            }
        }

        env::var("HOSTNAME")
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                AppError::InternalError(anyhow::anyhow!("unable to determine host identity"))
            })
    }
}

/// Reports a fixed identity.
#[derive(Debug, Clone)]
pub struct StaticHostIdentity(String);

impl StaticHostIdentity {
    pub fn new(identity: impl Into<String>) -> Self {
        Self(identity.into())
    }
}

#[async_trait]
impl HostIdentity for StaticHostIdentity {
    async fn identity(&self) -> Result<String, AppError> {
        Ok(self.0.clone())
    }
}
