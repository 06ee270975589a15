//! Mailbox provisioning client
//!
//! The actual mailbox creation happens in an external gateway; this module
//! only carries the request over HTTP and reports the outcome.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    config::ProvisioningConfig,
    error::{AppError, AppResult},
};

/// Request sent to the provisioning gateway
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionRequest {
    pub application_id: i32,
    /// Requested address (personal or group)
    pub mailbox: String,
    pub display_name: String,
    pub group: bool,
}

/// Successful provisioning result
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionedMailbox {
    /// Address actually assigned; may differ from the requested one
    pub address: String,
}

#[async_trait]
pub trait MailboxProvisioner: Send + Sync {
    async fn provision(&self, request: &ProvisionRequest) -> AppResult<ProvisionedMailbox>;
}

/// HTTP implementation talking to the provisioning gateway
pub struct HttpMailboxProvisioner {
    client: reqwest::Client,
    config: ProvisioningConfig,
}

impl HttpMailboxProvisioner {
    pub fn new(config: ProvisioningConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl MailboxProvisioner for HttpMailboxProvisioner {
    async fn provision(&self, request: &ProvisionRequest) -> AppResult<ProvisionedMailbox> {
        let url = format!("{}/mailboxes", self.config.base_url.trim_end_matches('/'));

        let mut builder = self.client.post(&url).json(request);
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| AppError::Provisioning(format!("Provisioning gateway unreachable: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Provisioning(format!(
                "Provisioning gateway returned {}: {}",
                status, body
            )));
        }

        response
            .json::<ProvisionedMailbox>()
            .await
            .map_err(|e| AppError::Provisioning(format!("Invalid gateway response: {}", e)))
    }
}
