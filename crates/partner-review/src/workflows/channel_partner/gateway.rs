use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info};

use super::domain::{DecisionUpdate, PartnerId, PartnerPayload, SectionStatusUpdate};
use crate::config::BackendConfig;

/// Which backend call a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayOperation {
    LoadPartner,
    UpdateSectionStatus,
    UpdateDecision,
}

impl std::fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            GatewayOperation::LoadPartner => "load partner",
            GatewayOperation::UpdateSectionStatus => "update section status",
            GatewayOperation::UpdateDecision => "update decision",
        };
        f.write_str(label)
    }
}

/// Error enumeration for backend calls.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{operation} timed out")]
    Timeout { operation: GatewayOperation },
    #[error("{operation} failed in transport: {source}")]
    Transport {
        operation: GatewayOperation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{operation} returned {status}: {body}")]
    Status {
        operation: GatewayOperation,
        status: u16,
        body: String,
    },
    #[error("partner payload could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("backend client could not be built: {0}")]
    Client(String),
}

impl GatewayError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GatewayError::Timeout { .. })
    }

    fn from_reqwest(operation: GatewayOperation, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            GatewayError::Timeout { operation }
        } else {
            GatewayError::Transport { operation, source }
        }
    }
}

/// The partner backend as seen by the review form.
#[async_trait]
pub trait PartnerGateway: Send + Sync {
    async fn fetch_partner(&self, partner: &PartnerId) -> Result<PartnerPayload, GatewayError>;

    async fn update_section_status(
        &self,
        partner: &PartnerId,
        update: &SectionStatusUpdate,
    ) -> Result<(), GatewayError>;

    async fn update_decision(
        &self,
        partner: &PartnerId,
        update: &DecisionUpdate,
    ) -> Result<(), GatewayError>;
}

/// `reqwest` client for the partner REST API. Every request carries the
/// configured deadline.
pub struct HttpPartnerGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpPartnerGateway {
    pub fn new(config: &BackendConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| GatewayError::Client(err.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn partner_url(&self, partner: &PartnerId, suffix: &str) -> String {
        format!("{}/partners/{}{}", self.base_url, partner, suffix)
    }

    async fn patch<B: Serialize + Sync>(
        &self,
        operation: GatewayOperation,
        url: String,
        body: &B,
    ) -> Result<(), GatewayError> {
        debug!(%url, %operation, "patching partner backend");
        let response = self
            .client
            .patch(&url)
            .json(body)
            .send()
            .await
            .map_err(|err| GatewayError::from_reqwest(operation, err))?;

        check_status(operation, response).await.map(|_| ())
    }
}

async fn check_status(
    operation: GatewayOperation,
    response: reqwest::Response,
) -> Result<reqwest::Response, GatewayError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(GatewayError::Status {
        operation,
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl PartnerGateway for HttpPartnerGateway {
    async fn fetch_partner(&self, partner: &PartnerId) -> Result<PartnerPayload, GatewayError> {
        let operation = GatewayOperation::LoadPartner;
        let url = self.partner_url(partner, "");

        info!(%url, "loading partner application");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| GatewayError::from_reqwest(operation, err))?;
        let response = check_status(operation, response).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::from_reqwest(operation, err))?;
        let payload: PartnerPayload = serde_json::from_slice(&bytes)?;
        info!(documents = payload.documents.len(), "partner application loaded");
        Ok(payload)
    }

    async fn update_section_status(
        &self,
        partner: &PartnerId,
        update: &SectionStatusUpdate,
    ) -> Result<(), GatewayError> {
        let url = self.partner_url(partner, "/section-status");
        self.patch(GatewayOperation::UpdateSectionStatus, url, update)
            .await
    }

    async fn update_decision(
        &self,
        partner: &PartnerId,
        update: &DecisionUpdate,
    ) -> Result<(), GatewayError> {
        let url = self.partner_url(partner, "/decision");
        self.patch(GatewayOperation::UpdateDecision, url, update)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn partner_urls_follow_the_rest_contract() {
        let config = BackendConfig::new("http://localhost:5000/api/", Duration::from_secs(2))
            .expect("valid config");
        let gateway = HttpPartnerGateway::new(&config).expect("client builds");
        let partner = PartnerId::from(5);

        assert_eq!(gateway.base_url(), "http://localhost:5000/api");
        assert_eq!(
            gateway.partner_url(&partner, ""),
            "http://localhost:5000/api/partners/5"
        );
        assert_eq!(
            gateway.partner_url(&partner, "/section-status"),
            "http://localhost:5000/api/partners/5/section-status"
        );
    }

    #[test]
    fn status_errors_name_the_operation() {
        let err = GatewayError::Status {
            operation: GatewayOperation::UpdateDecision,
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "update decision returned 500: boom");
        assert!(!err.is_timeout());
    }
}
