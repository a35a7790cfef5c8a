//! Outbound client for the external evaluation service.

use std::error::Error as _;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::credentials::basic_authorization;
use super::domain::FormSubmission;
use crate::config::EvaluationServiceConfig;

const USER_AGENT_VALUE: &str = concat!("identity-intake/", env!("CARGO_PKG_VERSION"));

/// Status reported when no HTTP response was obtained at all.
pub const NETWORK_FAILURE_STATUS: u16 = 500;

/// Decision payload returned by the evaluation service, kept exactly as received.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub status: u16,
    pub payload: Value,
}

impl EvaluationResult {
    /// `summary.outcome` when the provider supplied it as a string.
    pub fn outcome_code(&self) -> Option<&str> {
        self.payload
            .get("summary")
            .and_then(|summary| summary.get("outcome"))
            .and_then(Value::as_str)
    }
}

/// Failure talking to the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The service answered with a non-2xx status; `body` is its raw diagnostic text.
    #[error("evaluation service returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("unable to reach evaluation service: {message}")]
    Network { message: String },
    #[error("evaluation service returned an unreadable payload: {message}")]
    InvalidPayload { message: String },
}

impl TransportError {
    pub fn status(&self) -> u16 {
        match self {
            TransportError::Upstream { status, .. } => *status,
            TransportError::Network { .. } | TransportError::InvalidPayload { .. } => {
                NETWORK_FAILURE_STATUS
            }
        }
    }

    /// Provider body for upstream failures, transport description otherwise.
    pub fn detail(&self) -> &str {
        match self {
            TransportError::Upstream { body, .. } => body,
            TransportError::Network { message } | TransportError::InvalidPayload { message } => {
                message
            }
        }
    }
}

/// Seam between the orchestrator and whatever performs the evaluation call.
#[async_trait]
pub trait EvaluationGateway: Send + Sync {
    async fn evaluate(
        &self,
        submission: &FormSubmission,
    ) -> Result<EvaluationResult, TransportError>;
}

/// Raised while building the HTTP client at startup.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationClientError {
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
    #[error("credentials cannot be sent as a header: {0}")]
    Header(#[from] InvalidHeaderValue),
}

/// HTTPS client posting submissions with Basic authentication.
#[derive(Debug, Clone)]
pub struct HttpEvaluationClient {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpEvaluationClient {
    pub fn new(config: &EvaluationServiceConfig) -> Result<Self, EvaluationClientError> {
        let mut authorization = HeaderValue::from_str(&basic_authorization(&config.credentials))?;
        authorization.set_sensitive(true);

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        default_headers.insert(AUTHORIZATION, authorization);

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EvaluationGateway for HttpEvaluationClient {
    async fn evaluate(
        &self,
        submission: &FormSubmission,
    ) -> Result<EvaluationResult, TransportError> {
        debug!(endpoint = %self.endpoint, "forwarding submission to evaluation service");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(submission)
            .send()
            .await
            .map_err(|err| TransportError::Network {
                message: describe(&err),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());
            warn!(status = status.as_u16(), "evaluation service rejected submission");
            return Err(TransportError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|err| TransportError::InvalidPayload {
                message: describe(&err),
            })?;

        Ok(EvaluationResult {
            status: status.as_u16(),
            payload,
        })
    }
}

/// reqwest's top-level message omits the cause (e.g. "connection refused"); append the chain.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
