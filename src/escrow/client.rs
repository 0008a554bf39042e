//! HTTP client for the transaction builder and submission service.
//!
//! # Responsibilities
//! - Request unsigned envelopes from `/deployer/{topology}`
//! - Submit signed envelopes to `/helper/send-transaction`
//! - Separate transport failures from malformed or rejected responses
//!
//! Every call is single-shot: the builder may mint a new transaction per
//! call, so nothing here retries.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::{json, Value};

use crate::error::{PipelineError, PipelineResult};
use crate::escrow::payload::EscrowParameters;
use crate::escrow::types::{is_truthy, EscrowTopology, SignedEnvelope, SubmissionResult, UnsignedEnvelope};

const UNSIGNED_FIELD: &str = "unsignedTransaction";
const SEND_TRANSACTION_PATH: &str = "/helper/send-transaction";

/// Bearer-authenticated client bound to one base URL.
#[derive(Clone)]
pub struct EscrowClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl EscrowClient {
    /// Client for `base_url`; a trailing `/` is dropped.
    pub fn new(http: reqwest::Client, base_url: &str, bearer_token: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        }
    }

    /// Base URL every endpoint is joined to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn headers(&self, endpoint: &str) -> PipelineResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.bearer_token)).map_err(|_| {
            PipelineError::RequestTransport {
                endpoint: endpoint.to_string(),
                message: "bearer token contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// POST `body` to `endpoint`, returning the raw response text of a 2xx reply.
    async fn post(&self, endpoint: &str, body: &Value) -> PipelineResult<String> {
        let transport = |e: reqwest::Error| PipelineError::RequestTransport {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        };

        let res = self
            .http
            .post(endpoint)
            .headers(self.headers(endpoint)?)
            .json(body)
            .send()
            .await
            .map_err(transport)?;

        let status = res.status();
        let text = res.text().await.map_err(transport)?;

        if !status.is_success() {
            tracing::warn!(endpoint = %endpoint, status = %status, "Remote call returned error status");
            let message = if text.trim().is_empty() {
                format!("HTTP status {}", status)
            } else {
                format!("HTTP status {}: {}", status, text.trim())
            };
            return Err(PipelineError::RequestTransport {
                endpoint: endpoint.to_string(),
                message,
            });
        }

        Ok(text)
    }

    /// Ask the builder for an unsigned envelope.
    pub async fn request_unsigned(
        &self,
        topology: EscrowTopology,
        signer: &str,
        params: &EscrowParameters,
    ) -> PipelineResult<UnsignedEnvelope> {
        let endpoint = format!("{}/deployer/{}", self.base_url, topology.route());
        tracing::info!(endpoint = %endpoint, "Requesting unsigned transaction");

        let text = self.post(&endpoint, &params.to_payload(topology, signer)).await?;

        let unsigned = serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| {
                body.get(UNSIGNED_FIELD)
                    .and_then(Value::as_str)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
            })
            .ok_or_else(|| PipelineError::MalformedResponse {
                endpoint: endpoint.clone(),
                field: UNSIGNED_FIELD,
            })?;

        tracing::info!("Unsigned transaction received");
        Ok(UnsignedEnvelope(unsigned))
    }

    /// Submit a signed envelope and interpret the service's verdict.
    pub async fn submit(&self, signed: &SignedEnvelope) -> PipelineResult<SubmissionResult> {
        let endpoint = format!("{}{}", self.base_url, SEND_TRANSACTION_PATH);
        tracing::info!(endpoint = %endpoint, "Submitting signed transaction");

        let text = self
            .post(&endpoint, &json!({ "signedXdr": signed.as_str() }))
            .await?;

        let accepted = serde_json::from_str::<Value>(&text)
            .ok()
            .filter(|body| body.get("status").map(is_truthy).unwrap_or(false));

        match accepted {
            Some(body) => {
                let result = SubmissionResult::from_body(&body);
                tracing::info!(contract_id = ?result.contract_id, "Transaction submitted");
                Ok(result)
            }
            None => Err(PipelineError::SubmissionRejected { body: text }),
        }
    }
}

impl std::fmt::Debug for EscrowClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EscrowClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
