//! Envelope and result types exchanged between pipeline stages.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

/// Unsigned transaction envelope (base64 XDR), opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedEnvelope(pub String);

/// Signed transaction envelope (base64 XDR), opaque to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedEnvelope(pub String);

impl UnsignedEnvelope {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SignedEnvelope {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignedEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Escrow release topology; selects the builder route and payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscrowTopology {
    #[default]
    SingleRelease,
    MultiRelease,
}

impl EscrowTopology {
    /// Path segment under `/deployer/`.
    pub fn route(self) -> &'static str {
        match self {
            EscrowTopology::SingleRelease => "single-release",
            EscrowTopology::MultiRelease => "multi-release",
        }
    }
}

impl fmt::Display for EscrowTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

impl FromStr for EscrowTopology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" | "single-release" => Ok(EscrowTopology::SingleRelease),
            "multi" | "multi-release" => Ok(EscrowTopology::MultiRelease),
            other => Err(format!(
                "unknown escrow topology '{other}' (expected 'single' or 'multi')"
            )),
        }
    }
}

/// Outcome of an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionResult {
    pub status: bool,
    pub contract_id: Option<String>,
    pub escrow_data: Option<Value>,
}

impl SubmissionResult {
    /// Build from a response body whose `status` is truthy.
    pub(crate) fn from_body(body: &Value) -> Self {
        Self {
            status: true,
            contract_id: body
                .get("contractId")
                .and_then(Value::as_str)
                .map(str::to_string),
            escrow_data: body.get("escrow").filter(|v| !v.is_null()).cloned(),
        }
    }
}

/// Loose truthiness as used by the submission service's `status` field.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_topology_parsing() {
        assert_eq!("single".parse::<EscrowTopology>(), Ok(EscrowTopology::SingleRelease));
        assert_eq!("Multi-Release".parse::<EscrowTopology>(), Ok(EscrowTopology::MultiRelease));
        assert!("both".parse::<EscrowTopology>().is_err());
        assert_eq!(EscrowTopology::MultiRelease.route(), "multi-release");
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("SUCCESS")));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn test_submission_result_from_body() {
        let body = json!({
            "status": "SUCCESS",
            "contractId": "CABC",
            "escrow": { "title": "t" }
        });
        let result = SubmissionResult::from_body(&body);
        assert!(result.status);
        assert_eq!(result.contract_id.as_deref(), Some("CABC"));
        assert_eq!(result.escrow_data, Some(json!({ "title": "t" })));
    }
}
