//! Escrow deploy payloads sent to the transaction builder.

use serde::Serialize;

use crate::escrow::types::EscrowTopology;

/// Default trustline asset contract (USDC on testnet).
pub const DEFAULT_TRUSTLINE_ADDRESS: &str = "CBIELTK6YBZJU5UP2WWQEUCYKLPU6AUNZ2BQ4WWFEIE3USCIHMXQDAMA";
pub const DEFAULT_TRUSTLINE_DECIMALS: u64 = 10_000_000;

/// User-facing escrow parameters, independent of topology.
#[derive(Debug, Clone, PartialEq)]
pub struct EscrowParameters {
    pub engagement_id: String,
    pub title: String,
    pub description: String,
    pub amount: f64,
    pub platform_fee: f64,
    pub milestones: Vec<String>,
    pub trustline_address: String,
    pub trustline_decimals: u64,
    pub receiver_memo: u64,
    /// Receiver role; defaults to the signer.
    pub receiver: Option<String>,
}

impl Default for EscrowParameters {
    fn default() -> Self {
        Self {
            engagement_id: "Engagement from SingleRelease".to_string(),
            title: "SingleRelease Escrow".to_string(),
            description: "Made with escrow-cli".to_string(),
            amount: 10.0,
            platform_fee: 1.0,
            milestones: vec!["Milestone1".to_string()],
            trustline_address: DEFAULT_TRUSTLINE_ADDRESS.to_string(),
            trustline_decimals: DEFAULT_TRUSTLINE_DECIMALS,
            receiver_memo: 3_356_202,
            receiver: None,
        }
    }
}

impl EscrowParameters {
    /// Defaults labelled for the given topology.
    pub fn defaults_for(topology: EscrowTopology) -> Self {
        match topology {
            EscrowTopology::SingleRelease => Self::default(),
            EscrowTopology::MultiRelease => Self {
                engagement_id: "Engagement from MultiRelease".to_string(),
                title: "MultiRelease Escrow".to_string(),
                ..Self::default()
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Roles<'a> {
    approver: &'a str,
    service_provider: &'a str,
    platform_address: &'a str,
    release_signer: &'a str,
    dispute_resolver: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    receiver: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct Trustline<'a> {
    address: &'a str,
    decimals: u64,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Milestone<'a> {
    Single {
        description: &'a str,
    },
    Multi {
        description: &'a str,
        amount: f64,
        receiver: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeployPayload<'a> {
    signer: &'a str,
    engagement_id: &'a str,
    title: &'a str,
    description: &'a str,
    roles: Roles<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<f64>,
    platform_fee: f64,
    milestones: Vec<Milestone<'a>>,
    trustline: Trustline<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    receiver_memo: Option<u64>,
}

impl EscrowParameters {
    /// Render the JSON body for `POST /deployer/{topology}`.
    ///
    /// Every role is held by `signer` except the receiver, which may be
    /// overridden. Multi-release splits `amount` evenly across milestones.
    pub fn to_payload(&self, topology: EscrowTopology, signer: &str) -> serde_json::Value {
        let receiver = self.receiver.as_deref().unwrap_or(signer);

        let (amount, milestones, receiver_role, receiver_memo): (
            Option<f64>,
            Vec<Milestone<'_>>,
            Option<&str>,
            Option<u64>,
        ) = match topology {
            EscrowTopology::SingleRelease => (
                Some(self.amount),
                self.milestones
                    .iter()
                    .map(|description| Milestone::Single { description })
                    .collect(),
                Some(receiver),
                Some(self.receiver_memo),
            ),
            EscrowTopology::MultiRelease => {
                let share = self.amount / self.milestones.len().max(1) as f64;
                (
                    None,
                    self.milestones
                        .iter()
                        .map(|description| Milestone::Multi {
                            description,
                            amount: share,
                            receiver,
                        })
                        .collect(),
                    None,
                    None,
                )
            }
        };

        let payload = DeployPayload {
            signer,
            engagement_id: &self.engagement_id,
            title: &self.title,
            description: &self.description,
            roles: Roles {
                approver: signer,
                service_provider: signer,
                platform_address: signer,
                release_signer: signer,
                dispute_resolver: signer,
                receiver: receiver_role,
            },
            amount,
            platform_fee: self.platform_fee,
            milestones,
            trustline: Trustline {
                address: &self.trustline_address,
                decimals: self.trustline_decimals,
            },
            receiver_memo,
        };

        // Serializing plain structs with string keys cannot fail.
        serde_json::to_value(payload).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SIGNER: &str = "GB6MP3L6UGIDY6O6MXNLSKHLXT2T2TCMPZIZGUTOGYKOLHW7EORWMFCK";

    #[test]
    fn test_single_release_shape() {
        let payload = EscrowParameters::default().to_payload(EscrowTopology::SingleRelease, SIGNER);

        assert_eq!(payload["signer"], SIGNER);
        assert_eq!(payload["roles"]["receiver"], SIGNER);
        assert_eq!(payload["roles"]["serviceProvider"], SIGNER);
        assert_eq!(payload["amount"], json!(10.0));
        assert_eq!(payload["milestones"], json!([{ "description": "Milestone1" }]));
        assert_eq!(payload["trustline"]["decimals"], 10_000_000);
        assert_eq!(payload["receiverMemo"], 3_356_202);
    }

    #[test]
    fn test_multi_release_shape() {
        let params = EscrowParameters {
            amount: 30.0,
            milestones: vec!["a".into(), "b".into(), "c".into()],
            receiver: Some("GRECEIVER".into()),
            ..Default::default()
        };
        let payload = params.to_payload(EscrowTopology::MultiRelease, SIGNER);

        assert!(payload.get("amount").is_none());
        assert!(payload.get("receiverMemo").is_none());
        assert!(payload["roles"].get("receiver").is_none());
        assert_eq!(payload["roles"]["approver"], SIGNER);
        let milestones = payload["milestones"].as_array().unwrap();
        assert_eq!(milestones.len(), 3);
        assert_eq!(milestones[1]["amount"], json!(10.0));
        assert_eq!(milestones[1]["receiver"], "GRECEIVER");
    }

    #[test]
    fn test_topology_defaults() {
        let multi = EscrowParameters::defaults_for(EscrowTopology::MultiRelease);
        assert_eq!(multi.title, "MultiRelease Escrow");
        assert_eq!(multi.amount, EscrowParameters::default().amount);
        assert_eq!(
            EscrowParameters::defaults_for(EscrowTopology::SingleRelease),
            EscrowParameters::default()
        );
    }
}
