//! Local transaction signing.
//!
//! # Security
//! - Secret keys are passed in per call and never stored or logged
//! - Signing is purely local; nothing here touches the network

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signer as _, SigningKey};
use sha2::{Digest, Sha256};
use stellar_xdr::curr::{
    DecoratedSignature, Hash, Limits, ReadXdr, Signature, SignatureHint, TransactionEnvelope,
    TransactionSignaturePayload, TransactionSignaturePayloadTaggedTransaction, VecM, WriteXdr,
};

use crate::error::SigningError;
use crate::escrow::types::{SignedEnvelope, UnsignedEnvelope};

/// Produces a signed envelope from an unsigned one.
pub trait Signer {
    fn sign(
        &self,
        envelope: &UnsignedEnvelope,
        private_key: &str,
        network_passphrase: &str,
    ) -> Result<SignedEnvelope, SigningError>;
}

/// Network id: SHA-256 of the network passphrase.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// Ed25519 signer for Stellar transaction envelopes.
#[derive(Debug, Clone, Copy, Default)]
pub struct StellarSigner;

impl StellarSigner {
    pub fn new() -> Self {
        Self
    }

    fn signing_key(private_key: &str) -> Result<SigningKey, SigningError> {
        let seed = stellar_strkey::ed25519::PrivateKey::from_string(private_key.trim())
            .map_err(|_| SigningError::InvalidKey)?;
        Ok(SigningKey::from_bytes(&seed.0))
    }
}

/// Hash the envelope's transaction the way the ledger verifies it.
fn signature_base(envelope: &TransactionEnvelope, network_passphrase: &str) -> Result<[u8; 32], SigningError> {
    let tagged_transaction = match envelope {
        TransactionEnvelope::Tx(env) => TransactionSignaturePayloadTaggedTransaction::Tx(env.tx.clone()),
        TransactionEnvelope::TxFeeBump(env) => {
            TransactionSignaturePayloadTaggedTransaction::TxFeeBump(env.tx.clone())
        }
        TransactionEnvelope::TxV0(_) => return Err(SigningError::UnsupportedEnvelope),
    };
    let payload = TransactionSignaturePayload {
        network_id: Hash(network_id(network_passphrase)),
        tagged_transaction,
    };
    let bytes = payload
        .to_xdr(Limits::none())
        .map_err(|e| SigningError::Envelope(e.to_string()))?;
    Ok(Sha256::digest(&bytes).into())
}

fn append_signature(
    signatures: &VecM<DecoratedSignature, 20>,
    signature: DecoratedSignature,
) -> Result<VecM<DecoratedSignature, 20>, SigningError> {
    let mut all = signatures.to_vec();
    all.push(signature);
    all.try_into().map_err(|_| SigningError::TooManySignatures)
}

impl Signer for StellarSigner {
    fn sign(
        &self,
        envelope: &UnsignedEnvelope,
        private_key: &str,
        network_passphrase: &str,
    ) -> Result<SignedEnvelope, SigningError> {
        let raw = STANDARD
            .decode(envelope.as_str().trim())
            .map_err(|e| SigningError::Encoding(e.to_string()))?;
        let mut tx_envelope = TransactionEnvelope::from_xdr(&raw, Limits::none())
            .map_err(|e| SigningError::Envelope(e.to_string()))?;

        let signing_key = Self::signing_key(private_key)?;
        let hash = signature_base(&tx_envelope, network_passphrase)?;
        let signature = signing_key.sign(&hash);

        let public = signing_key.verifying_key().to_bytes();
        let mut hint = [0u8; 4];
        hint.copy_from_slice(&public[28..]);
        let decorated = DecoratedSignature {
            hint: SignatureHint(hint),
            signature: Signature(
                signature
                    .to_bytes()
                    .to_vec()
                    .try_into()
                    .map_err(|_| SigningError::Envelope("signature length".to_string()))?,
            ),
        };

        match &mut tx_envelope {
            TransactionEnvelope::Tx(env) => env.signatures = append_signature(&env.signatures, decorated)?,
            TransactionEnvelope::TxFeeBump(env) => {
                env.signatures = append_signature(&env.signatures, decorated)?
            }
            TransactionEnvelope::TxV0(_) => return Err(SigningError::UnsupportedEnvelope),
        }

        let encoded = tx_envelope
            .to_xdr(Limits::none())
            .map_err(|e| SigningError::Envelope(e.to_string()))?;

        tracing::debug!(hint = ?hint, "Transaction signed");
        Ok(SignedEnvelope(STANDARD.encode(encoded)))
    }
}
