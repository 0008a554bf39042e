//! Input validation.
//!
//! # Responsibilities
//! - Check endpoint URLs carry an http(s) scheme
//! - Check key material shape (`G`/`S` prefix + 55 uppercase base32-like chars)
//!
//! Runs before any network call. Keys are never cryptographically checked here.

use crate::error::{KeyKind, PipelineError, PipelineResult};

const KEY_BODY_LEN: usize = 55;

/// Require an `http://` or `https://` scheme.
pub fn validate_url(url: &str) -> PipelineResult<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(PipelineError::InvalidUrlFormat {
            url: url.to_string(),
        })
    }
}

/// Require a `G` key of the expected shape.
pub fn validate_public_key(key: &str) -> PipelineResult<()> {
    validate_key(key, KeyKind::Public)
}

/// Require an `S` key of the expected shape.
pub fn validate_private_key(key: &str) -> PipelineResult<()> {
    validate_key(key, KeyKind::Private)
}

fn validate_key(key: &str, kind: KeyKind) -> PipelineResult<()> {
    let well_formed = key
        .strip_prefix(kind.prefix())
        .map(|body| {
            body.len() == KEY_BODY_LEN
                && body
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
        })
        .unwrap_or(false);

    if well_formed {
        Ok(())
    } else {
        Err(PipelineError::InvalidKeyFormat { kind })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(len: usize) -> String {
        "A".repeat(len)
    }

    #[test]
    fn test_url_scheme() {
        assert!(validate_url("http://x").is_ok());
        assert!(validate_url("https://x").is_ok());
        assert!(validate_url("ftp://x").is_err());
        assert!(validate_url("x").is_err());
        assert!(validate_url("HTTP://x").is_err());
    }

    #[test]
    fn test_public_key_shape() {
        assert!(validate_public_key(&format!("G{}", body(55))).is_ok());
        assert!(validate_public_key("GB6MP3L6UGIDY6O6MXNLSKHLXT2T2TCMPZIZGUTOGYKOLHW7EORWMFCK").is_ok());
        assert!(validate_public_key(&format!("G{}", body(54))).is_err());
        assert!(validate_public_key(&format!("G{}", body(56))).is_err());
        assert!(validate_public_key(&format!("G{}", "a".repeat(55))).is_err());
        assert!(validate_public_key(&format!("S{}", body(55))).is_err());
        assert!(validate_public_key("").is_err());
    }

    #[test]
    fn test_private_key_shape() {
        assert!(validate_private_key(&format!("S{}", "7".repeat(55))).is_ok());
        assert!(validate_private_key(&format!("S{}", body(54))).is_err());
        assert!(validate_private_key(&format!("S{}", body(56))).is_err());
        assert!(validate_private_key(&format!("s{}", body(55))).is_err());
        assert!(validate_private_key(&format!("G{}", body(55))).is_err());
        // Non-ASCII body with a 55-byte length.
        assert!(validate_private_key(&format!("S{}É", body(53))).is_err());
    }

    #[test]
    fn test_error_kind() {
        let err = validate_private_key("nope").unwrap_err();
        assert!(matches!(
            err,
            PipelineError::InvalidKeyFormat { kind: KeyKind::Private }
        ));
    }
}
