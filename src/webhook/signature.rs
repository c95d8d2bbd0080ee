use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("missing X-Hub-Signature-256 header")]
    Missing,
    #[error("malformed signature header")]
    Malformed,
    #[error("signature mismatch")]
    Mismatch,
}

/// Check a `sha256=<hex>` header against the HMAC of the raw body.
pub fn verify_signature(
    app_secret: &str,
    body: &[u8],
    header: Option<&str>,
) -> Result<(), SignatureError> {
    let header = header.ok_or(SignatureError::Missing)?;
    let hex_sig = header
        .strip_prefix("sha256=")
        .ok_or(SignatureError::Malformed)?;
    let expected = hex::decode(hex_sig).map_err(|_| SignatureError::Malformed)?;

    let mut mac =
        HmacSha256::new_from_slice(app_secret.as_bytes()).map_err(|_| SignatureError::Malformed)?;
    mac.update(body);
    mac.verify_slice(&expected)
        .map_err(|_| SignatureError::Mismatch)
}

/// `sha256=<hex>` for `body`, as the platform would send it.
#[cfg(test)]
pub fn sign(app_secret: &str, body: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(app_secret.as_bytes()).expect("any key length");
    mac.update(body);
    format!("sha256={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_signature() {
        let body = br#"{"object":"page"}"#;
        let header = sign("s3cret", body);
        assert_eq!(verify_signature("s3cret", body, Some(&header)), Ok(()));
    }

    #[test]
    fn test_tampered_body_fails() {
        let header = sign("s3cret", b"original");
        assert_eq!(
            verify_signature("s3cret", b"tampered", Some(&header)),
            Err(SignatureError::Mismatch)
        );
    }

    #[test]
    fn test_missing_and_malformed() {
        assert_eq!(verify_signature("s", b"x", None), Err(SignatureError::Missing));
        assert_eq!(
            verify_signature("s", b"x", Some("sha1=abcd")),
            Err(SignatureError::Malformed)
        );
        assert_eq!(
            verify_signature("s", b"x", Some("sha256=zz")),
            Err(SignatureError::Malformed)
        );
    }
}
