//! Cryptographic Utilities

use base64::{Engine, engine::general_purpose};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Decode standard base64 (padded)
pub fn from_base64(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(s)
}

/// Encode bytes as URL-safe base64 without padding (token segments)
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Decode URL-safe base64 without padding
pub fn from_base64url(s: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::URL_SAFE_NO_PAD.decode(s)
}

/// Compute HMAC-SHA256 over `data`
///
/// HMAC accepts keys of any length, but an empty key means the caller never
/// loaded one, so it is refused.
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32], hmac::digest::InvalidLength> {
    if key.is_empty() {
        return Err(hmac::digest::InvalidLength);
    }
    let mut mac = HmacSha256::new_from_slice(key)?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().into())
}

/// Verify an HMAC-SHA256 tag in constant time
pub fn hmac_sha256_verify(key: &[u8], data: &[u8], tag: &[u8]) -> bool {
    if key.is_empty() {
        return false;
    }
    let Ok(mut mac) = HmacSha256::new_from_slice(key) else {
        return false;
    };
    mac.update(data);
    mac.verify_slice(tag).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bytes() {
        let bytes = random_bytes(32);
        assert_eq!(bytes.len(), 32);
        assert!(bytes.iter().any(|&b| b != 0));
        assert_ne!(random_bytes(32), bytes);
    }

    #[test]
    fn test_hmac_rfc4231_case_2() {
        // RFC 4231 test case 2
        let tag = hmac_sha256(b"Jefe", b"what do ya want for nothing?").unwrap();
        let expected =
            hex::decode("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843")
                .unwrap();
        assert_eq!(tag.to_vec(), expected);
    }

    #[test]
    fn test_hmac_verify() {
        let key = [42u8; 32];
        let tag = hmac_sha256(&key, b"payload").unwrap();
        assert!(hmac_sha256_verify(&key, b"payload", &tag));
        assert!(!hmac_sha256_verify(&key, b"payload!", &tag));
        assert!(!hmac_sha256_verify(&[7u8; 32], b"payload", &tag));
        assert!(!hmac_sha256_verify(&key, b"payload", &tag[..31]));
    }

    #[test]
    fn test_hmac_refuses_empty_key() {
        assert!(hmac_sha256(&[], b"payload").is_err());
        assert!(!hmac_sha256_verify(&[], b"payload", &[0u8; 32]));
    }

    #[test]
    fn test_base64url_has_no_padding() {
        let encoded = to_base64url(&[0xfb, 0xff]);
        assert_eq!(encoded, "-_8");
        assert_eq!(from_base64url(&encoded).unwrap(), vec![0xfb, 0xff]);
        assert_eq!(from_base64("aGk=").unwrap(), b"hi");
    }
}
