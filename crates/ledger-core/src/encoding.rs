//! # base64url Encoding
//!
//! URL-safe base64 (`-`/`_` alphabet) with padding stripped on encode and
//! tolerated on decode. Signatures and Ed25519 public keys travel in this
//! form: inside proof blocks, in trust maps, and on the CLI surface.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;

use crate::error::EncodingError;

/// Encode bytes to base64url with no padding.
pub fn b64url_encode(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode a base64url string back to bytes.
///
/// Trailing `=` padding is accepted and ignored, so both padded and
/// unpadded forms decode to the same bytes.
///
/// # Errors
///
/// Returns `EncodingError::InvalidBase64` for input outside the URL-safe
/// alphabet.
pub fn b64url_decode(s: &str) -> Result<Vec<u8>, EncodingError> {
    let trimmed = s.trim_end_matches('=');
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| EncodingError::InvalidBase64(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_no_padding() {
        let original = br#"{"hello":"world"}"#;
        let encoded = b64url_encode(original);
        assert!(!encoded.contains('='));
        let decoded = b64url_decode(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn decode_tolerates_padding() {
        // "ab" encodes to "YWI" unpadded, "YWI=" padded.
        assert_eq!(b64url_decode("YWI").unwrap(), b"ab");
        assert_eq!(b64url_decode("YWI=").unwrap(), b"ab");
    }

    #[test]
    fn url_safe_alphabet() {
        // 0xfb 0xff encodes with '-' and '_' in the URL-safe alphabet.
        let encoded = b64url_encode(&[0xfb, 0xef, 0xff]);
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('/'));
        let decoded = b64url_decode(&encoded).unwrap();
        assert_eq!(decoded, vec![0xfb, 0xef, 0xff]);
    }

    #[test]
    fn decode_rejects_standard_alphabet() {
        assert!(b64url_decode("a+b/").is_err());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(b64url_decode("not base64 at all!").is_err());
    }

    #[test]
    fn empty_roundtrip() {
        assert_eq!(b64url_encode(&[]), "");
        assert_eq!(b64url_decode("").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn signature_sized_roundtrip() {
        let sig = [0xa5u8; 64];
        let encoded = b64url_encode(&sig);
        assert_eq!(b64url_decode(&encoded).unwrap(), sig.to_vec());
    }
}
