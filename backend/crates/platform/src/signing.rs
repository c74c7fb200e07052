//! Signed Tokens
//!
//! URL-safe, tamper-evident strings carrying a JSON value.
//!
//! ```text
//! token   = payload "." signature
//! payload = ["."] base64url(json | zlib(json))
//! sig     = base64url(hmac_sha1(key, payload))
//! ```
//!
//! A leading `.` on the payload marks a zlib-compressed body. The marker is
//! part of the signed value, so a forged marker cannot trigger
//! decompression of attacker-controlled bytes. Compression is only used
//! when it actually makes the payload shorter.
//!
//! All base64 is unpadded, so a token only ever contains the 64 URL-safe
//! base64 characters plus `.`.
//!
//! ## Examples
//! ```rust
//! use platform::signing::Signer;
//!
//! let signer = Signer::new(b"secret".to_vec());
//! let token = signer.dumps(&vec![1, 2, 3], false).unwrap();
//! let back: Vec<i32> = signer.loads(&token).unwrap();
//! assert_eq!(back, vec![1, 2, 3]);
//! ```

use std::fmt;
use std::io::{Read, Write};

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::crypto::{constant_time_eq, from_base64url, hmac_sha1, to_base64url};

/// Separates the payload from its signature
pub const SEPARATOR: char = '.';

/// Prefix of a compressed payload
pub const COMPRESSED_MARKER: char = '.';

/// Upper bound on a decompressed payload
const MAX_DECOMPRESSED_LEN: u64 = 1024 * 1024;

/// A token failed verification or could not be decoded
///
/// Every variant means "do not trust this token"; callers treat them all
/// as an authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// No separator at all
    #[error("Missing signature (no '.' found in value)")]
    MissingSeparator,

    /// Recomputed digest differs from the one in the token
    #[error("Signature failed: {0}")]
    Mismatch(String),

    /// Signature was valid but the payload is not decodable
    #[error("Malformed payload: {0}")]
    Malformed(String),
}

// ============================================================================
// Free functions (explicit key)
// ============================================================================

/// Base64url HMAC-SHA1 of `value` under `key`
pub fn signature(value: &str, key: &[u8]) -> String {
    to_base64url(&hmac_sha1(key, value.as_bytes()))
}

/// Append `.` and the signature to `value`
pub fn sign(value: &str, key: &[u8]) -> String {
    format!("{}{}{}", value, SEPARATOR, signature(value, key))
}

/// Verify a signed value and return the part before the last `.`
pub fn unsign<'a>(signed_value: &'a str, key: &[u8]) -> Result<&'a str, SignatureError> {
    let (value, sig) = split_signed(signed_value)?;
    verify_with(value, sig, key)?;
    Ok(value)
}

/// Serialize `value` to JSON, optionally compress it, and sign the result
pub fn dumps<T>(value: &T, key: &[u8], compress: bool) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let payload = encode_payload(value, compress)?;
    Ok(sign(&payload, key))
}

/// Reverse of [`dumps`]
pub fn loads<T: DeserializeOwned>(token: &str, key: &[u8]) -> Result<T, SignatureError> {
    decode_payload(unsign(token, key)?)
}

// ============================================================================
// Signer
// ============================================================================

/// Reusable signing configuration
///
/// * `key` - current secret, used for every new signature
/// * `previous_key` - retired secret still accepted on verification, so
///   rotating the key does not log everyone out at once
/// * `salt` - appended to the key to separate token purposes (a session
///   token must not verify as a CSRF token)
#[derive(Clone)]
pub struct Signer {
    key: Vec<u8>,
    previous_key: Option<Vec<u8>>,
    salt: Vec<u8>,
}

impl Signer {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            previous_key: None,
            salt: Vec::new(),
        }
    }

    /// Accept tokens signed with a retired key
    pub fn with_previous_key(mut self, previous_key: Option<Vec<u8>>) -> Self {
        self.previous_key = previous_key;
        self
    }

    /// Namespace signatures by purpose
    pub fn with_salt(mut self, salt: impl AsRef<[u8]>) -> Self {
        self.salt = salt.as_ref().to_vec();
        self
    }

    fn salted(&self, key: &[u8]) -> Vec<u8> {
        let mut salted = Vec::with_capacity(key.len() + self.salt.len());
        salted.extend_from_slice(key);
        salted.extend_from_slice(&self.salt);
        salted
    }

    pub fn signature(&self, value: &str) -> String {
        signature(value, &self.salted(&self.key))
    }

    pub fn sign(&self, value: &str) -> String {
        sign(value, &self.salted(&self.key))
    }

    pub fn unsign<'a>(&self, signed_value: &'a str) -> Result<&'a str, SignatureError> {
        let (value, sig) = split_signed(signed_value)?;

        match verify_with(value, sig, &self.salted(&self.key)) {
            Ok(()) => Ok(value),
            Err(err) => match &self.previous_key {
                Some(previous) => {
                    verify_with(value, sig, &self.salted(previous)).map_err(|_| err)?;
                    Ok(value)
                }
                None => Err(err),
            },
        }
    }

    pub fn dumps<T>(&self, value: &T, compress: bool) -> Result<String, serde_json::Error>
    where
        T: Serialize + ?Sized,
    {
        let payload = encode_payload(value, compress)?;
        Ok(self.sign(&payload))
    }

    pub fn loads<T: DeserializeOwned>(&self, token: &str) -> Result<T, SignatureError> {
        decode_payload(self.unsign(token)?)
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("key", &"[REDACTED]")
            .field("previous_key", &self.previous_key.as_ref().map(|_| "[REDACTED]"))
            .field("salt", &String::from_utf8_lossy(&self.salt))
            .finish()
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn split_signed(signed_value: &str) -> Result<(&str, &str), SignatureError> {
    signed_value
        .rsplit_once(SEPARATOR)
        .ok_or(SignatureError::MissingSeparator)
}

fn verify_with(value: &str, sig: &str, key: &[u8]) -> Result<(), SignatureError> {
    let expected = signature(value, key);
    if constant_time_eq(expected.as_bytes(), sig.as_bytes()) {
        Ok(())
    } else {
        Err(SignatureError::Mismatch(sig.to_string()))
    }
}

fn encode_payload<T>(value: &T, compress: bool) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec(value)?;

    if compress {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&json).map_err(serde_json::Error::io)?;
        let compressed = encoder.finish().map_err(serde_json::Error::io)?;

        // The marker costs one character, so compression must save more than that.
        if compressed.len() < json.len().saturating_sub(1) {
            return Ok(format!("{}{}", COMPRESSED_MARKER, to_base64url(&compressed)));
        }
    }

    Ok(to_base64url(&json))
}

fn decode_payload<T: DeserializeOwned>(payload: &str) -> Result<T, SignatureError> {
    let (encoded, compressed) = match payload.strip_prefix(COMPRESSED_MARKER) {
        Some(rest) => (rest, true),
        None => (payload, false),
    };

    let bytes =
        from_base64url(encoded).map_err(|e| SignatureError::Malformed(e.to_string()))?;

    let json = if compressed {
        let mut out = Vec::new();
        ZlibDecoder::new(bytes.as_slice())
            .take(MAX_DECOMPRESSED_LEN + 1)
            .read_to_end(&mut out)
            .map_err(|e| SignatureError::Malformed(e.to_string()))?;
        if out.len() as u64 > MAX_DECOMPRESSED_LEN {
            return Err(SignatureError::Malformed("payload too large".to_string()));
        }
        out
    } else {
        bytes
    };

    serde_json::from_slice(&json).map_err(|e| SignatureError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    const KEY: &[u8] = b"$geoon8_ymg-k)!9wl3wloq4&30w";

    /// Every single-character substitution of `token`
    fn mutations(token: &str) -> Vec<String> {
        let chars: Vec<char> = token.chars().collect();
        let mut out = Vec::new();
        for i in 0..chars.len() {
            for replacement in ['A', 'b', '.', '-'] {
                if chars[i] == replacement {
                    continue;
                }
                let mut mutated = chars.clone();
                mutated[i] = replacement;
                out.push(mutated.into_iter().collect());
            }
        }
        out
    }

    #[test]
    fn test_signature_matches_hmac() {
        let expected = to_base64url(&hmac_sha1(b"this-is-the-key", b"hello"));
        assert_eq!(signature("hello", b"this-is-the-key"), expected);
        assert!(!expected.contains('='));
    }

    #[test]
    fn test_sign_format() {
        let s = "This is a string";
        assert_eq!(sign(s, b"sekrit"), format!("{}.{}", s, signature(s, b"sekrit")));
    }

    #[test]
    fn test_sign_unsign_roundtrip() {
        for value in [
            "q;wjmbk;wkmb",
            "3098247529087",
            "3098247:529:087:",
            "jkw osanteuh ,rcuh nthu aou oauh ,ud du",
            "\u{2019}",
            "has.dots.inside",
            "",
        ] {
            let signed = sign(value, KEY);
            assert_ne!(signed, value);
            assert_eq!(unsign(&signed, KEY).unwrap(), value);
        }
    }

    #[test]
    fn test_unsign_missing_separator() {
        assert_eq!(
            unsign("nodotshere", KEY),
            Err(SignatureError::MissingSeparator)
        );
        assert_eq!(unsign("", KEY), Err(SignatureError::MissingSeparator));
    }

    #[test]
    fn test_unsign_wrong_key() {
        let signed = sign("value", KEY);
        assert!(matches!(
            unsign(&signed, b"other"),
            Err(SignatureError::Mismatch(_))
        ));
    }

    #[test]
    fn test_unsign_detects_every_single_char_mutation() {
        let signed = sign("Another string", KEY);
        for mutated in mutations(&signed) {
            assert!(unsign(&mutated, KEY).is_err(), "accepted {mutated}");
        }
    }

    #[test]
    fn test_unsign_detects_transforms() {
        let signed = sign("Another string", KEY);
        let transforms: Vec<String> = vec![
            signed.to_uppercase(),
            format!("{signed}a"),
            format!("a{}", &signed[1..]),
            signed.replace('.', ""),
        ];
        for transformed in transforms {
            assert!(unsign(&transformed, KEY).is_err());
        }
    }

    #[test]
    fn test_dumps_loads_roundtrip() {
        let values = [
            json!(["a", "list"]),
            json!("a string"),
            json!("a unicode string \u{2019}"),
            json!({"a": "dictionary"}),
            json!(null),
            json!(42),
            json!({"nested": {"list": [1, 2, 3], "flag": true}}),
        ];
        for value in values {
            for compress in [false, true] {
                let token = dumps(&value, KEY, compress).unwrap();
                let back: serde_json::Value = loads(&token, KEY).unwrap();
                assert_eq!(back, value);
            }
        }
    }

    #[test]
    fn test_dumps_is_compact_json() {
        let token = dumps(&json!({"a": [1, 2]}), KEY, false).unwrap();
        let (payload, _) = token.rsplit_once('.').unwrap();
        assert_eq!(from_base64url(payload).unwrap(), br#"{"a":[1,2]}"#.to_vec());
    }

    #[test]
    fn test_compression_marker_only_when_shorter() {
        let repetitive: Vec<i32> = vec![7; 200];
        let token = dumps(&repetitive, KEY, true).unwrap();
        assert!(token.starts_with(COMPRESSED_MARKER));
        let plain = dumps(&repetitive, KEY, false).unwrap();
        assert!(token.len() < plain.len());

        // Too small to benefit
        let token = dumps("hi", KEY, true).unwrap();
        assert!(!token.starts_with(COMPRESSED_MARKER));
        assert_eq!(token, dumps("hi", KEY, false).unwrap());

        let back: Vec<i32> = loads(&dumps(&repetitive, KEY, true).unwrap(), KEY).unwrap();
        assert_eq!(back, repetitive);
    }

    #[test]
    fn test_marker_never_applied_when_not_shorter() {
        let values = [
            json!(1),
            json!("abc"),
            json!([1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]),
            json!({"k": "v".repeat(50)}),
        ];
        for value in values {
            let compressed = dumps(&value, KEY, true).unwrap();
            let plain = dumps(&value, KEY, false).unwrap();
            if compressed.starts_with(COMPRESSED_MARKER) {
                assert!(compressed.len() < plain.len());
            } else {
                assert_eq!(compressed, plain);
            }
        }
    }

    #[test]
    fn test_loads_detects_tampering() {
        let value = json!({"foo": "bar", "baz": 1});
        for compress in [false, true] {
            let token = dumps(&vec![value.clone(); 10], KEY, compress).unwrap();
            for mutated in mutations(&token) {
                assert!(loads::<serde_json::Value>(&mutated, KEY).is_err());
            }
            assert!(loads::<serde_json::Value>(&token.replace('.', ""), KEY).is_err());
        }
    }

    #[test]
    fn test_loads_malformed_payload_with_valid_signature() {
        let token = sign("!!not-base64!!", KEY);
        assert!(matches!(
            loads::<serde_json::Value>(&token, KEY),
            Err(SignatureError::Malformed(_))
        ));

        let token = sign(".bm90LXpsaWI", KEY);
        assert!(matches!(
            loads::<serde_json::Value>(&token, KEY),
            Err(SignatureError::Malformed(_))
        ));
    }

    #[test]
    fn test_loads_typed_value() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Claims {
            uid: String,
            iat: i64,
        }
        let claims = Claims {
            uid: "abc".to_string(),
            iat: 1_700_000_000_000,
        };
        let token = dumps(&claims, KEY, true).unwrap();
        assert_eq!(loads::<Claims>(&token, KEY).unwrap(), claims);
    }

    #[test]
    fn test_signer_salt_separates_purposes() {
        let session = Signer::new(KEY.to_vec()).with_salt("auth.session");
        let other = Signer::new(KEY.to_vec()).with_salt("other");

        let token = session.sign("user-1");
        assert_eq!(session.unsign(&token).unwrap(), "user-1");
        assert!(other.unsign(&token).is_err());
        assert_eq!(token, sign("user-1", b"$geoon8_ymg-k)!9wl3wloq4&30wauth.session"));
    }

    #[test]
    fn test_signer_previous_key_rotation() {
        let old = Signer::new(b"old-key".to_vec());
        let rotated = Signer::new(b"new-key".to_vec()).with_previous_key(Some(b"old-key".to_vec()));
        let fresh = Signer::new(b"new-key".to_vec());

        let legacy_token = old.dumps(&json!({"uid": 1}), false).unwrap();
        assert!(fresh.loads::<serde_json::Value>(&legacy_token).is_err());
        assert_eq!(
            rotated.loads::<serde_json::Value>(&legacy_token).unwrap(),
            json!({"uid": 1})
        );

        // New tokens always use the current key
        let new_token = rotated.sign("x");
        assert_eq!(new_token, fresh.sign("x"));
        assert!(old.unsign(&new_token).is_err());
    }

    #[test]
    fn test_signer_debug_redacts_key() {
        let signer = Signer::new(b"super-secret".to_vec());
        let debug = format!("{signer:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}
