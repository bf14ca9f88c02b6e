//! Secret codec: base-32 (RFC 4648) text to raw key bytes and back.
//!
//! Input is whitespace-tolerant and case-insensitive. Trailing `=` padding
//! is optional, but when present it must be well formed.

use crate::paycode::types::*;

/// Decode a human-entered base-32 secret into raw key bytes.
pub fn decode_secret(text: &str) -> Result<Vec<u8>, PaycodeError> {
    let cleaned: String = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.is_empty() {
        return Err(PaycodeError::new(PaycodeErrorKind::DecodeError, "Empty base-32 secret"));
    }
    if let Some(bad) = cleaned.chars().find(|c| !is_base32_char(*c)) {
        return Err(
            PaycodeError::new(PaycodeErrorKind::DecodeError, "Invalid base-32 secret")
                .with_detail(format!("illegal character {:?}", bad)),
        );
    }

    let data = cleaned.trim_end_matches('=');
    let pad_count = cleaned.len() - data.len();
    check_padding(data, pad_count)?;

    base32::decode(base32::Alphabet::Rfc4648 { padding: false }, data)
        .ok_or_else(|| PaycodeError::new(PaycodeErrorKind::DecodeError, "Invalid base-32 secret"))
}

/// Encode raw bytes as standard padded base-32.
pub fn encode_secret(bytes: &[u8]) -> String {
    base32::encode(base32::Alphabet::Rfc4648 { padding: true }, bytes)
}

/// Generate a cryptographically-random base-32 secret of `byte_length` bytes.
pub fn generate_secret(byte_length: usize) -> String {
    let mut buf = vec![0u8; byte_length];
    use rand::RngCore;
    rand::thread_rng().fill_bytes(&mut buf);
    encode_secret(&buf)
}

/// Check if a string decodes as a base-32 secret.
pub fn is_valid_secret(text: &str) -> bool {
    decode_secret(text).is_ok()
}

fn is_base32_char(c: char) -> bool {
    matches!(c, 'A'..='Z' | '2'..='7' | '=')
}

/// Padding may only trail the data, and only in the amount needed to reach
/// a multiple of 8. Data lengths of 1, 3 or 6 (mod 8) cannot come from any
/// byte string.
fn check_padding(data: &str, pad_count: usize) -> Result<(), PaycodeError> {
    if data.is_empty() {
        return Err(PaycodeError::new(PaycodeErrorKind::DecodeError, "Base-32 secret has no data"));
    }
    if data.contains('=') {
        return Err(
            PaycodeError::new(PaycodeErrorKind::DecodeError, "Invalid base-32 padding")
                .with_detail("'=' may only appear at the end"),
        );
    }
    let tail = data.len() % 8;
    if matches!(tail, 1 | 3 | 6) {
        return Err(
            PaycodeError::new(PaycodeErrorKind::DecodeError, "Invalid base-32 length")
                .with_detail(format!("{} data characters", data.len())),
        );
    }
    let expected_pad = (8 - tail) % 8;
    if pad_count != 0 && pad_count != expected_pad {
        return Err(
            PaycodeError::new(PaycodeErrorKind::DecodeError, "Invalid base-32 padding")
                .with_detail(format!("expected {} '=' but found {}", expected_pad, pad_count)),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC4226_SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    #[test]
    fn decode_rfc4226_key() {
        assert_eq!(decode_secret(RFC4226_SECRET).unwrap(), b"12345678901234567890");
    }

    #[test]
    fn encode_rfc4226_key() {
        assert_eq!(encode_secret(b"12345678901234567890"), RFC4226_SECRET);
    }

    #[test]
    fn encode_pads_to_eight() {
        assert_eq!(encode_secret(b"f"), "MY======");
        assert_eq!(encode_secret(b"fo"), "MZXQ====");
        assert_eq!(encode_secret(b"foob"), "MZXW6YQ=");
    }

    #[test]
    fn decode_encode_roundtrip() {
        let original = b"hello world secret";
        let b32 = encode_secret(original);
        assert_eq!(b32, "NBSWY3DPEB3W64TMMQQHGZLDOJSXI===");
        assert_eq!(decode_secret(&b32).unwrap(), original);
    }

    #[test]
    fn decode_without_padding() {
        assert_eq!(decode_secret("NBSWY3DPEB3W64TMMQQHGZLDOJSXI").unwrap(), b"hello world secret");
        assert_eq!(decode_secret("MY").unwrap(), b"f");
    }

    #[test]
    fn decode_with_whitespace() {
        let clean = decode_secret("JBSWY3DPEHPK3PXP").unwrap();
        let spaced = decode_secret("JBSW Y3DP EHPK 3PXP").unwrap();
        let tabbed = decode_secret("\tJBSW\nY3DP EHPK 3PXP  ").unwrap();
        assert_eq!(clean, spaced);
        assert_eq!(spaced, tabbed);
    }

    #[test]
    fn decode_case_insensitive() {
        let upper = decode_secret("JBSWY3DPEHPK3PXP").unwrap();
        let lower = decode_secret("jbswy3dpehpk3pxp").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn decode_rejects_foreign_characters() {
        for bad in ["!!!", "JBSWY3DP1HPK3PXP", "JBSW-Y3DP", "JBSWY3DPEHPK3PX8", "ẞẞ"] {
            let err = decode_secret(bad).unwrap_err();
            assert_eq!(err.kind, PaycodeErrorKind::DecodeError, "{}", bad);
        }
    }

    #[test]
    fn decode_rejects_empty() {
        assert!(decode_secret("").is_err());
        assert!(decode_secret("   ").is_err());
        assert!(decode_secret("========").is_err());
    }

    #[test]
    fn decode_rejects_bad_padding() {
        // '=' in the middle
        assert!(decode_secret("MY==MZXQ").is_err());
        // too much padding
        assert!(decode_secret("MY=======").is_err());
        assert!(decode_secret("MY==============").is_err());
        // too little padding
        assert!(decode_secret("MY=").is_err());
    }

    #[test]
    fn decode_rejects_impossible_lengths() {
        assert!(decode_secret("M").is_err());
        assert!(decode_secret("MZX").is_err());
        assert!(decode_secret("MZXW6Y").is_err());
    }

    #[test]
    fn generate_secret_length() {
        let s = generate_secret(20);
        assert_eq!(s.len(), 32);
        assert_eq!(decode_secret(&s).unwrap().len(), 20);
    }

    #[test]
    fn generate_secret_is_random() {
        assert_ne!(generate_secret(20), generate_secret(20));
    }

    #[test]
    fn is_valid_secret_check() {
        assert!(is_valid_secret("JBSWY3DPEHPK3PXP"));
        assert!(is_valid_secret("jbsw y3dp ehpk 3pxp"));
        assert!(!is_valid_secret(""));
        assert!(!is_valid_secret("!!!"));
    }
}
