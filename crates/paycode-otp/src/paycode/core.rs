//! Core OTP generation: RFC 4226 dynamic truncation over RFC 6238 time steps.
//!
//! Only HMAC-SHA1 is supported. The counter is serialised big-endian and the
//! truncated 32-bit window is read back big-endian, as standard verifiers do.

use crate::paycode::types::*;
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// SHA-1 digest length in bytes.
const DIGEST_LEN: usize = 20;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Raw HMAC-OTP (RFC 4226 §5.3)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compute the HOTP value for raw key bytes and a counter.
pub fn hotp(key: &[u8], counter: u64, digits: u32) -> u32 {
    let digest = hmac_sha1(key, &counter.to_be_bytes());
    truncate(&digest, digits)
}

/// Compute HMAC-SHA1(key, message).
fn hmac_sha1(key: &[u8], data: &[u8]) -> [u8; DIGEST_LEN] {
    let mut mac = HmacSha1::new_from_slice(key).expect("HMAC accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Dynamic truncation per RFC 4226 §5.3.
fn truncate(digest: &[u8; DIGEST_LEN], digits: u32) -> u32 {
    // low nibble of the last byte, so offset + 4 <= 20
    let offset = (digest[DIGEST_LEN - 1] & 0x0f) as usize;
    let window = [
        digest[offset] & 0x7f,
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ];
    let number = u32::from_be_bytes(window);
    log::debug!("otp truncation offset={} number={}", offset, number);
    // number < 2^31, so ten or more digits keep it whole
    match 10u32.checked_pow(digits) {
        Some(modulus) => number % modulus,
        None => number,
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TOTP (time-based, RFC 6238)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Time-step counter for a unix timestamp, `None` for a zero step.
pub fn time_step_at(unix_seconds: u64, step_seconds: u64) -> Option<u64> {
    unix_seconds.checked_div(step_seconds)
}

/// Seconds remaining until the step containing `unix_seconds` expires,
/// `None` for a zero step.
pub fn seconds_remaining_at(unix_seconds: u64, step_seconds: u64) -> Option<u64> {
    unix_seconds.checked_rem(step_seconds).map(|elapsed| step_seconds - elapsed)
}

/// Generate the OTP for `secret` at an explicit unix timestamp.
///
/// Identical secret and time step always yield the identical OTP; the value
/// is in `[0, 10^otp_digits)`. Fails with `InvalidConfig` when `config` does
/// not pass [`PaycodeConfig::validate`].
pub fn generate(secret: &[u8], unix_seconds: u64, config: &PaycodeConfig) -> Result<u32, PaycodeError> {
    Ok(generate_otp_at(secret, unix_seconds, config)?.otp)
}

/// Generate an OTP with its counter and remaining validity.
pub fn generate_otp_at(secret: &[u8], unix_seconds: u64, config: &PaycodeConfig) -> Result<GeneratedOtp, PaycodeError> {
    config.validate()?;
    // a validated step is nonzero
    let step = config.step_seconds;
    let counter = unix_seconds / step;
    log::debug!("otp counter={} step={}s", counter, step);
    let otp = hotp(secret, counter, config.otp_digits);
    Ok(GeneratedOtp {
        otp,
        code: format_otp(otp, config.otp_digits),
        counter,
        remaining_seconds: step - unix_seconds % step,
    })
}

/// Render an OTP as exactly `digits` characters, left-padded with zeros.
pub fn format_otp(otp: u32, digits: u32) -> String {
    format!("{:0>width$}", otp, width = digits as usize)
}

/// Current unix timestamp in seconds.
pub fn current_unix_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Constant-time comparison of two OTP renderings.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 4226 Appendix D key: "12345678901234567890" (ASCII)
    const RFC4226_KEY: &[u8] = b"12345678901234567890";

    // ── RFC 4226 HOTP vectors ────────────────────────────────────

    #[test]
    fn rfc4226_hotp_vectors_six_digits() {
        let expected = [
            755224, 287082, 359152, 969429, 338314,
            254676, 287922, 162583, 399871, 520489,
        ];
        for (counter, exp) in expected.iter().enumerate() {
            assert_eq!(hotp(RFC4226_KEY, counter as u64, 6), *exp, "HOTP mismatch at counter {}", counter);
        }
    }

    #[test]
    fn rfc4226_hotp_vectors_four_digits() {
        let expected = [5224, 7082, 9152, 9429, 8314, 4676, 7922, 2583, 9871, 489];
        for (counter, exp) in expected.iter().enumerate() {
            assert_eq!(hotp(RFC4226_KEY, counter as u64, 4), *exp, "HOTP mismatch at counter {}", counter);
        }
    }

    // ── RFC 6238 TOTP vectors, 4-digit truncation ────────────────

    #[test]
    fn totp_at_59() {
        assert_eq!(generate(RFC4226_KEY, 59, &PaycodeConfig::default()).unwrap(), 7082);
    }

    #[test]
    fn totp_at_1111111109() {
        assert_eq!(generate(RFC4226_KEY, 1_111_111_109, &PaycodeConfig::default()).unwrap(), 1804);
    }

    #[test]
    fn totp_at_1234567890() {
        assert_eq!(generate(RFC4226_KEY, 1_234_567_890, &PaycodeConfig::default()).unwrap(), 5924);
    }

    #[test]
    fn totp_at_20000000000() {
        assert_eq!(generate(RFC4226_KEY, 20_000_000_000, &PaycodeConfig::default()).unwrap(), 3130);
    }

    #[test]
    fn totp_eight_digits_matches_rfc6238() {
        let cfg = PaycodeConfig::default();
        let counter = time_step_at(59, cfg.step_seconds).unwrap();
        assert_eq!(hotp(RFC4226_KEY, counter, 8), 94287082);
    }

    // ── Determinism ──────────────────────────────────────────────

    #[test]
    fn same_step_same_otp() {
        let cfg = PaycodeConfig::default();
        let first = generate(RFC4226_KEY, 30, &cfg).unwrap();
        for t in 30..60 {
            assert_eq!(generate(RFC4226_KEY, t, &cfg).unwrap(), first);
        }
        assert_eq!(generate(RFC4226_KEY, 29, &cfg).unwrap(), 5224);
        assert_eq!(generate(RFC4226_KEY, 60, &cfg).unwrap(), 9152);
    }

    #[test]
    fn custom_step() {
        let cfg = PaycodeConfig::default().with_step_seconds(60);
        // t=119 is counter 1 with a 60 s step
        assert_eq!(generate(RFC4226_KEY, 119, &cfg).unwrap(), 7082);
    }

    // ── Time-step helpers ────────────────────────────────────────

    #[test]
    fn time_step_calculation() {
        assert_eq!(time_step_at(0, 30), Some(0));
        assert_eq!(time_step_at(29, 30), Some(0));
        assert_eq!(time_step_at(30, 30), Some(1));
        assert_eq!(time_step_at(59, 30), Some(1));
        assert_eq!(time_step_at(60, 30), Some(2));
    }

    #[test]
    fn seconds_remaining_calculation() {
        assert_eq!(seconds_remaining_at(0, 30), Some(30));
        assert_eq!(seconds_remaining_at(1, 30), Some(29));
        assert_eq!(seconds_remaining_at(29, 30), Some(1));
        assert_eq!(seconds_remaining_at(30, 30), Some(30));
    }

    #[test]
    fn zero_step_has_no_counter() {
        assert_eq!(time_step_at(59, 0), None);
        assert_eq!(seconds_remaining_at(59, 0), None);
    }

    #[test]
    fn generate_otp_at_context() {
        let g = generate_otp_at(RFC4226_KEY, 59, &PaycodeConfig::default()).unwrap();
        assert_eq!(g.otp, 7082);
        assert_eq!(g.code, "7082");
        assert_eq!(g.counter, 1);
        assert_eq!(g.remaining_seconds, 1);
    }

    // ── Formatting ───────────────────────────────────────────────

    #[test]
    fn format_otp_pads() {
        assert_eq!(format_otp(489, 4), "0489");
        assert_eq!(format_otp(0, 4), "0000");
        assert_eq!(format_otp(7082, 4), "7082");
    }

    // ── Truncation window ────────────────────────────────────────

    #[test]
    fn truncation_offset_fifteen() {
        let mut digest = [0u8; DIGEST_LEN];
        digest[DIGEST_LEN - 1] = 0xff; // offset 15, window bytes 15..19
        digest[15] = 0xff;
        digest[16] = 0x00;
        digest[17] = 0x00;
        digest[18] = 0x01;
        // top bit masked: 0x7f000001 = 2130706433
        assert_eq!(truncate(&digest, 4), 2130706433 % 10_000);
        assert_eq!(truncate(&digest, 10), 2130706433);
        assert_eq!(truncate(&digest, 12), 2130706433);
    }

    // ── Invalid configuration ────────────────────────────────────

    #[test]
    fn generate_rejects_zero_step() {
        let cfg = PaycodeConfig::default().with_step_seconds(0);
        let err = generate(RFC4226_KEY, 59, &cfg).unwrap_err();
        assert_eq!(err.kind, PaycodeErrorKind::InvalidConfig);
    }

    #[test]
    fn generate_rejects_wide_otp() {
        for digits in [0, 5, 10, u32::MAX] {
            let cfg = PaycodeConfig::default().with_otp_digits(digits);
            let err = generate_otp_at(RFC4226_KEY, 59, &cfg).unwrap_err();
            assert_eq!(err.kind, PaycodeErrorKind::InvalidConfig, "digits={}", digits);
        }
    }

    #[test]
    fn hotp_with_many_digits_does_not_overflow() {
        // RFC 4226 Appendix D truncated value for counter 1
        assert_eq!(hotp(RFC4226_KEY, 1, 10), 1_094_287_082);
        assert_eq!(hotp(RFC4226_KEY, 1, 32), 1_094_287_082);
    }

    #[test]
    fn constant_time_eq_works() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
