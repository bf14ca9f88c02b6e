//! Paycode validator: parse the fixed-width layout, recover the identifier
//! and re-check the OTP for the validation time step.
//!
//! There is no clock-skew window: a paycode generated in one step and
//! validated in the next fails exactly like a forged one.

use crate::paycode::core;
use crate::paycode::types::*;

/// Parse a paycode into its `(x, y, z)` fields.
pub fn decode(paycode: &str) -> Result<PaycodeFields, PaycodeError> {
    if paycode.len() != PAYCODE_LEN {
        return Err(
            PaycodeError::new(PaycodeErrorKind::ParseError, "Paycode has the wrong length")
                .with_detail(format!("expected {} got {}", PAYCODE_LEN, paycode.len())),
        );
    }
    if !paycode.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PaycodeError::new(
            PaycodeErrorKind::ParseError,
            "Paycode must contain only decimal digits",
        ));
    }
    let (prefix, rest) = paycode.split_at(PAYCODE_PREFIX.len());
    if prefix != PAYCODE_PREFIX {
        return Err(
            PaycodeError::new(PaycodeErrorKind::ParseError, "Unknown paycode scheme prefix")
                .with_detail(format!("expected {} got {}", PAYCODE_PREFIX, prefix)),
        );
    }

    let (x, rest) = rest.split_at(X_WIDTH);
    let (y, z) = rest.split_at(Y_WIDTH);
    let fields = PaycodeFields {
        x: parse_field("x", x)?,
        y: parse_field("y", y)?,
        z: parse_field("z", z)?,
    };
    // the encoder divides by x, so no genuine paycode carries x = 0
    if fields.x == 0 {
        return Err(
            PaycodeError::new(PaycodeErrorKind::ParseError, "Invalid field x")
                .with_detail("x must be nonzero"),
        );
    }
    Ok(fields)
}

fn parse_field<T: std::str::FromStr>(name: &str, digits: &str) -> Result<T, PaycodeError> {
    digits.parse().map_err(|_| {
        PaycodeError::new(PaycodeErrorKind::ParseError, format!("Invalid field {}", name))
            .with_detail(digits.to_string())
    })
}

/// Recover the identifier: `x * (y - factor * x) + z`.
///
/// Returns `None` when the fields cannot have come from the encoder
/// (`x` is zero, `z` is not below `x`, the subtraction underflows or the
/// result overflows).
pub fn recover_uid(fields: &PaycodeFields, factor: u64) -> Option<u64> {
    if fields.x == 0 || fields.z >= fields.x {
        return None;
    }
    let x = u64::from(fields.x);
    let quotient = fields.y.checked_sub(factor.checked_mul(x)?)?;
    x.checked_mul(quotient)?.checked_add(u64::from(fields.z))
}

/// Validate a paycode against `config.uid` and the OTP for `unix_seconds`.
///
/// Parse and configuration failures are returned as errors; a well-formed
/// but wrong paycode is returned as a `ValidationResult` with `valid == false`.
pub fn validate(
    paycode: &str,
    secret: &[u8],
    unix_seconds: u64,
    config: &PaycodeConfig,
) -> Result<ValidationResult, PaycodeError> {
    let fresh = core::generate(secret, unix_seconds, config)?;

    let fields = decode(paycode)?;
    let recovered_uid = recover_uid(&fields, config.factor);
    let uid_matches = recovered_uid == Some(config.uid);

    let otp_matches = core::constant_time_eq(
        core::format_otp(fresh, X_WIDTH as u32).as_bytes(),
        core::format_otp(fields.x, X_WIDTH as u32).as_bytes(),
    );

    let valid = uid_matches && otp_matches;
    if valid {
        log::info!("paycode {} accepted", paycode);
    } else {
        log::warn!(
            "paycode {} rejected (uid_matches={}, otp_matches={})",
            paycode,
            uid_matches,
            otp_matches
        );
    }

    Ok(ValidationResult {
        valid,
        uid_matches,
        otp_matches,
        recovered_uid,
        fields,
    })
}
