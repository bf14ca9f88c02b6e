//! Paycode encoder.
//!
//! ```text
//! -- |--------|-----------|--------
//! 28 |  x     |  y        |  z
//! -- |--------|-----------|--------
//!      4 digits  8 digits   4 digits
//! ```
//!
//! `x` is the OTP, `y = uid / x + factor * x` and `z = uid % x`.

use crate::paycode::types::*;

/// Derive the paycode fields from an OTP value and an identifier.
pub fn derive_fields(otp: u32, uid: u64, factor: u64) -> Result<PaycodeFields, PaycodeError> {
    if otp == 0 {
        return Err(
            PaycodeError::new(PaycodeErrorKind::DivisionByZero, "OTP value is zero")
                .with_detail("x is used as a divisor"),
        );
    }
    let x = u64::from(otp);
    let y = factor
        .checked_mul(x)
        .and_then(|fx| fx.checked_add(uid / x))
        .ok_or_else(|| {
            PaycodeError::new(PaycodeErrorKind::FieldOverflow, "y does not fit in 64 bits")
                .with_detail(format!("x={} factor={}", x, factor))
        })?;
    // z < x, and x came from a u32
    let z = (uid % x) as u32;
    Ok(PaycodeFields { x: otp, y, z })
}

/// Render the fields as a fixed-width paycode, rejecting any field that
/// would spill past its width.
pub fn format_paycode(fields: &PaycodeFields) -> Result<String, PaycodeError> {
    check_width("x", u64::from(fields.x), X_WIDTH)?;
    check_width("y", fields.y, Y_WIDTH)?;
    check_width("z", u64::from(fields.z), Z_WIDTH)?;
    Ok(format!(
        "{}{:0xw$}{:0yw$}{:0zw$}",
        PAYCODE_PREFIX,
        fields.x,
        fields.y,
        fields.z,
        xw = X_WIDTH,
        yw = Y_WIDTH,
        zw = Z_WIDTH,
    ))
}

/// Encode an OTP and identifier into a paycode string.
pub fn encode(otp: u32, uid: u64, factor: u64) -> Result<String, PaycodeError> {
    let fields = derive_fields(otp, uid, factor)?;
    format_paycode(&fields)
}

fn check_width(name: &str, value: u64, width: usize) -> Result<(), PaycodeError> {
    if value >= 10u64.pow(width as u32) {
        return Err(
            PaycodeError::new(
                PaycodeErrorKind::FieldOverflow,
                format!("field {} exceeds {} digits", name, width),
            )
            .with_detail(format!("{}={}", name, value)),
        );
    }
    Ok(())
}
