//! Core types for paycode generation and validation.

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Layout constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Two-digit scheme prefix every paycode starts with.
pub const PAYCODE_PREFIX: &str = "28";
/// Width of the `x` field (the OTP value).
pub const X_WIDTH: usize = 4;
/// Width of the `y` field.
pub const Y_WIDTH: usize = 8;
/// Width of the `z` field.
pub const Z_WIDTH: usize = 4;
/// Total paycode length including the prefix.
pub const PAYCODE_LEN: usize = PAYCODE_PREFIX.len() + X_WIDTH + Y_WIDTH + Z_WIDTH;

/// Default TOTP step in seconds.
pub const DEFAULT_STEP_SECONDS: u64 = 30;
/// Default number of OTP digits.
pub const DEFAULT_OTP_DIGITS: u32 = 4;
/// Default account identifier carried inside paycodes.
pub const DEFAULT_UID: u64 = 10_203_405_609;
/// Default multiplier applied to `x` when deriving `y`.
pub const DEFAULT_FACTOR: u64 = 5;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Configuration
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Immutable tunables shared by the generator, encoder and validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycodeConfig {
    /// TOTP time step in seconds.
    pub step_seconds: u64,
    /// Number of decimal digits in the OTP (at most the `x` field width).
    pub otp_digits: u32,
    /// Account / device identifier.
    pub uid: u64,
    /// Multiplier used in `y = uid / x + factor * x`.
    pub factor: u64,
}

impl Default for PaycodeConfig {
    fn default() -> Self {
        Self {
            step_seconds: DEFAULT_STEP_SECONDS,
            otp_digits: DEFAULT_OTP_DIGITS,
            uid: DEFAULT_UID,
            factor: DEFAULT_FACTOR,
        }
    }
}

impl PaycodeConfig {
    /// Builder: set the identifier.
    pub fn with_uid(mut self, uid: u64) -> Self {
        self.uid = uid;
        self
    }

    /// Builder: set the factor.
    pub fn with_factor(mut self, factor: u64) -> Self {
        self.factor = factor;
        self
    }

    /// Builder: set the time step.
    pub fn with_step_seconds(mut self, step_seconds: u64) -> Self {
        self.step_seconds = step_seconds;
        self
    }

    /// Builder: set the OTP digit count.
    pub fn with_otp_digits(mut self, otp_digits: u32) -> Self {
        self.otp_digits = otp_digits;
        self
    }

    /// Reject values the generator or encoder cannot work with.
    pub fn validate(&self) -> Result<(), PaycodeError> {
        if self.step_seconds == 0 {
            return Err(PaycodeError::new(
                PaycodeErrorKind::InvalidConfig,
                "step_seconds must be greater than zero",
            ));
        }
        if self.otp_digits == 0 || self.otp_digits as usize > X_WIDTH {
            return Err(PaycodeError::new(
                PaycodeErrorKind::InvalidConfig,
                format!("otp_digits must be in 1..={}", X_WIDTH),
            )
            .with_detail(format!("got {}", self.otp_digits)));
        }
        if self.factor == 0 {
            return Err(PaycodeError::new(
                PaycodeErrorKind::InvalidConfig,
                "factor must be greater than zero",
            ));
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Paycode fields
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The three numeric fields that follow the scheme prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaycodeFields {
    /// The OTP value.
    pub x: u32,
    /// `uid / x + factor * x`.
    pub y: u64,
    /// `uid % x`.
    pub z: u32,
}

impl fmt::Display for PaycodeFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x={} y={} z={}", self.x, self.y, self.z)
    }
}

/// A freshly generated paycode together with its timing context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPaycode {
    /// The rendered paycode string.
    pub code: String,
    pub fields: PaycodeFields,
    /// TOTP counter the OTP was derived from.
    pub counter: u64,
    /// Seconds until the step (and therefore the paycode) expires.
    pub remaining_seconds: u64,
}

/// A generated OTP with its timing context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedOtp {
    pub otp: u32,
    /// Zero-padded rendering.
    pub code: String,
    pub counter: u64,
    pub remaining_seconds: u64,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Validation result
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of validating a paycode against an expected identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// The recovered identifier equals the expected one.
    pub uid_matches: bool,
    /// `x` equals the OTP for the validation time step.
    pub otp_matches: bool,
    /// Identifier recovered from the fields (`None` if the arithmetic does not fit).
    pub recovered_uid: Option<u64>,
    pub fields: PaycodeFields,
}

impl ValidationResult {
    /// Convert an invalid outcome into an `InvalidPaycode` error.
    pub fn into_result(self, paycode: &str) -> Result<Self, PaycodeError> {
        if self.valid {
            return Ok(self);
        }
        let mut reasons = Vec::new();
        if !self.uid_matches {
            reasons.push("identifier mismatch");
        }
        if !self.otp_matches {
            reasons.push("stale or forged otp");
        }
        Err(
            PaycodeError::new(PaycodeErrorKind::InvalidPaycode, format!("invalid paycode: {}", paycode))
                .with_detail(reasons.join(", ")),
        )
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  Error type
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaycodeErrorKind {
    /// Malformed base-32 secret.
    DecodeError,
    /// The OTP value is zero and cannot be used as a divisor.
    DivisionByZero,
    /// A derived value does not fit its fixed-width field.
    FieldOverflow,
    /// Paycode string does not match the fixed layout.
    ParseError,
    /// Recovered identifier or freshness check failed.
    InvalidPaycode,
    InvalidConfig,
}

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaycodeError {
    pub kind: PaycodeErrorKind,
    pub message: String,
    pub detail: Option<String>,
}

impl fmt::Display for PaycodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(d) = &self.detail {
            write!(f, " ({})", d)?;
        }
        Ok(())
    }
}

impl std::error::Error for PaycodeError {}

impl PaycodeError {
    pub fn new(kind: PaycodeErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            message: msg.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl From<PaycodeError> for String {
    fn from(e: PaycodeError) -> String {
        e.to_string()
    }
}
