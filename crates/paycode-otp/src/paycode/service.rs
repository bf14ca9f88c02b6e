//! High-level façade: binds one configuration and one decoded secret and
//! delegates to the generator, encoder and validator.

use std::fmt;

use crate::paycode::core;
use crate::paycode::encoder;
use crate::paycode::secret;
use crate::paycode::types::*;
use crate::paycode::validator;

/// Paycode producer / consumer for a single shared secret.
#[derive(Clone)]
pub struct PaycodeService {
    config: PaycodeConfig,
    secret: Vec<u8>,
}

impl fmt::Debug for PaycodeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaycodeService")
            .field("config", &self.config)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl PaycodeService {
    /// Create a service from raw key bytes.
    pub fn new(config: PaycodeConfig, secret: Vec<u8>) -> Result<Self, PaycodeError> {
        config.validate()?;
        if secret.is_empty() {
            return Err(PaycodeError::new(PaycodeErrorKind::DecodeError, "Secret must not be empty"));
        }
        Ok(Self { config, secret })
    }

    /// Create a service from a human-entered base-32 secret.
    pub fn from_encoded_secret(config: PaycodeConfig, text: &str) -> Result<Self, PaycodeError> {
        let key = secret::decode_secret(text)?;
        Self::new(config, key)
    }

    pub fn config(&self) -> &PaycodeConfig {
        &self.config
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Producer side
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// OTP for an explicit unix timestamp.
    pub fn otp_at(&self, unix_seconds: u64) -> Result<GeneratedOtp, PaycodeError> {
        core::generate_otp_at(&self.secret, unix_seconds, &self.config)
    }

    /// OTP for the current time.
    pub fn otp(&self) -> Result<GeneratedOtp, PaycodeError> {
        self.otp_at(core::current_unix_time())
    }

    /// Paycode for an explicit unix timestamp.
    ///
    /// Fails with `DivisionByZero` when the OTP for this step is zero and with
    /// `FieldOverflow` when `y` does not fit its 8 digits; both are specific to
    /// the time step, so the caller may simply wait for the next one.
    pub fn generate_at(&self, unix_seconds: u64) -> Result<GeneratedPaycode, PaycodeError> {
        let otp = self.otp_at(unix_seconds)?;
        let fields = encoder::derive_fields(otp.otp, self.config.uid, self.config.factor)?;
        let code = encoder::format_paycode(&fields)?;
        log::info!("generated paycode {} (counter {})", code, otp.counter);
        Ok(GeneratedPaycode {
            code,
            fields,
            counter: otp.counter,
            remaining_seconds: otp.remaining_seconds,
        })
    }

    /// Paycode for the current time.
    pub fn generate(&self) -> Result<GeneratedPaycode, PaycodeError> {
        self.generate_at(core::current_unix_time())
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Consumer side
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Validate a paycode against the configured identifier at an explicit time.
    pub fn validate_at(&self, paycode: &str, unix_seconds: u64) -> Result<ValidationResult, PaycodeError> {
        validator::validate(paycode, &self.secret, unix_seconds, &self.config)
    }

    /// Validate a paycode at the current time.
    pub fn validate(&self, paycode: &str) -> Result<ValidationResult, PaycodeError> {
        self.validate_at(paycode, core::current_unix_time())
    }
}
