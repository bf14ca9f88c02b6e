//! # Paycode OTP
//!
//! Time-based one-time passwords packed into fixed-width numeric paycodes:
//!
//! - **Secret codec** – Case-insensitive, whitespace-tolerant base-32 secrets
//! - **RFC 4226 / 6238** – HMAC-SHA1 dynamic truncation over 30-second steps
//! - **Paycode encoding** – `"28" + x(4) + y(8) + z(4)` carrying an account id
//! - **Validation** – Identifier recovery plus a fresh OTP check, returned as a value

pub mod paycode;
