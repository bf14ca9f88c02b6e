//! Paycode crate: sub-modules.

pub mod types;
pub mod secret;
pub mod core;
pub mod encoder;
pub mod validator;
pub mod service;

// Re-export top-level items for convenience.
pub use types::*;
pub use service::PaycodeService;
