//! Application Configuration
//!
//! Configuration for the Identity application layer.
//! The token signing key is not part of it: [`TokenIssuer`](crate::domain::token::TokenIssuer)
//! owns the key for the lifetime of the process.

use std::fmt;
use std::time::Duration;

use kernel::context::RequestContext;
use platform::password::{PasswordParams, PasswordPolicy};

/// Identity application configuration
#[derive(Clone)]
pub struct IdentityConfig {
    /// Validity window of session tokens (24 hours)
    pub token_ttl: Duration,
    /// Argon2id cost parameters
    pub password_params: PasswordParams,
    /// Accepted password lengths
    pub password_policy: PasswordPolicy,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Deadline applied to every request
    pub request_timeout: Duration,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(24 * 3600), // 24 hours
            password_params: PasswordParams::default(),
            password_policy: PasswordPolicy::default(),
            password_pepper: None,
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl IdentityConfig {
    /// Create config for development (cheap hashing)
    pub fn development() -> Self {
        Self {
            password_params: PasswordParams::minimal(),
            ..Self::default()
        }
    }

    /// Fresh context bounded by `request_timeout`
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.request_timeout)
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("token_ttl", &self.token_ttl)
            .field("password_params", &self.password_params)
            .field("password_policy", &self.password_policy)
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
