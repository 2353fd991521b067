//! Application Layer
//!
//! Use cases and the identity service facade.

pub mod authenticate;
pub mod config;
pub mod register;
pub mod seller_profile;
pub mod service;

use kernel::context::RequestContext;

use crate::error::{IdentityError, IdentityResult};

// Re-exports
pub use authenticate::{AuthenticateInput, AuthenticateOutput, AuthenticateUseCase};
pub use config::IdentityConfig;
pub use register::{RegisterSellerInput, RegisterUseCase, RegisterUserInput};
pub use seller_profile::{SellerProfileUseCase, UpdateSellerProfileInput};
pub use service::IdentityService;

/// Run CPU-heavy work (Argon2) on the blocking pool, bounded by the request deadline
///
/// On timeout the blocking task still runs to completion; only the caller stops waiting.
pub(crate) async fn run_blocking<T, F>(ctx: &RequestContext, f: F) -> IdentityResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    ctx.ensure_active()?;
    ctx.bound(tokio::task::spawn_blocking(f))
        .await?
        .map_err(|e| IdentityError::Internal(format!("blocking task failed: {e}")))
}
