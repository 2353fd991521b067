//! Shared Kernel - vocabulary shared by every backend crate
//!
//! Kept deliberately small:
//! - Unified error type ([`error::app_error::AppError`]) and its classification
//! - Typed identifiers ([`id::Id`])
//! - Request-scoped deadline propagation ([`context::RequestContext`])

pub mod context;
pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
