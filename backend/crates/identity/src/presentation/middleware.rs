//! Identity Middleware
//!
//! Bearer-token check for protected routes.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::error::IdentityError;
use crate::presentation::handlers::IdentityAppState;

/// Middleware that requires a valid bearer token
///
/// On success the decoded [`Claims`](crate::domain::token::Claims) are stored
/// in the request extensions for the handler.
pub async fn require_bearer<A, P>(
    State(state): State<IdentityAppState<A, P>>,
    mut req: Request,
    next: Next,
) -> Result<Response, IdentityError>
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let claims = {
        let token = bearer_token(req.headers()).ok_or(IdentityError::TokenInvalid)?;
        state.service.validate_token(token)?
    };

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
