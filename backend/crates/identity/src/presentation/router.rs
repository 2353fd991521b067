//! Identity Router

use axum::{
    Router, middleware,
    routing::{get, post, put},
};
use std::sync::Arc;

use crate::application::IdentityService;
use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::presentation::handlers::{self, IdentityAppState};
use crate::presentation::middleware::require_bearer;

/// Create the identity router for any repository implementation
///
/// Routes:
/// - `POST /users`, `POST /sellers`: registration
/// - `POST /sessions`: sign in, returns a bearer token
/// - `GET /session`: decoded claims of the presented token
/// - `GET /accounts/{id}`: public account view
/// - `GET /sellers/{id}/profile`, `PUT /sellers/{id}/profile`: seller profile
pub fn identity_router<A, P>(service: Arc<IdentityService<A, P>>) -> Router
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let state = IdentityAppState { service };
    let bearer = middleware::from_fn_with_state(state.clone(), require_bearer::<A, P>);

    Router::new()
        .route("/users", post(handlers::register_user::<A, P>))
        .route("/sellers", post(handlers::register_seller::<A, P>))
        .route("/sessions", post(handlers::authenticate::<A, P>))
        .route(
            "/session",
            get(handlers::current_session).route_layer(bearer.clone()),
        )
        .route("/accounts/{id}", get(handlers::get_account::<A, P>))
        .route(
            "/sellers/{id}/profile",
            get(handlers::get_seller_profile::<A, P>)
                .merge(put(handlers::update_seller_profile::<A, P>).route_layer(bearer)),
        )
        .with_state(state)
}
