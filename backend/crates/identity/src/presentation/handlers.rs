//! HTTP Handlers

use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use std::sync::Arc;

use crate::application::{IdentityService, UpdateSellerProfileInput};
use crate::domain::repository::{AccountRepository, SellerProfileRepository};
use crate::domain::token::Claims;
use crate::domain::value_object::{account_id::AccountId, account_role::AccountRole};
use crate::error::{IdentityError, IdentityResult};
use crate::presentation::dto::{
    AccountResponse, AuthenticateRequest, ClaimsResponse, RegisterSellerRequest,
    RegisterUserRequest, SellerProfileResponse, SessionResponse, UpdateSellerProfileRequest,
};

/// Shared state for identity handlers
pub struct IdentityAppState<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    pub service: Arc<IdentityService<A, P>>,
}

// derive(Clone) would require A: Clone and P: Clone
impl<A, P> Clone for IdentityAppState<A, P>
where
    A: AccountRepository,
    P: SellerProfileRepository,
{
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

/// Unparseable IDs name no account
fn parse_account_id(raw: &str) -> IdentityResult<AccountId> {
    raw.parse().map_err(|_| IdentityError::NotFound)
}

// ============================================================================
// Registration
// ============================================================================

/// POST /users
pub async fn register_user<A, P>(
    State(state): State<IdentityAppState<A, P>>,
    Json(req): Json<RegisterUserRequest>,
) -> IdentityResult<impl IntoResponse>
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let ctx = state.service.config().request_context();

    let account = state
        .service
        .register_user(&ctx, req.name, req.email, req.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

/// POST /sellers
pub async fn register_seller<A, P>(
    State(state): State<IdentityAppState<A, P>>,
    Json(req): Json<RegisterSellerRequest>,
) -> IdentityResult<impl IntoResponse>
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let ctx = state.service.config().request_context();

    let account = state
        .service
        .register_seller(&ctx, req.name, req.email, req.password, req.phone)
        .await?;

    Ok((StatusCode::CREATED, Json(AccountResponse::from(&account))))
}

// ============================================================================
// Sessions
// ============================================================================

/// POST /sessions
pub async fn authenticate<A, P>(
    State(state): State<IdentityAppState<A, P>>,
    Json(req): Json<AuthenticateRequest>,
) -> IdentityResult<Json<SessionResponse>>
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let ctx = state.service.config().request_context();

    let output = state
        .service
        .authenticate(&ctx, req.email, req.password, req.role)
        .await?;

    Ok(Json(SessionResponse::new(&output.account, output.token)))
}

/// GET /session (bearer)
pub async fn current_session(Extension(claims): Extension<Claims>) -> Json<ClaimsResponse> {
    Json(ClaimsResponse::from(&claims))
}

// ============================================================================
// Accounts
// ============================================================================

/// GET /accounts/{id}
pub async fn get_account<A, P>(
    State(state): State<IdentityAppState<A, P>>,
    Path(id): Path<String>,
) -> IdentityResult<Json<AccountResponse>>
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let account_id = parse_account_id(&id)?;
    let ctx = state.service.config().request_context();

    let account = state.service.get_user_by_id(&ctx, &account_id).await?;

    Ok(Json(AccountResponse::from(&account)))
}

// ============================================================================
// Seller Profiles
// ============================================================================

/// GET /sellers/{id}/profile
pub async fn get_seller_profile<A, P>(
    State(state): State<IdentityAppState<A, P>>,
    Path(id): Path<String>,
) -> IdentityResult<Json<SellerProfileResponse>>
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let account_id = parse_account_id(&id)?;
    let ctx = state.service.config().request_context();

    let profile = state
        .service
        .get_seller_profile_by_id(&ctx, &account_id)
        .await?;

    Ok(Json(SellerProfileResponse::from(profile)))
}

/// PUT /sellers/{id}/profile (bearer, owner only)
pub async fn update_seller_profile<A, P>(
    State(state): State<IdentityAppState<A, P>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    Json(req): Json<UpdateSellerProfileRequest>,
) -> IdentityResult<StatusCode>
where
    A: AccountRepository + Sync + 'static,
    P: SellerProfileRepository + Sync + 'static,
{
    let account_id = parse_account_id(&id)?;

    if claims.sub != account_id || claims.role != AccountRole::Seller {
        return Err(IdentityError::Forbidden);
    }

    let ctx = state.service.config().request_context();

    let input = UpdateSellerProfileInput {
        account_id,
        phone: req.phone,
        store_name: req.store_name,
        vendor_type: req.vendor_type,
        description: req.description,
        address: req.address,
        city: req.city,
        specialty: req.specialty,
        operating_hours: req.operating_hours,
        delivery_options: req.delivery_options,
        image_url: req.image_url,
        profile_image_url: req.profile_image_url,
    };

    state.service.update_seller_profile(&ctx, input).await?;

    Ok(StatusCode::NO_CONTENT)
}
