//! Admin login and identity.

use actix_web::{HttpResponse, web};

use quill_core::ports::{ADMIN_ROLE, AuthError};
use quill_shared::ApiResponse;
use quill_shared::dto::{AuthResponse, IdentityResponse, LoginRequest};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let Some(admin) = state.admin.as_ref() else {
        tracing::warn!("Login attempted but no admin account is configured");
        return Err(AuthError::InvalidCredentials.into());
    };

    let email_matches = admin.email.eq_ignore_ascii_case(req.email.trim());
    // Verify even on an unknown email so both paths cost the same.
    let password_matches = state.passwords.verify(&req.password, &admin.password_hash)?;

    if !(email_matches && password_matches) {
        tracing::info!(email = %req.email, "Admin login rejected");
        return Err(AuthError::InvalidCredentials.into());
    }

    let token = state
        .tokens
        .generate_token(admin.id, &admin.email, vec![ADMIN_ROLE.to_string()])
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %admin.id, "Admin logged in");

    Ok(HttpResponse::Ok().json(ApiResponse::ok(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.expiration_seconds().max(0) as u64,
    })))
}

/// GET /api/auth/me
pub async fn me(identity: Identity) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::ok(IdentityResponse {
        id: identity.user_id,
        is_admin: identity.is_admin(),
        role: identity.primary_role().map(String::from),
        email: identity.email,
    })))
}
