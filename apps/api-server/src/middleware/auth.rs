//! Authentication extractors.
//!
//! The only decision the API needs is "is this an authenticated admin",
//! plus the caller's role for display.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use uuid::Uuid;

use quill_core::ports::{ADMIN_ROLE, AuthError, TokenClaims};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated caller identity.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
}

impl Identity {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ADMIN_ROLE)
    }

    /// The role shown to the caller: admin when present, else the first one.
    pub fn primary_role(&self) -> Option<&str> {
        if self.is_admin() {
            Some(ADMIN_ROLE)
        } else {
            self.roles.first().map(String::as_str)
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthError::InvalidToken("Server configuration error".to_string()));
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuth)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("Invalid authorization header".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidToken("Expected Bearer token".to_string()))?;

    state.tokens.validate_token(token.trim()).map(Identity::from)
}

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(AppError::from))
    }
}

/// Identity that must carry the admin role. Missing or bad tokens give 401,
/// a valid non-admin token gives 403.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub Identity);

impl FromRequest for AdminIdentity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = authenticate(req).map_err(AppError::from).and_then(|identity| {
            if identity.is_admin() {
                Ok(AdminIdentity(identity))
            } else {
                tracing::warn!(user_id = %identity.user_id, path = %req.path(), "Admin route refused");
                Err(AuthError::InsufficientPermissions.into())
            }
        });
        ready(result)
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}
