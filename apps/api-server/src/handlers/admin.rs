//! Entry point of the admin area.

use actix_web::{HttpResponse, http::header};

use quill_shared::ApiResponse;
use quill_shared::dto::IdentityResponse;

use crate::middleware::auth::OptionalIdentity;

pub const LOGIN_REDIRECT: &str = "/login?next=/admin";

/// GET /admin - anyone but an admin is sent to the login page.
pub async fn entry(identity: OptionalIdentity) -> HttpResponse {
    match identity.0 {
        Some(identity) if identity.is_admin() => HttpResponse::Ok().json(ApiResponse::ok(
            IdentityResponse {
                id: identity.user_id,
                is_admin: true,
                role: identity.primary_role().map(String::from),
                email: identity.email,
            },
        )),
        _ => HttpResponse::SeeOther()
            .insert_header((header::LOCATION, LOGIN_REDIRECT))
            .finish(),
    }
}
