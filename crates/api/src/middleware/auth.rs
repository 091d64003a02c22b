//! Authentication middleware for protected routes.
//!
//! The token only names the user. Every request reloads the user row, so a
//! deactivated account or a changed role takes effect immediately.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use amanat_core::auth::{Actor, Role};
use amanat_db::UserRepository;
use amanat_shared::{Claims, JwtError};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn reject(status: StatusCode, error: &str, message: &str) -> Response {
    (status, Json(json!({ "error": error, "message": message }))).into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Loads the user and rejects unknown or inactive accounts
/// 4. Stores the resulting `AuthUser` in request extensions
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return reject(
            StatusCode::UNAUTHORIZED,
            "MISSING_TOKEN",
            "Authorization header with Bearer token is required",
        );
    };

    let claims = match state.jwt_service.validate_token(token) {
        Ok(claims) => claims,
        Err(JwtError::Expired) => {
            return reject(StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED", "Token has expired");
        }
        Err(_) => {
            return reject(
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or malformed token",
            );
        }
    };

    let user = match UserRepository::new((*state.db).clone())
        .find_by_id(claims.user_id())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!(user_id = %claims.user_id(), "Token for unknown user");
            return reject(StatusCode::UNAUTHORIZED, "INVALID_TOKEN", "Unknown user");
        }
        Err(e) => {
            error!(error = %e, "Database error during authentication");
            return reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An error occurred",
            );
        }
    };

    if !user.is_active {
        return reject(
            StatusCode::UNAUTHORIZED,
            "ACCOUNT_DISABLED",
            "This account has been disabled",
        );
    }

    request.extensions_mut().insert(AuthUser {
        actor: Actor::new(user.id, user.role.into()),
        claims,
    });
    next.run(request).await
}

/// Extractor for the authenticated user.
///
/// ```ignore
/// async fn handler(auth: AuthUser) -> impl IntoResponse {
///     let actor = auth.actor();
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    actor: Actor,
    claims: Claims,
}

impl AuthUser {
    /// Builds an authenticated user directly.
    #[must_use]
    pub const fn new(actor: Actor, claims: Claims) -> Self {
        Self { actor, claims }
    }

    /// Returns the acting identity with the role loaded from the database.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        self.actor
    }

    /// Returns the user ID.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.actor.id
    }

    /// Returns the user's current role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.actor.role
    }

    /// Returns the token claims.
    #[must_use]
    pub const fn claims(&self) -> &Claims {
        &self.claims
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "UNAUTHORIZED",
                    "message": "Authentication required"
                })),
            )
        })
    }
}

/// Checks the acting role against an endpoint's allow-list.
///
/// # Errors
///
/// Returns a 403 if the role is not listed.
pub fn require_role(auth: &AuthUser, allowed: &[Role]) -> Result<(), ApiError> {
    if auth.actor.has_any_role(allowed) {
        Ok(())
    } else {
        Err(ApiError::forbidden(format!(
            "role {} may not perform this action",
            auth.role()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn auth(role: Role) -> AuthUser {
        let id = Uuid::new_v4();
        AuthUser::new(
            Actor::new(id, role),
            Claims::new(id, role.as_str(), chrono::Utc::now()),
        )
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[rstest]
    #[case(Role::Admin, &[Role::Admin], true)]
    #[case(Role::KabagUmum, &[Role::Admin], false)]
    #[case(Role::KetuaPengurus, &[Role::KetuaPengurus], true)]
    #[case(Role::KetuaPengurus, &Role::ALL_BUT_TOP, false)]
    #[case(Role::BendaharaPengurus, &Role::ALL_BUT_TOP, true)]
    fn test_require_role(#[case] role: Role, #[case] allowed: &[Role], #[case] ok: bool) {
        let result = require_role(&auth(role), allowed);
        assert_eq!(result.is_ok(), ok);
        if let Err(e) = result {
            assert_eq!(e.status(), StatusCode::FORBIDDEN);
        }
    }
}
