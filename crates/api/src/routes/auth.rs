//! Authentication routes: login and the current user.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::{error, info};

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
};
use amanat_core::auth::{Role, verify_password};
use amanat_db::{UserRepository, entities::users};
use amanat_shared::{
    AppError,
    auth::{LoginRequest, LoginResponse, UserInfo},
};

/// Creates the public auth router.
pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Creates the auth routes that need an authenticated user.
pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

fn invalid_credentials() -> ApiError {
    AppError::Unauthorized("Invalid email or password".to_string()).into()
}

/// POST /auth/login - Authenticate user and return an access token.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let user_repo = UserRepository::new((*state.db).clone());

    let Some(user) = user_repo.find_by_email(&payload.email).await? else {
        info!(email = %payload.email, "Login attempt for non-existent user");
        return Err(invalid_credentials());
    };

    if !user.is_active {
        return Err(AppError::Unauthorized("This account has been disabled".to_string()).into());
    }

    match verify_password(&payload.password, &user.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(user_id = %user.id, "Failed login attempt - invalid password");
            return Err(invalid_credentials());
        }
        Err(e) => {
            error!(user_id = %user.id, error = %e, "Password verification error");
            return Err(AppError::Internal(e.to_string()).into());
        }
    }

    let role = Role::from(user.role);
    let access_token = state
        .jwt_service
        .generate_access_token(user.id, role.as_str())
        .map_err(|e| AppError::Internal(e.to_string()))?;

    info!(user_id = %user.id, role = %role, "User logged in successfully");

    let response = LoginResponse {
        user: user_info(user),
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt_service.access_token_expires_in(),
    };

    Ok((StatusCode::OK, Json(response)))
}

/// GET /auth/me - The authenticated user's profile.
async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<UserInfo>> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(auth.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(user_info(user)))
}

/// Converts a user row into its public shape.
pub(crate) fn user_info(user: users::Model) -> UserInfo {
    UserInfo {
        id: user.id,
        email: user.email,
        full_name: user.full_name,
        role: Role::from(user.role).as_str().to_string(),
        is_active: user.is_active,
    }
}
