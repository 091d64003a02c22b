//! User management routes.
//!
//! Accounts are created and edited by the admin only; every role may list
//! active colleagues as routing recipients.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::{PageQuery, auth::user_info, optional, parse_filter, required};
use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::{AuthUser, require_role},
};
use amanat_core::auth::{Role, hash_password, validate_password_strength};
use amanat_db::repositories::{CreateUserInput, UpdateUserInput, UserFilter, UserRepository};
use amanat_shared::{AppError, auth::UserInfo, types::PageResponse};

/// Creates the user routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/recipients", get(list_recipients))
        .route("/users/{user_id}", patch(update_user))
}

/// Query parameters for listing users.
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    /// Filter by role.
    pub role: Option<String>,
    /// Filter by active flag.
    pub is_active: Option<bool>,
    /// Search in name or email.
    pub search: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Page size.
    pub per_page: Option<u32>,
}

/// Request body for creating a user.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Login email.
    pub email: String,
    /// Initial password.
    pub password: String,
    /// Display name.
    pub full_name: String,
    /// Role (`ADMIN`, `KETUA_PENGURUS`, ...).
    pub role: String,
}

/// Request body for updating a user.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    /// New display name.
    pub full_name: Option<String>,
    /// New role.
    pub role: Option<String>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

/// A routing recipient.
#[derive(Debug, Serialize)]
pub struct RecipientResponse {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// Role.
    pub role: String,
    /// Role title for pickers.
    pub title: &'static str,
}

fn parse_role(value: &str) -> Result<Role, ApiError> {
    Role::parse(value.trim()).ok_or_else(|| ApiError::validation(format!("invalid role: {value}")))
}

/// GET /users - List users (admin).
async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListUsersQuery>,
) -> ApiResult<Json<PageResponse<UserInfo>>> {
    require_role(&auth, &[Role::Admin])?;

    let filter = UserFilter {
        role: parse_filter("role", query.role.as_deref(), Role::parse)?,
        is_active: query.is_active,
        search: query.search,
    };
    let page = PageQuery {
        page: query.page,
        per_page: query.per_page,
    }
    .to_request();

    let users = UserRepository::new((*state.db).clone())
        .list(&filter, &page)
        .await?;

    Ok(Json(users.map(user_info)))
}

/// POST /users - Create a user (admin).
async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    require_role(&auth, &[Role::Admin])?;

    let email = required("email", &payload.email)?.to_lowercase();
    if !email.contains('@') {
        return Err(ApiError::validation("email is invalid"));
    }
    let full_name = required("full_name", &payload.full_name)?;
    let role = parse_role(&payload.role)?;
    validate_password_strength(&payload.password)
        .map_err(|e| ApiError::validation(e.to_string()))?;

    let repo = UserRepository::new((*state.db).clone());
    if repo.email_exists(&email).await? {
        return Err(AppError::Conflict(format!("email {email} is already registered")).into());
    }

    let password_hash =
        hash_password(&payload.password).map_err(|e| AppError::Internal(e.to_string()))?;
    let user = repo
        .create(CreateUserInput {
            email,
            password_hash,
            full_name,
            role,
        })
        .await?;

    info!(user_id = %user.id, role = %role, created_by = %auth.user_id(), "User created");

    Ok((StatusCode::CREATED, Json(user_info(user))))
}

/// PATCH /users/{user_id} - Update name, role or active flag (admin).
async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserInfo>> {
    require_role(&auth, &[Role::Admin])?;

    if user_id == auth.user_id() && payload.is_active == Some(false) {
        return Err(ApiError::validation("you cannot deactivate your own account"));
    }

    let input = UpdateUserInput {
        full_name: optional(payload.full_name),
        role: payload.role.as_deref().map(parse_role).transpose()?,
        is_active: payload.is_active,
    };

    let user = UserRepository::new((*state.db).clone())
        .update(user_id, input)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User not found: {user_id}")))?;

    info!(user_id = %user.id, updated_by = %auth.user_id(), "User updated");

    Ok(Json(user_info(user)))
}

/// GET /users/recipients - Active users the caller may route letters to.
async fn list_recipients(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<RecipientResponse>>> {
    let users = UserRepository::new((*state.db).clone())
        .list_recipients(auth.user_id())
        .await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| {
                let role = Role::from(user.role);
                RecipientResponse {
                    id: user.id,
                    full_name: user.full_name,
                    role: role.as_str().to_string(),
                    title: role.title(),
                }
            })
            .collect(),
    ))
}
