//! HTTP handlers for authentication endpoints

use axum::{extract::State, Extension, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::AuthUser;
use crate::services::auth::{AuthService, AuthTokens, CreateUserInput, LoginInput, UserView};
use crate::AppState;
use shared::models::Role;

#[derive(Debug, Deserialize)]
pub struct RefreshInput {
    pub refresh_token: String,
}

/// Log in with username and password
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, &state.config);
    let tokens = service.login(input).await?;
    Ok(Json(tokens))
}

/// Exchange a refresh token for a new token pair
pub async fn refresh(
    State(state): State<AppState>,
    Json(input): Json<RefreshInput>,
) -> AppResult<Json<AuthTokens>> {
    let service = AuthService::new(state.db, &state.config);
    let tokens = service.refresh(&input.refresh_token).await?;
    Ok(Json(tokens))
}

/// Create a staff account (admin only)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<Json<UserView>> {
    auth.require_role(&[Role::Admin])?;
    let service = AuthService::new(state.db, &state.config);
    let user = service.create_user(input).await?;
    Ok(Json(user))
}

/// List staff accounts (admin only)
pub async fn list_users(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> AppResult<Json<Vec<UserView>>> {
    auth.require_role(&[Role::Admin])?;
    let service = AuthService::new(state.db, &state.config);
    let users = service.list_users().await?;
    Ok(Json(users))
}
