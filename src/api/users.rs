use axum::{extract::State, Json};
use std::sync::Arc;

use crate::auth::{AdminUser, CurrentUser};
use crate::db::{self, StoreError, UserResponse};
use crate::AppState;

use super::activities::{DataResponse, ListResponse};
use super::error::ApiError;

/// The stored profile of the signed-in user
pub async fn me(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<DataResponse<UserResponse>>, ApiError> {
    let profile = match db::users::get(&state.db, &user.id).await {
        Ok(profile) => profile,
        // The account was removed after the session was issued
        Err(StoreError::NotFound) => return Err(ApiError::unauthorized("Authentication required")),
        Err(e) => return Err(e.into()),
    };

    Ok(Json(DataResponse {
        success: true,
        message: None,
        data: profile,
    }))
}

/// All accounts, without password hashes. Admin only.
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<ListResponse<UserResponse>>, ApiError> {
    let users = db::users::list(&state.db).await?;
    Ok(Json(ListResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}
