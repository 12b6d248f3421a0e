//! Profile handlers

use crate::state::{AppState, ServerEvent};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use shelfscan_core::error::RemoteError;
use shelfscan_core::remote::{validate_user_id, RemoteProfileStore};
use shelfscan_core::{Profile, RemoteBook};

type ApiError = (StatusCode, String);

fn remote_error(err: RemoteError) -> ApiError {
    match err {
        RemoteError::Rejected(msg) => (StatusCode::BAD_REQUEST, msg),
        other => {
            tracing::error!("Profile storage failed: {}", other);
            (StatusCode::INTERNAL_SERVER_ERROR, other.to_string())
        }
    }
}

fn check_user_id(user_id: &str) -> Result<(), ApiError> {
    validate_user_id(user_id).map_err(remote_error)
}

/// Users with a stored profile
#[derive(Debug, Serialize)]
pub struct ProfileListResponse {
    pub users: Vec<String>,
}

pub async fn list_profiles(
    State(state): State<AppState>,
) -> Result<Json<ProfileListResponse>, ApiError> {
    let mut users = state.profiles.user_ids().await.map_err(remote_error)?;
    users.sort();
    Ok(Json(ProfileListResponse { users }))
}

/// Get a user's profile; unknown users get an empty one
pub async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    check_user_id(&user_id)?;
    let profile = state
        .profiles
        .get_profile(&user_id)
        .await
        .map_err(remote_error)?;
    Ok(Json(profile))
}

/// Response to a book list replacement
#[derive(Debug, Serialize)]
pub struct SetBooksResponse {
    pub user_id: String,
    pub books: usize,
}

/// Replace a user's book list
pub async fn put_books(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(books): Json<Vec<RemoteBook>>,
) -> Result<Json<SetBooksResponse>, ApiError> {
    check_user_id(&user_id)?;
    let count = books.len();

    if let Err(e) = state.profiles.set_books(&user_id, books).await {
        state.broadcast(ServerEvent::Error {
            message: format!("Storing books for {} failed", user_id),
        });
        return Err(remote_error(e));
    }

    tracing::info!(user_id = %user_id, books = count, "Replaced book list");
    state.broadcast(ServerEvent::BooksUpdated {
        user_id: user_id.clone(),
        count,
    });

    Ok(Json(SetBooksResponse {
        user_id,
        books: count,
    }))
}

/// Delete a user's profile
pub async fn delete_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    check_user_id(&user_id)?;
    let existed = state
        .profiles
        .delete_profile(&user_id)
        .await
        .map_err(remote_error)?;

    if !existed {
        return Err((StatusCode::NOT_FOUND, format!("No profile for {}", user_id)));
    }

    state.broadcast(ServerEvent::ProfileDeleted { user_id });
    Ok(StatusCode::NO_CONTENT)
}
