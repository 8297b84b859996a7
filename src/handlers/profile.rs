use crate::{
    auth::{AdminUser, AuthUser},
    errors::{AppError, AppResult},
    models::{ContactDetails, EmploymentDetails, Profile},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

/// Get the logged-in user's profile, creating a blank one on first access
#[utoipa::path(
    get,
    path = "/api/profile/me",
    responses(
        (status = 200, description = "Current profile", body = Profile),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.store.ensure_profile(auth.id).await?))
}

/// Update the logged-in user's contact details
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = ContactDetails,
    responses(
        (status = 200, description = "Profile saved", body = Profile),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_my_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<ContactDetails>,
) -> AppResult<Json<Profile>> {
    Ok(Json(state.store.update_contact_details(auth.id, body).await?))
}

/// Set an employee's job title and date of joining (admin)
#[utoipa::path(
    put,
    path = "/api/profile/{user_id}",
    request_body = EmploymentDetails,
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile saved", body = Profile),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn update_employment(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<EmploymentDetails>,
) -> AppResult<Json<Profile>> {
    state
        .store
        .find_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    Ok(Json(state.store.update_employment_details(user_id, body).await?))
}

/// Get any user's profile (admin)
#[utoipa::path(
    get,
    path = "/api/profile/user/{user_id}",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Profile", body = Profile),
        (status = 404, description = "Profile not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Profile"
)]
pub async fn get_user_profile(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Profile>> {
    let profile = state
        .store
        .find_profile(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile))
}
