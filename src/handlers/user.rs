use crate::{
    auth::{AdminUser, AuthUser, generate_token},
    errors::{AppError, AppResult},
    models::{
        AuthResponse, LoginRequest, MessageResponse, NewUser, RegisterRequest, Role,
        SetRoleRequest, UpdateMeRequest, UpdatePasswordRequest, UserPublic, UserWithSalary,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bcrypt::{hash, verify};
use tracing::info;
use uuid::Uuid;

fn require_non_empty(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(())
}

/// Register a new user. Employees wait for admin approval before they can log in.
#[utoipa::path(
    post,
    path = "/api/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Email already registered"),
    ),
    tag = "Users"
)]
pub async fn register_user(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    require_non_empty("fullName", &body.full_name)?;
    require_non_empty("email", &body.email)?;
    require_non_empty("password", &body.password)?;

    if state.store.find_user_by_email(&body.email).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "User with email '{}' already exists",
            body.email
        )));
    }

    let password_hash = hash(&body.password, state.config.bcrypt_cost)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let role = body.role.unwrap_or(Role::Employee);
    let user = state
        .store
        .create_user(NewUser {
            full_name: body.full_name.trim().to_string(),
            email: body.email,
            password_hash,
            role,
            is_approved: role == Role::Admin,
        })
        .await?;

    info!(user = %user.id, ?role, "User registered");

    let message = match role {
        Role::Employee => "Registration successful! Your account is awaiting admin approval.",
        Role::Admin => "Admin account created successfully!",
    };
    Ok((StatusCode::CREATED, Json(MessageResponse::new(message))))
}

/// Log in and receive a bearer token
#[utoipa::path(
    post,
    path = "/api/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account pending approval"),
    ),
    tag = "Users"
)]
pub async fn login_user(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = state
        .store
        .find_user_by_email(&body.email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify(&body.password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    if !user.is_approved {
        return Err(AppError::Forbidden(
            "Your account is pending admin approval.".to_string(),
        ));
    }

    let token = generate_token(
        user.id,
        user.role,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// List every user with their base salary (admin)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users", body = Vec<UserWithSalary>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserWithSalary>>> {
    Ok(Json(state.store.list_users().await?))
}

/// List employees awaiting approval (admin)
#[utoipa::path(
    get,
    path = "/api/users/pending",
    responses(
        (status = 200, description = "Unapproved employees", body = Vec<UserPublic>),
        (status = 403, description = "Not an admin"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_pending_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserPublic>>> {
    let users = state.store.list_pending_users().await?;
    Ok(Json(users.into_iter().map(UserPublic::from).collect()))
}

/// Get the logged-in user
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = UserPublic),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_me(auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<UserPublic>> {
    let user = state
        .store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Update the logged-in user's display name
#[utoipa::path(
    put,
    path = "/api/users/me",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Updated user", body = UserPublic),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_me(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> AppResult<Json<UserPublic>> {
    require_non_empty("fullName", &body.full_name)?;

    let user = state
        .store
        .set_full_name(auth.id, body.full_name.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Change the logged-in user's password
#[utoipa::path(
    put,
    path = "/api/users/update-password",
    request_body = UpdatePasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Current password is wrong"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<UpdatePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    require_non_empty("newPassword", &body.new_password)?;

    let user = state
        .store
        .find_user(auth.id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let valid = verify(&body.current_password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        return Err(AppError::BadRequest("Incorrect current password".to_string()));
    }

    let password_hash = hash(&body.new_password, state.config.bcrypt_cost)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    state.store.set_password_hash(user.id, &password_hash).await?;

    Ok(Json(MessageResponse::new("Password updated successfully")))
}

/// Approve a pending registration (admin)
#[utoipa::path(
    put,
    path = "/api/users/{id}/approve",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User approved", body = UserPublic),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn approve_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserPublic>> {
    let user = state
        .store
        .approve_user(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    info!(user = %user.id, "User approved");
    Ok(Json(user.into()))
}

/// Change a user's role (admin)
#[utoipa::path(
    put,
    path = "/api/users/{id}/role",
    request_body = SetRoleRequest,
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Role updated", body = UserPublic),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn set_user_role(
    _admin: AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetRoleRequest>,
) -> AppResult<Json<UserPublic>> {
    let user = state
        .store
        .set_user_role(id, body.role)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))?;

    Ok(Json(user.into()))
}

/// Delete a user with their salary, profile and payslips (admin)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User removed", body = MessageResponse),
        (status = 400, description = "Cannot delete own account"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    if admin.id == id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account.".to_string(),
        ));
    }

    if !state.store.delete_user(id).await? {
        return Err(AppError::NotFound(format!("User {} not found", id)));
    }

    info!(user = %id, "User removed");
    Ok(Json(MessageResponse::new("User removed")))
}
