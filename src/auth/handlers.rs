//! User HTTP handlers: registration, sign-in, and user CRUD.
//!
//! Passwords are hashed with bcrypt before storage and never serialized
//! back out. Signup and sign-in both answer with a fresh session token.

use axum::extract::{Path, State};
use bcrypt::{hash, verify, DEFAULT_COST};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::sessions::create_token;
use crate::auth::users::{UserRecord, UserResponse, UserStore};
use crate::error::AppError;
use crate::response::{ApiJson, ApiResponse};
use crate::server::config::AppConfig;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct EditUserRequest {
    pub name: String,
    pub email: String,
    /// When present, the password is re-hashed and replaced.
    pub password: Option<String>,
}

fn validate_email(email: &str) -> Result<(), AppError> {
    if !email.contains('@') {
        return Err(AppError::validation("invalid email format"));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < 8 {
        return Err(AppError::validation(
            "password must be at least 8 characters",
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST).map_err(|e| AppError::storage(format!("failed to hash password: {e}")))
}

/// POST /user
pub async fn create_user(
    State(store): State<UserStore>,
    State(config): State<AppConfig>,
    ApiJson(request): ApiJson<CreateUserRequest>,
) -> Result<ApiResponse, AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    validate_email(&request.email)?;
    validate_password(&request.password)?;

    let password_hash = hash_password(&request.password)?;
    let user = UserRecord::new(request.name, request.email, password_hash);

    store.insert_user(&user).await.map_err(|err| match err {
        AppError::Duplicate(_) => AppError::duplicate("email already registered"),
        other => other,
    })?;

    let token = create_token(user.id, &user.email, &config.jwt_secret)?;
    tracing::info!(user_id = %user.id, "user created");

    Ok(ApiResponse::created(
        "user created",
        serde_json::json!({ "user": UserResponse::from(&user), "token": token }),
    ))
}

/// POST /user/sign_in
pub async fn sign_in(
    State(store): State<UserStore>,
    State(config): State<AppConfig>,
    ApiJson(request): ApiJson<SignInRequest>,
) -> Result<ApiResponse, AppError> {
    validate_email(&request.email)?;

    let user = store
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| AppError::not_found("no user was found"))?;

    let matches = verify(&request.password, &user.password_hash)
        .map_err(|e| AppError::storage(format!("failed to verify password: {e}")))?;
    if !matches {
        return Err(AppError::unauthorized("wrong password"));
    }

    let token = create_token(user.id, &user.email, &config.jwt_secret)?;

    Ok(ApiResponse::ok(
        "signed in successfully",
        serde_json::json!({ "user": UserResponse::from(&user), "token": token }),
    ))
}

/// GET /user/{userId}
pub async fn get_user(
    State(store): State<UserStore>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let user = store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("user with specified id not found"))?;

    Ok(ApiResponse::ok(
        "user found",
        serde_json::json!({ "user": UserResponse::from(&user) }),
    ))
}

/// PUT /user/{userId}
pub async fn edit_user(
    State(store): State<UserStore>,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<EditUserRequest>,
) -> Result<ApiResponse, AppError> {
    let user_id = parse_user_id(&user_id)?;
    if request.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    validate_email(&request.email)?;

    let password_hash = match &request.password {
        Some(password) => {
            validate_password(password)?;
            Some(hash_password(password)?)
        }
        None => None,
    };

    let user = store
        .update_user(
            user_id,
            &request.name,
            &request.email,
            password_hash.as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::not_found("user with specified id not found"))?;

    Ok(ApiResponse::ok(
        "user updated",
        serde_json::json!({ "user": UserResponse::from(&user) }),
    ))
}

/// DELETE /user/{userId}
pub async fn delete_user(
    State(store): State<UserStore>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse, AppError> {
    let user_id = parse_user_id(&user_id)?;
    let deleted = store.delete_user(user_id).await?;
    if !deleted {
        return Err(AppError::not_found("user with specified id not found"));
    }

    Ok(ApiResponse::ok(
        "user deleted",
        serde_json::json!({}),
    ))
}

/// GET /users
pub async fn get_all_users(State(store): State<UserStore>) -> Result<ApiResponse, AppError> {
    let users = store.list_users().await?;
    let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();

    Ok(ApiResponse::ok(
        "users found",
        serde_json::json!({ "users": users }),
    ))
}

fn parse_user_id(raw: &str) -> Result<Uuid, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("invalid user id: {raw}")))
}
