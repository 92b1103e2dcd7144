use crate::auth::{create_jwt, hash_password, verify_password, Claims};
use crate::models::user::{self, Entity as User, Profile, PublicProfile};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sea_orm::*;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
pub struct SignupRequest {
    username: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    username: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
}

fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 || username.len() > 30 {
        return Err("Username must be between 3 and 30 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Username may only contain letters, digits, '_' and '-'");
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), &'static str> {
    let valid = email.contains('@')
        && !email.starts_with('@')
        && !email.ends_with('@')
        && email.rsplit('@').next().is_some_and(|d| d.contains('.'));
    if valid {
        Ok(())
    } else {
        Err("Invalid email address")
    }
}

fn db_error_response(e: DbErr) -> axum::response::Response {
    tracing::error!("Database error: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal server error" })),
    )
        .into_response()
}

/// Checks username availability, ignoring the caller's own row on
/// profile updates.
async fn username_taken(
    db: &DatabaseConnection,
    username: &str,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = User::find().filter(user::Column::Username.eq(username));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

async fn email_taken(
    db: &DatabaseConnection,
    email: &str,
    exclude_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = User::find().filter(user::Column::Email.eq(email));
    if let Some(id) = exclude_id {
        query = query.filter(user::Column::Id.ne(id));
    }
    Ok(query.one(db).await?.is_some())
}

pub async fn signup(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<SignupRequest>,
) -> impl IntoResponse {
    if let Err(msg) = validate_username(&payload.username) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
    }
    if let Err(msg) = validate_email(&payload.email) {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
    }
    if payload.password.len() < 6 {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Password must be at least 6 characters" })),
        )
            .into_response();
    }

    match username_taken(&db, &payload.username, None).await {
        Ok(false) => {}
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Username already taken" })),
            )
                .into_response()
        }
        Err(e) => return db_error_response(e),
    }
    match email_taken(&db, &payload.email, None).await {
        Ok(false) => {}
        Ok(true) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({ "error": "Email already registered" })),
            )
                .into_response()
        }
        Err(e) => return db_error_response(e),
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!("Password hashing failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response();
        }
    };

    let now = chrono::Utc::now().to_rfc3339();
    let new_user = user::ActiveModel {
        username: Set(payload.username),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };

    match new_user.insert(&db).await {
        Ok(model) => match create_jwt(model.id, &model.username) {
            Ok(token) => (
                StatusCode::CREATED,
                Json(json!({ "token": token, "user": Profile::from(model) })),
            )
                .into_response(),
            Err(e) => {
                tracing::error!("JWT creation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        },
        // Backstop for a concurrent signup racing past the probes above.
        Err(e) if e.to_string().contains("UNIQUE constraint failed") => (
            StatusCode::CONFLICT,
            Json(json!({ "error": "Username already taken" })),
        )
            .into_response(),
        Err(e) => db_error_response(e),
    }
}

pub async fn login(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    tracing::info!("Login attempt for user: {}", payload.username);

    let found = User::find()
        .filter(user::Column::Username.eq(&payload.username))
        .one(&db)
        .await;

    let found_user = match found {
        Ok(Some(u)) => u,
        _ => {
            tracing::warn!("User not found: {}", payload.username);
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid username or password" })),
            )
                .into_response();
        }
    };

    match verify_password(&payload.password, &found_user.password_hash) {
        Ok(true) => match create_jwt(found_user.id, &found_user.username) {
            Ok(token) => (
                StatusCode::OK,
                Json(json!({ "token": token, "user": Profile::from(found_user) })),
            )
                .into_response(),
            Err(e) => {
                tracing::error!("JWT creation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
        },
        _ => {
            tracing::warn!("Password verification failed for user: {}", found_user.username);
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid username or password" })),
            )
                .into_response()
        }
    }
}

pub async fn get_me(State(db): State<DatabaseConnection>, claims: Claims) -> impl IntoResponse {
    match User::find_by_id(claims.uid).one(&db).await {
        Ok(Some(model)) => {
            (StatusCode::OK, Json(json!({ "user": Profile::from(model) }))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => db_error_response(e),
    }
}

pub async fn update_profile(
    State(db): State<DatabaseConnection>,
    claims: Claims,
    Json(payload): Json<UpdateProfileRequest>,
) -> impl IntoResponse {
    if let Some(bio) = &payload.bio {
        if bio.len() > 500 {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Bio must be at most 500 characters" })),
            )
                .into_response();
        }
    }

    if let Some(username) = &payload.username {
        if let Err(msg) = validate_username(username) {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
        }
        match username_taken(&db, username, Some(claims.uid)).await {
            Ok(false) => {}
            Ok(true) => {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Username already taken" })),
                )
                    .into_response()
            }
            Err(e) => return db_error_response(e),
        }
    }

    if let Some(email) = &payload.email {
        if let Err(msg) = validate_email(email) {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response();
        }
        match email_taken(&db, email, Some(claims.uid)).await {
            Ok(false) => {}
            Ok(true) => {
                return (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Email already registered" })),
                )
                    .into_response()
            }
            Err(e) => return db_error_response(e),
        }
    }

    let existing = match User::find_by_id(claims.uid).one(&db).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "User not found" })),
            )
                .into_response()
        }
        Err(e) => return db_error_response(e),
    };

    let mut active: user::ActiveModel = existing.into();
    if let Some(username) = payload.username {
        active.username = Set(username);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(avatar_url) = payload.avatar_url {
        active.avatar_url = Set(Some(avatar_url));
    }
    if let Some(bio) = payload.bio {
        active.bio = Set(Some(bio));
    }
    active.updated_at = Set(chrono::Utc::now().to_rfc3339());

    match active.update(&db).await {
        Ok(model) => {
            (StatusCode::OK, Json(json!({ "user": Profile::from(model) }))).into_response()
        }
        Err(e) => db_error_response(e),
    }
}

pub async fn get_public_profile(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> impl IntoResponse {
    match User::find_by_id(id).one(&db).await {
        Ok(Some(model)) => (
            StatusCode::OK,
            Json(json!({ "user": PublicProfile::from(model) })),
        )
            .into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "User not found" })),
        )
            .into_response(),
        Err(e) => db_error_response(e),
    }
}
