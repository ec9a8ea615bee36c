use axum::{
    Extension, Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::{
    adapters::http::{
        app_state::AppState,
        middleware::{CurrentUser, require_bearer},
    },
    app_error::{AppError, AppResult},
    application::validators::{
        MAX_PASSWORD_BYTES, MIN_PASSWORD_LENGTH, is_valid_email, is_valid_name, is_valid_password,
    },
    use_cases::user::UserProfile,
};

#[derive(Deserialize)]
struct RegisterPayload {
    name: String,
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct TokenPayload {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct UserResponse {
    user: UserProfile,
}

#[derive(Serialize)]
struct TokenResponse {
    user: UserProfile,
    access_token: String,
    token_type: &'static str,
    expires_at: i64,
}

pub fn router(app_state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/blacklist-access-token", post(blacklist_access_token))
        .route("/me", get(me))
        .route_layer(middleware::from_fn_with_state(app_state, require_bearer));

    Router::new()
        .route("/register", post(register))
        .route("/generate-access-token", post(generate_access_token))
        .merge(protected)
}

async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> AppResult<impl IntoResponse> {
    if !is_valid_name(&payload.name) {
        return Err(AppError::InvalidInput("name is required".into()));
    }
    if !is_valid_email(&payload.email) {
        return Err(AppError::InvalidInput("email is not valid".into()));
    }
    if !is_valid_password(&payload.password) {
        return Err(AppError::InvalidInput(format!(
            "password must be between {MIN_PASSWORD_LENGTH} characters and {MAX_PASSWORD_BYTES} bytes"
        )));
    }

    let user = app_state
        .auth_use_cases
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

async fn generate_access_token(
    State(app_state): State<AppState>,
    Json(payload): Json<TokenPayload>,
) -> AppResult<impl IntoResponse> {
    if !is_valid_email(&payload.email) {
        return Err(AppError::InvalidInput("email is not valid".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::InvalidInput("password is required".into()));
    }

    let session = app_state
        .auth_use_cases
        .authenticate(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse {
        user: session.user,
        access_token: session.access_token,
        token_type: "bearer",
        expires_at: session.expires_at,
    }))
}

async fn blacklist_access_token(
    State(app_state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    app_state.auth_use_cases.revoke(&current.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn me(Extension(current): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse { user: current.user })
}
