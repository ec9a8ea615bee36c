use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{
    adapters::http::app_state::AppState, app_error::AppError, use_cases::user::UserProfile,
};

/// Caller identity attached to requests that passed [`require_bearer`].
#[derive(Clone)]
pub struct CurrentUser {
    pub user: UserProfile,
    /// Raw bearer token, needed to revoke it.
    pub token: String,
}

pub async fn require_bearer(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(Authorization(bearer)) = request.headers().typed_get::<Authorization<Bearer>>()
    else {
        tracing::debug!("Missing or malformed Authorization header");
        return Err(AppError::InvalidToken);
    };
    let token = bearer.token().trim().to_owned();

    let user = app_state.auth_use_cases.verify_token(&token).await?;

    request
        .extensions_mut()
        .insert(CurrentUser { user, token });

    Ok(next.run(request).await)
}
