//! Authentication endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::Permissions,
};

use super::AuthenticatedUser;

/// Login request
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login response with bearer token
#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserInfo,
}

/// Authenticated user info
#[derive(Serialize, ToSchema)]
pub struct UserInfo {
    pub id: i32,
    pub login: String,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub permissions: Permissions,
}

/// Query parameters on the login form route
#[derive(Deserialize, ToSchema)]
pub struct LoginFormQuery {
    /// Path the client came from; echoed back so it can resume there
    pub next: Option<String>,
}

/// Login form data for clients that landed here via a redirect
#[derive(Serialize, ToSchema)]
pub struct LoginFormResponse {
    pub message: String,
    pub next: Option<String>,
}

/// Login form endpoint. Anonymous requests to gated routes are
/// redirected here with a `next` parameter.
#[utoipa::path(
    get,
    path = "/auth/login",
    tag = "auth",
    params(
        ("next" = Option<String>, Query, description = "Path to resume after login")
    ),
    responses(
        (status = 200, description = "Login instructions", body = LoginFormResponse)
    )
)]
pub async fn login_form(Query(query): Query<LoginFormQuery>) -> Json<LoginFormResponse> {
    Json(LoginFormResponse {
        message: "POST credentials to this route to obtain a token".to_string(),
        next: query.next,
    })
}

/// Authenticate and obtain a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let (token, user) = state
        .services
        .auth
        .authenticate(&request.login, &request.password)
        .await?;

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        user: UserInfo {
            id: user.id,
            login: user.login.clone(),
            firstname: user.firstname.clone(),
            lastname: user.lastname.clone(),
            permissions: user.permissions(),
        },
    }))
}

/// Get the authenticated identity
#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = UserInfo),
        (status = 303, description = "Not authenticated, redirected to login")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<UserInfo>> {
    let user = state.services.auth.get_user(claims.user_id).await?;

    Ok(Json(UserInfo {
        id: user.id,
        login: user.login.clone(),
        firstname: user.firstname.clone(),
        lastname: user.lastname.clone(),
        permissions: user.permissions(),
    }))
}
