//! Handlers for the `/users` validation and signup endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument};
use utoipa::ToSchema;
use zxcvbn::zxcvbn;

use crate::api::store::{User, UserStore};

#[derive(ToSchema, Deserialize, Debug)]
pub struct UsernameQuery {
    username: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct EmailQuery {
    email: String,
}

#[derive(ToSchema, Deserialize)]
pub struct PasswordQuery {
    password: Option<String>,
}

#[derive(ToSchema, Serialize, Debug)]
pub struct PasswordStrengthBody {
    score: u8,
    warning: String,
    suggestions: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/users/username-taken",
    request_body = UsernameQuery,
    responses(
        (status = 200, description = "Whether the username is already taken"),
        (status = 400, description = "Missing payload", body = String)
    ),
    tag = "users",
)]
#[instrument(skip(store))]
pub async fn username_taken(
    store: Extension<UserStore>,
    payload: Option<Json<UsernameQuery>>,
) -> impl IntoResponse {
    let Some(Json(query)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let taken = store.username_taken(&query.username).await;

    debug!("username {:?} taken: {}", query.username, taken);

    Json(json!({ "usernameTaken": taken })).into_response()
}

#[utoipa::path(
    post,
    path = "/users/email-taken",
    request_body = EmailQuery,
    responses(
        (status = 200, description = "Whether the email is already taken"),
        (status = 400, description = "Missing payload", body = String)
    ),
    tag = "users",
)]
#[instrument(skip(store))]
pub async fn email_taken(
    store: Extension<UserStore>,
    payload: Option<Json<EmailQuery>>,
) -> impl IntoResponse {
    let Some(Json(query)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let taken = store.email_taken(&query.email).await;

    debug!("email {:?} taken: {}", query.email, taken);

    Json(json!({ "emailTaken": taken })).into_response()
}

#[utoipa::path(
    post,
    path = "/users/password-strength",
    request_body = PasswordQuery,
    responses(
        (status = 200, description = "Password strength result", body = PasswordStrengthBody),
        (status = 400, description = "Missing password")
    ),
    tag = "users",
)]
#[instrument(skip_all)]
pub async fn password_strength(payload: Option<Json<PasswordQuery>>) -> impl IntoResponse {
    let password = payload
        .and_then(|Json(query)| query.password)
        .filter(|password| !password.is_empty());

    let Some(password) = password else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Missing password" })),
        )
            .into_response();
    };

    // The scoring algorithm itself is an external concern; its result is
    // returned verbatim.
    let entropy = zxcvbn(&password, &[]);

    let (warning, suggestions) = entropy.feedback().map_or_else(
        || (String::new(), Vec::new()),
        |feedback| {
            (
                feedback
                    .warning()
                    .map(|warning| warning.to_string())
                    .unwrap_or_default(),
                feedback
                    .suggestions()
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
            )
        },
    );

    Json(PasswordStrengthBody {
        score: entropy.score() as u8,
        warning,
        suggestions,
    })
    .into_response()
}

#[utoipa::path(
    post,
    path = "/users/signup",
    request_body = User,
    responses(
        (status = 200, description = "User appended to the store"),
        (status = 400, description = "Missing payload", body = String)
    ),
    tag = "users",
)]
#[instrument(skip_all)]
pub async fn signup(
    store: Extension<UserStore>,
    payload: Option<Json<User>>,
) -> impl IntoResponse {
    let Some(Json(user)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    debug!("signup for username {:?}", user.username);

    // No uniqueness check, no validation, no hashing. The availability
    // endpoints and this insert are separate calls on purpose.
    let users = store.insert(user).await;

    Json(json!({
        "success": true,
        "message": "User added successfully!",
        "users": users,
    }))
    .into_response()
}

/// Catch-all for unmatched routes.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "success": false, "message": "This route is not available" })),
    )
}
