//! Validation query service: HTTP surface over the in-memory user store.

use anyhow::Result;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    routing::{get, post},
    Extension, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::OpenApi;

pub mod handlers;
pub mod store;

use handlers::{health, users};
use store::UserStore;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::users::username_taken,
        handlers::users::email_taken,
        handlers::users::password_strength,
        handlers::users::signup,
    ),
    components(schemas(
        store::User,
        handlers::users::UsernameQuery,
        handlers::users::EmailQuery,
        handlers::users::PasswordQuery,
        handlers::users::PasswordStrengthBody,
    )),
    tags(
        (name = "users", description = "Mock signup and availability checks"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router around a user store.
///
/// Kept free of the outer middleware so tests can drive it directly
/// with `tower::ServiceExt::oneshot`.
#[must_use]
pub fn app(store: UserStore) -> Router {
    let users = Router::new()
        .route("/username-taken", post(users::username_taken))
        .route("/email-taken", post(users::email_taken))
        .route("/password-strength", post(users::password_strength))
        .route("/signup", post(users::signup));

    Router::new()
        .route("/health", get(health::health))
        .nest("/users", users)
        .fallback(users::not_found)
        .layer(Extension(store))
}

/// Serve the API.
///
/// # Errors
/// Returns an error if the server fails to start
pub async fn new(port: u16) -> Result<()> {
    let cors = CorsLayer::new()
        // allow `GET` and `POST` when accessing the resource
        .allow_methods([Method::GET, Method::POST])
        // allow requests from any origin
        .allow_origin(Any);

    let app = app(UserStore::seeded()).layer(
        ServiceBuilder::new()
            .layer(SetRequestHeaderLayer::if_not_present(
                HeaderName::from_static("x-request-id"),
                |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
            ))
            .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                "x-request-id",
            )))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(cors),
    );

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}
