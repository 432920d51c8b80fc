#![allow(
    clippy::print_stdout,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_docs_in_private_items
)]

//! Axum Session Server Example
//!
//! Cookie sessions backed by the in-memory store.
//!
//! Run with: `cargo run --example session_server --features axum_api`
//!
//! Test endpoints:
//!   curl -i -X POST http://localhost:8080/login \
//!     -H "Content-Type: application/json" \
//!     -d '{"user_id": 7}'
//!   curl -b "SessionId=<id>" http://localhost:8080/private
//!   curl -b "SessionId=<id>" http://localhost:8080/auth/session
//!   curl -b "SessionId=<id>" -X POST http://localhost:8080/auth/logout

use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use sessionward::api::axum::{
    AppError, CurrentSession, SessionContext, SessionCookie, require_auth, session_routes,
    with_store,
};
use sessionward::{MemoryStore, SessionConfig, UserSession};
use tokio::net::TcpListener;

type Sessions = MemoryStore<UserSession>;

#[derive(Deserialize)]
struct LoginRequest {
    user_id: i64,
}

async fn login(
    context: SessionContext<Sessions>,
    Json(body): Json<LoginRequest>,
) -> Result<SessionCookie, AppError> {
    let session = UserSession::new(body.user_id, context.config().session_lifetime);
    context.login(session).await
}

async fn private(CurrentSession(session): CurrentSession<UserSession>) -> String {
    format!("hello, user {}", session.user_id)
}

#[tokio::main]
async fn main() {
    // Plain HTTP on localhost, so the cookie cannot be Secure
    let config = SessionConfig {
        cookie_secure: false,
        ..Default::default()
    };
    let context = SessionContext::new(Sessions::new(), config).expect("invalid session config");

    let protected = require_auth::<Sessions, ()>(Router::new().route("/private", get(private)));

    let app = with_store(
        Router::new()
            .route("/login", post(login))
            .merge(protected)
            .nest("/auth", session_routes::<Sessions, ()>()),
        context,
    );

    println!("Starting session server on http://localhost:8080");
    println!("Endpoints:");
    println!("  POST /login         - Start a session (sets SessionId cookie)");
    println!("  GET  /private       - Requires a session");
    println!("  GET  /auth/session  - Describe the current session");
    println!("  POST /auth/logout   - End the session");

    let listener = TcpListener::bind("127.0.0.1:8080").await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
