//! HTTP handlers for session endpoints.
//!
//! Login is left to the application, since only it knows how to build a
//! session; call [`SessionContext::login`] from your own handler.

use axum::Json;
use axum::response::IntoResponse;

use super::error::AppError;
use super::middleware::{CurrentSession, SessionContext};
use crate::api::{MessageResponse, SessionResponse};
use crate::session::Session;
use crate::store::Store;

/// Remove the current session and clear its cookie.
///
/// POST /logout
pub async fn logout<St>(
    context: SessionContext<St>,
    CurrentSession(session): CurrentSession<St::Session>,
) -> Result<impl IntoResponse, AppError>
where
    St: Store + 'static,
{
    let cookie = context.logout(&session).await?;

    Ok((
        cookie,
        Json(MessageResponse {
            message: "Successfully logged out".to_owned(),
        }),
    ))
}

/// Describe the current session.
///
/// GET /session
pub async fn current_session<S>(CurrentSession(session): CurrentSession<S>) -> Json<SessionResponse>
where
    S: Session,
{
    Json(SessionResponse {
        id: session.id().to_owned(),
        out_of_date: session.is_out_of_date(),
    })
}
