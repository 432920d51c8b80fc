use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};

use super::handlers;
use super::middleware::{SessionContext, expose_store, require_session};
use crate::store::Store;

/// Exposes the session store to every route in `router`.
///
/// Apply this last, after [`require_auth`] and any merges, so it runs
/// before the gate on every request.
pub fn with_store<St, T>(router: Router<T>, context: SessionContext<St>) -> Router<T>
where
    St: Store + 'static,
    T: Clone + Send + Sync + 'static,
{
    router.layer(from_fn_with_state(context, expose_store::<St>))
}

/// Requires a valid session for every route currently in `router`.
///
/// Routes added afterwards are not gated.
pub fn require_auth<St, T>(router: Router<T>) -> Router<T>
where
    St: Store + 'static,
    T: Clone + Send + Sync + 'static,
{
    router.route_layer(from_fn(require_session::<St>))
}

/// Authenticated session routes.
///
/// - `POST /logout` - remove the session and clear the cookie
/// - `GET /session` - describe the current session
///
/// Already gated with [`require_auth`]; wrap the final router with
/// [`with_store`].
pub fn session_routes<St, T>() -> Router<T>
where
    St: Store + 'static,
    T: Clone + Send + Sync + 'static,
{
    require_auth::<St, T>(
        Router::new()
            .route("/logout", post(handlers::logout::<St>))
            .route("/session", get(handlers::current_session::<St::Session>)),
    )
}
