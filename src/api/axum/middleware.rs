//! Middleware and extractors that thread sessions through a request.
//!
//! Two units, which must be layered in this order:
//!
//! 1. [`expose_store`] puts a [`SessionContext`] into the request extensions.
//! 2. [`require_session`] authenticates the request against that context
//!    and, on success, adds a [`CurrentSession`] for the handler.
//!
//! Layering the store unit with `Router::layer` and the gate with
//! `Router::route_layer` (see [`with_store`](super::with_store) and
//! [`require_auth`](super::require_auth)) gets the order right.

use std::fmt;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use super::cookie::{SessionCookie, extract_session_cookie, is_cookie_value};
use super::error::AppError;
use crate::actions::{LoginAction, LogoutAction};
use crate::config::SessionConfig;
use crate::gate::authenticate;
use crate::session::Session;
use crate::store::Store;
use crate::AuthError;

/// Per-request view of the session store and cookie settings.
///
/// Cloning is cheap; every request shares the same store.
pub struct SessionContext<St> {
    store: Arc<St>,
    config: Arc<SessionConfig>,
}

impl<St: Store> SessionContext<St> {
    /// Fails with [`AuthError::ConfigurationError`] when `config` does not
    /// pass [`SessionConfig::validate`].
    pub fn new(store: St, config: SessionConfig) -> Result<Self, AuthError> {
        Self::from_shared(Arc::new(store), Arc::new(config))
    }

    pub fn from_shared(store: Arc<St>, config: Arc<SessionConfig>) -> Result<Self, AuthError> {
        config
            .validate()
            .map_err(|msg| AuthError::ConfigurationError(msg.to_owned()))?;

        Ok(Self { store, config })
    }

    pub fn store(&self) -> &Arc<St> {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Stores a new session and returns the cookie that hands its id to the
    /// client.
    ///
    /// A colliding id fails with [`StoreError::DuplicateId`](crate::StoreError::DuplicateId)
    /// (409 when returned from a handler) and no cookie is produced. An id
    /// that fails [`is_cookie_value`] is rejected before the store is touched.
    pub async fn login(&self, session: St::Session) -> Result<SessionCookie, AppError> {
        if !is_cookie_value(session.id()) {
            log::warn!(target: "sessionward", "msg=\"login failed\" reason=\"id is not a cookie value\"");
            return Err(AuthError::InvalidCookieValue.into());
        }

        let session_id = LoginAction::new(Arc::clone(&self.store))
            .execute(session)
            .await?;

        match SessionCookie::bind(&session_id, &self.config) {
            Ok(cookie) => Ok(cookie),
            Err(err) => {
                // no client will ever present this id
                self.store.remove(&session_id).await?;
                Err(err.into())
            }
        }
    }

    /// Removes `session` from the store and returns a cookie that clears it
    /// client-side.
    pub async fn logout(&self, session: &St::Session) -> Result<SessionCookie, AppError> {
        LogoutAction::new(Arc::clone(&self.store))
            .execute(session.id())
            .await?;

        Ok(SessionCookie::clear(&self.config)?)
    }

    /// Resolves the request's session from its headers.
    pub async fn authenticate(&self, parts: &Parts) -> Result<Arc<St::Session>, AuthError> {
        let cookie_value = extract_session_cookie(&parts.headers, &self.config.cookie_name);
        authenticate(self.store.as_ref(), cookie_value.as_deref()).await
    }
}

impl<St> Clone for SessionContext<St> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            config: Arc::clone(&self.config),
        }
    }
}

impl<St> fmt::Debug for SessionContext<St> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<St, T> FromRequestParts<T> for SessionContext<St>
where
    St: Store + 'static,
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &T) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            AppError(AuthError::ConfigurationError(
                "SessionContext not found; layer expose_store around this route".to_owned(),
            ))
        })
    }
}

/// The session resolved by [`require_session`].
pub struct CurrentSession<S>(pub Arc<S>);

impl<S> CurrentSession<S> {
    pub fn session(&self) -> &S {
        &self.0
    }

    pub fn into_inner(self) -> Arc<S> {
        self.0
    }
}

impl<S> Clone for CurrentSession<S> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<S: fmt::Debug> fmt::Debug for CurrentSession<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CurrentSession").field(&self.0).finish()
    }
}

impl<S, T> FromRequestParts<T> for CurrentSession<S>
where
    S: Session,
    T: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &T) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Self>().cloned().ok_or_else(|| {
            AppError(AuthError::ConfigurationError(
                "CurrentSession not found; layer require_session around this route".to_owned(),
            ))
        })
    }
}

/// Makes the store available to everything behind it.
///
/// Use with `axum::middleware::from_fn_with_state`.
pub async fn expose_store<St>(
    State(context): State<SessionContext<St>>,
    mut request: Request,
    next: Next,
) -> Response
where
    St: Store + 'static,
{
    request.extensions_mut().insert(context);
    next.run(request).await
}

/// Rejects requests without a valid session cookie with 401.
///
/// Requires [`expose_store`] to have run first; without it every request
/// fails with 500. Use with `axum::middleware::from_fn`.
pub async fn require_session<St>(request: Request, next: Next) -> Result<Response, AppError>
where
    St: Store + 'static,
{
    let (mut parts, body) = request.into_parts();

    let context = SessionContext::<St>::from_request_parts(&mut parts, &()).await?;
    let session = context.authenticate(&parts).await?;

    parts.extensions.insert(CurrentSession(session));
    Ok(next.run(Request::from_parts(parts, body)).await)
}
