//! Request authentication against a [`Store`].
//!
//! Each request is decided on its own: the session id from the cookie is
//! looked up in the store every time, with no caching and no retry.

use std::sync::Arc;

use crate::AuthError;
use crate::store::Store;

/// Resolves the session named by a request's session cookie.
///
/// - no cookie, or an empty value: [`AuthError::MissingCookie`]
/// - the store does not hold the id: [`AuthError::UnknownSession`]
/// - the store failed: [`AuthError::Store`]
///
/// Staleness ([`Session::is_out_of_date`](crate::Session::is_out_of_date))
/// is not checked here.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, err))]
pub async fn authenticate<St>(
    store: &St,
    cookie_value: Option<&str>,
) -> Result<Arc<St::Session>, AuthError>
where
    St: Store + ?Sized,
{
    let Some(session_id) = cookie_value.filter(|value| !value.is_empty()) else {
        log::warn!(target: "sessionward", "msg=\"authentication rejected\" reason=\"missing cookie\"");
        return Err(AuthError::MissingCookie);
    };

    if !store.has(session_id).await.inspect_err(log_store_error)? {
        log::warn!(target: "sessionward", "msg=\"authentication rejected\" reason=\"unknown session\"");
        return Err(AuthError::UnknownSession);
    }

    // A concurrent logout can remove the session between the two lookups.
    let session = store
        .get(session_id)
        .await
        .inspect_err(log_store_error)?
        .ok_or(AuthError::UnknownSession)?;

    Ok(session)
}

fn log_store_error(err: &crate::StoreError) {
    log::error!(target: "sessionward", "msg=\"authentication store error\" error=\"{err}\"");
}
