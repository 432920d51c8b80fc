use crate::session::Session;
use crate::store::Store;
use crate::StoreError;

/// Adds a freshly created session to a store.
///
/// Generating the session id is the session type's job; this action only
/// persists it. A colliding id is reported, never silently dropped.
pub struct LoginAction<St: Store> {
    store: St,
}

impl<St: Store> LoginAction<St> {
    pub fn new(store: St) -> Self {
        LoginAction { store }
    }

    /// Stores `session` and returns its id, the value for the session cookie.
    ///
    /// # Returns
    ///
    /// - `Ok(id)` - session stored
    /// - `Err(StoreError::DuplicateId)` - a session with this id already exists
    /// - `Err(_)` - backend or other errors
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(&self, session: St::Session) -> Result<String, StoreError> {
        let session_id = session.id().to_owned();

        match self.store.add(session).await {
            Ok(()) => {
                log::info!(target: "sessionward", "msg=\"login success\"");
                Ok(session_id)
            }
            Err(err) => {
                log::warn!(target: "sessionward", "msg=\"login failed\" error=\"{err}\"");
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::session::UserSession;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_login_stores_session() {
        let store = MemoryStore::new();
        let login = LoginAction::new(store.clone());

        let session = UserSession::new(1, Duration::hours(1));
        let expected = session.id.clone();

        let id = login.execute(session).await.unwrap();
        assert_eq!(id, expected);
        assert!(store.has(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_login_reports_collision() {
        let store = MemoryStore::new();
        let login = LoginAction::new(store.clone());
        let session = UserSession::new(1, Duration::hours(1));

        login.execute(session.clone()).await.unwrap();
        let result = login.execute(session.clone()).await;

        assert_eq!(result, Err(StoreError::DuplicateId(session.id)));
        assert_eq!(store.len().await.unwrap(), 1);
    }
}
