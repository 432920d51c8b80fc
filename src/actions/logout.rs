use crate::store::Store;
use crate::StoreError;

/// Removes a session from a store.
pub struct LogoutAction<St: Store> {
    store: St,
}

impl<St: Store> LogoutAction<St> {
    pub fn new(store: St) -> Self {
        LogoutAction { store }
    }

    /// Removes the session. Logging out twice, or logging out a session that
    /// was never stored, succeeds.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "logout", skip_all, err)
    )]
    pub async fn execute(&self, session_id: &str) -> Result<(), StoreError> {
        self.store.remove(session_id).await?;

        log::info!(target: "sessionward", "msg=\"logout success\"");

        Ok(())
    }
}
