mod object_id;

use chrono::{DateTime, Duration, Utc};
pub use object_id::{InvalidObjectId, ObjectId};
use serde::{Deserialize, Serialize};

/// A server-side session as seen by a [`Store`](crate::store::Store).
///
/// Two sessions with the same [`id`](Session::id) are the same logical
/// session. Stores never mutate a session after it has been added.
pub trait Session: Send + Sync + 'static {
    /// Identity of the session; also the value of the session cookie.
    fn id(&self) -> &str;

    /// Whether the session is stale.
    ///
    /// Stores and the authentication gate never consult this; eviction or
    /// rejection of stale sessions is left to the application.
    fn is_out_of_date(&self) -> bool;
}

impl<T: Session + ?Sized> Session for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn is_out_of_date(&self) -> bool {
        (**self).is_out_of_date()
    }
}

/// Session payload for a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub id: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UserSession {
    /// Creates a session with a fresh [`ObjectId`] as its id.
    pub fn new(user_id: i64, lifetime: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new().to_hex(),
            user_id,
            created_at: now,
            expires_at: now + lifetime,
        }
    }
}

impl Session for UserSession {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_out_of_date(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
