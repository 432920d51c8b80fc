mod cookie;
mod error;
mod handlers;
mod middleware;
mod routes;

pub use cookie::{SessionCookie, extract_session_cookie, is_cookie_value};
pub use error::AppError;
pub use handlers::{current_session, logout};
pub use middleware::{CurrentSession, SessionContext, expose_store, require_session};
pub use routes::{require_auth, session_routes, with_store};
