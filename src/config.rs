//! Cookie and session lifetime settings.
//!
//! The same [`SessionConfig`] value is handed to the login side (which sets
//! the cookie) and to the authentication gate (which reads it), so both
//! always agree on the cookie name.
//!
//! # Example
//!
//! ```rust
//! use chrono::Duration;
//! use sessionward::config::SessionConfig;
//!
//! let config = SessionConfig {
//!     cookie_secure: false,
//!     session_lifetime: Duration::hours(8),
//!     ..Default::default()
//! };
//! assert_eq!(config.cookie_name, "SessionId");
//! assert!(config.validate().is_ok());
//! ```

use chrono::Duration;

/// Default name of the session cookie.
pub const DEFAULT_COOKIE_NAME: &str = "SessionId";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    None,
    Lax,
    #[default]
    Strict,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub cookie_path: String,
    pub cookie_domain: Option<String>,
    pub cookie_secure: bool,
    pub cookie_http_only: bool,
    pub cookie_same_site: SameSite,
    /// Cookie `Max-Age`, and the lifetime given to sessions created on login.
    pub session_lifetime: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_owned(),
            cookie_path: "/".to_owned(),
            cookie_domain: None,
            cookie_secure: true,
            cookie_http_only: true,
            cookie_same_site: SameSite::Strict,
            session_lifetime: Duration::hours(2),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.cookie_name.is_empty() {
            return Err("cookie_name must not be empty");
        }
        if !self.cookie_name.bytes().all(is_token_byte) {
            return Err("cookie_name must be an HTTP token");
        }
        if !self.cookie_path.starts_with('/') {
            return Err("cookie_path must start with '/'");
        }
        if self.session_lifetime <= Duration::zero() {
            return Err("session_lifetime must be positive");
        }
        Ok(())
    }
}

/// RFC 7230 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}
