//! Session cookie handling: attaching the id on login, reading it back on
//! every request.

use std::convert::Infallible;

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, IntoResponseParts, Response, ResponseParts};
use cookie::time::Duration as CookieDuration;
use cookie::{Cookie, SameSite as CookieSameSite};

use crate::AuthError;
use crate::config::{SameSite, SessionConfig};

/// A `Set-Cookie` header for the session cookie.
///
/// Return it from a handler, alone or as the first element of a tuple, to
/// hand the session id to the client (or, from [`SessionCookie::clear`], to
/// make the client drop it).
#[derive(Debug, Clone)]
pub struct SessionCookie(HeaderValue);

impl SessionCookie {
    /// Cookie carrying `session_id` under `config.cookie_name`.
    ///
    /// The id is written verbatim, so it must pass [`is_cookie_value`];
    /// otherwise this fails with [`AuthError::InvalidCookieValue`].
    pub fn bind(session_id: &str, config: &SessionConfig) -> Result<Self, AuthError> {
        if !is_cookie_value(session_id) {
            return Err(AuthError::InvalidCookieValue);
        }

        let cookie = build_session_cookie(session_id, config);
        HeaderValue::from_str(&cookie.to_string()).map(Self).map_err(|_| {
            AuthError::ConfigurationError("cookie attributes are not a valid header".to_owned())
        })
    }

    /// Expired, empty cookie that removes the session cookie client-side.
    pub fn clear(config: &SessionConfig) -> Result<Self, AuthError> {
        let cookie = build_removal_cookie(config);
        HeaderValue::from_str(&cookie.to_string()).map(Self).map_err(|_| {
            AuthError::ConfigurationError(format!("invalid cookie name {:?}", config.cookie_name))
        })
    }

    pub fn header_value(&self) -> &HeaderValue {
        &self.0
    }
}

impl IntoResponseParts for SessionCookie {
    type Error = Infallible;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        res.headers_mut().append(SET_COOKIE, self.0);
        Ok(res)
    }
}

impl IntoResponse for SessionCookie {
    fn into_response(self) -> Response {
        (self, ()).into_response()
    }
}

fn build_session_cookie(session_id: &str, config: &SessionConfig) -> Cookie<'static> {
    let same_site = match config.cookie_same_site {
        SameSite::None => CookieSameSite::None,
        SameSite::Lax => CookieSameSite::Lax,
        SameSite::Strict => CookieSameSite::Strict,
    };

    let max_age_secs = config.session_lifetime.num_seconds();

    let mut cookie = Cookie::build((config.cookie_name.clone(), session_id.to_owned()))
        .path(config.cookie_path.clone())
        .secure(config.cookie_secure)
        .http_only(config.cookie_http_only)
        .same_site(same_site)
        .max_age(CookieDuration::seconds(max_age_secs))
        .build();

    if let Some(ref domain) = config.cookie_domain {
        cookie.set_domain(domain.clone());
    }

    cookie
}

fn build_removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), String::new()))
        .path(config.cookie_path.clone())
        .max_age(CookieDuration::ZERO)
        .build()
}

/// Whether `value` comes back unchanged from a round trip through a cookie.
///
/// Non-empty and made only of RFC 6265 `cookie-octet`s: printable ASCII
/// except space, `"`, `,`, `;` and `\`.
pub fn is_cookie_value(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E))
}

/// Value of the cookie called `name` from the request's `Cookie` headers.
///
/// Unparseable cookie pairs are skipped; the first match wins.
pub fn extract_session_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value.to_owned()))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            session_lifetime: Duration::hours(1),
            ..Default::default()
        }
    }

    #[test]
    fn test_bind_sets_attributes() {
        let cookie = SessionCookie::bind("abc123", &config()).unwrap();
        let header = cookie.header_value().to_str().unwrap();

        let parsed = Cookie::parse(header.to_owned()).unwrap();
        assert_eq!(parsed.name(), "SessionId");
        assert_eq!(parsed.value(), "abc123");
        assert_eq!(parsed.path(), Some("/"));
        assert_eq!(parsed.http_only(), Some(true));
        assert_eq!(parsed.secure(), Some(true));
        assert_eq!(parsed.same_site(), Some(CookieSameSite::Strict));
        assert_eq!(parsed.max_age(), Some(CookieDuration::hours(1)));
    }

    #[test]
    fn test_bind_rejects_values_a_cookie_cannot_carry() {
        for id in ["abc;x", "abc x", "\"abc\"", "a,b", "a\\b", "bad\nid", "caf\u{e9}", ""] {
            assert_eq!(
                SessionCookie::bind(id, &config()).unwrap_err(),
                AuthError::InvalidCookieValue,
                "{id:?}"
            );
        }
    }

    #[test]
    fn test_is_cookie_value() {
        assert!(is_cookie_value("5f1d7b3c9a8e4d2b1c0f6e7a"));
        assert!(is_cookie_value("key-1_a.b~c=d"));
        assert!(!is_cookie_value("abc;x"));
        assert!(!is_cookie_value(""));
    }

    #[test]
    fn test_bind_with_domain() {
        let config = SessionConfig {
            cookie_domain: Some("example.com".to_owned()),
            ..config()
        };
        let cookie = SessionCookie::bind("abc123", &config).unwrap();
        let parsed = Cookie::parse(cookie.header_value().to_str().unwrap().to_owned()).unwrap();
        assert_eq!(parsed.domain(), Some("example.com"));
    }

    #[test]
    fn test_clear_expires_cookie() {
        let cookie = SessionCookie::clear(&config()).unwrap();
        let parsed = Cookie::parse(cookie.header_value().to_str().unwrap().to_owned()).unwrap();
        assert_eq!(parsed.value(), "");
        assert_eq!(parsed.max_age(), Some(CookieDuration::ZERO));
    }

    #[test]
    fn test_extract_session_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("theme=dark; SessionId=abc123"));

        assert_eq!(
            extract_session_cookie(&headers, "SessionId"),
            Some("abc123".to_owned())
        );
        assert_eq!(extract_session_cookie(&headers, "Other"), None);
    }

    #[test]
    fn test_extract_from_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("SessionId=abc123"));

        assert_eq!(
            extract_session_cookie(&headers, "SessionId"),
            Some("abc123".to_owned())
        );
    }

    #[test]
    fn test_extract_missing_header() {
        assert_eq!(extract_session_cookie(&HeaderMap::new(), "SessionId"), None);
    }
}
