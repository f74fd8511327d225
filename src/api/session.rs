//! `authToken` cookie handling. Every handler that issues or clears the
//! session goes through these helpers with the shared cookie settings.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::api::errors::ApiError;
use crate::core::config::SessionCookieSettings;

/// Value of the session cookie from the `Cookie` header, if present.
pub(crate) fn cookie_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == cookie_name)
        .map(|(_, value)| value.trim().trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// Token from `Authorization: Bearer <token>`.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn render(settings: &SessionCookieSettings, value: &str, max_age_seconds: u64) -> String {
    let mut cookie = format!(
        "{}={value}; Path={}; HttpOnly; SameSite={}; Max-Age={max_age_seconds}",
        settings.name,
        settings.path,
        settings.same_site.as_str()
    );
    if settings.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub(crate) fn issue_cookie(
    settings: &SessionCookieSettings,
    token: &str,
    expire_minutes: u64,
) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&render(settings, token, expire_minutes.saturating_mul(60)))
        .map_err(|e| ApiError::internal(e, "Failed to build session cookie"))
}

pub(crate) fn clear_cookie(settings: &SessionCookieSettings) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&render(settings, "", 0))
        .map_err(|e| ApiError::internal(e, "Failed to build session cookie"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SameSite;

    fn settings() -> SessionCookieSettings {
        SessionCookieSettings {
            name: "authToken".to_string(),
            path: "/".to_string(),
            secure: true,
            same_site: SameSite::None,
        }
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark; authToken=abc.def"));
        assert_eq!(cookie_token(&headers, "authToken").as_deref(), Some("abc.def"));
        assert_eq!(cookie_token(&headers, "missing"), None);
    }

    #[test]
    fn empty_cookie_is_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("authToken="));
        assert_eq!(cookie_token(&headers, "authToken"), None);
    }

    #[test]
    fn bearer_requires_scheme_prefix() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Token abc"));
        assert_eq!(bearer_token(&headers), None);
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn issued_cookie_is_http_only_and_secure() {
        let value = issue_cookie(&settings(), "tok", 60).unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "authToken=tok; Path=/; HttpOnly; SameSite=None; Max-Age=3600; Secure"
        );
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        let mut settings = settings();
        settings.secure = false;
        settings.same_site = SameSite::Lax;
        let value = clear_cookie(&settings).unwrap();
        assert_eq!(value.to_str().unwrap(), "authToken=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    }
}
