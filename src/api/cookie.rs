//! Session Cookie
//!
//! Reads the session id from the `Cookie` header and attaches a
//! `Set-Cookie` header when a new session was started.

use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};

/// Find a cookie value by name
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

/// Build the `Set-Cookie` value for a session id
pub fn session_cookie(name: &str, session_id: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        name, session_id
    ))
    .ok()
}

/// Response that may carry a new session cookie
pub struct WithSession<T> {
    pub cookie: Option<HeaderValue>,
    pub inner: T,
}

impl<T> WithSession<T> {
    /// Attach a cookie only when the session was created for this request
    pub fn new(cookie_name: &str, session_id: &str, created: bool, inner: T) -> Self {
        let cookie = if created {
            session_cookie(cookie_name, session_id)
        } else {
            None
        };
        Self { cookie, inner }
    }
}

impl<T: IntoResponse> IntoResponse for WithSession<T> {
    fn into_response(self) -> Response {
        let mut response = self.inner.into_response();
        if let Some(cookie) = self.cookie {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
        response
    }
}
