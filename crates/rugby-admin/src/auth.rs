//! Password login and cookie sessions.
//!
//! Sessions are random tokens held in memory; restarting the panel signs
//! everybody out.

use askama::Template;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

use crate::error::AdminError;
use crate::templates::LoginTemplate;
use crate::AppState;

pub const SESSION_COOKIE: &str = "rugby_session";

/// Lowercase hex SHA-256 of `password`.
pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// The single admin account.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    /// Lowercase hex digest. `None` disables login.
    pub password_sha256: Option<String>,
}

impl Credentials {
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let Some(expected) = &self.password_sha256 else {
            return false;
        };
        username == self.username && hash_password(password).eq_ignore_ascii_case(expected.trim())
    }
}

/// Live sessions and their expiry times.
#[derive(Debug)]
pub struct SessionStore {
    ttl: Duration,
    sessions: Mutex<HashMap<Uuid, DateTime<Utc>>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn create(&self) -> Uuid {
        self.create_at(Utc::now())
    }

    fn create_at(&self, now: DateTime<Utc>) -> Uuid {
        let token = Uuid::new_v4();
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.retain(|_, expires| *expires > now);
        sessions.insert(token, now + self.ttl);
        token
    }

    pub fn is_valid(&self, token: &Uuid) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    fn is_valid_at(&self, token: &Uuid, now: DateTime<Utc>) -> bool {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        match sessions.get(token) {
            Some(expires) if *expires > now => true,
            Some(_) => {
                sessions.remove(token);
                false
            }
            None => false,
        }
    }

    pub fn remove(&self, token: &Uuid) {
        self.sessions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token);
    }
}

/// Extracts the session token from the `Cookie` headers.
fn session_token(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .and_then(|(_, value)| Uuid::parse_str(value.trim()).ok())
}

/// Redirects requests without a live session to the login page.
pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    match session_token(request.headers()) {
        Some(token) if state.sessions.is_valid(&token) => next.run(request).await,
        _ => Redirect::to("/login").into_response(),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// `GET /login`
pub async fn login_page(State(state): State<AppState>) -> Result<Html<String>, AdminError> {
    let page = LoginTemplate {
        username: state.credentials.username.clone(),
        error: None,
    };
    Ok(Html(page.render()?))
}

/// `POST /login`
///
/// Sets the session cookie and redirects to the dashboard, or re-renders
/// the form with `401 Unauthorized`.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Result<Response, AdminError> {
    if !state.credentials.verify(&form.username, &form.password) {
        tracing::warn!(username = %form.username, "failed admin login");
        let error = if state.credentials.password_sha256.is_none() {
            "No admin password is configured."
        } else {
            "Invalid username or password."
        };
        let page = LoginTemplate {
            username: form.username,
            error: Some(error.to_string()),
        };
        return Ok((StatusCode::UNAUTHORIZED, Html(page.render()?)).into_response());
    }

    let token = state.sessions.create();
    tracing::info!(username = %form.username, "admin signed in");
    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.sessions.ttl().num_seconds()
    );
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response())
}

/// `POST /logout`
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(token) = session_token(&headers) {
        state.sessions.remove(&token);
    }
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    ([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn credentials() -> Credentials {
        Credentials {
            username: "admin".to_string(),
            password_sha256: Some(hash_password("scrum-half")),
        }
    }

    #[test]
    fn hash_is_lowercase_hex_sha256() {
        assert_eq!(
            hash_password("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn verify_checks_user_and_password() {
        let creds = credentials();
        assert!(creds.verify("admin", "scrum-half"));
        assert!(!creds.verify("admin", "fly-half"));
        assert!(!creds.verify("root", "scrum-half"));
    }

    #[test]
    fn uppercase_digest_is_accepted() {
        let creds = Credentials {
            password_sha256: Some(hash_password("x").to_uppercase()),
            ..credentials()
        };
        assert!(creds.verify("admin", "x"));
    }

    #[test]
    fn no_password_means_no_login() {
        let creds = Credentials {
            password_sha256: None,
            ..credentials()
        };
        assert!(!creds.verify("admin", ""));
    }

    #[test]
    fn sessions_expire() {
        let store = SessionStore::new(Duration::minutes(30));
        let start = Utc::now();
        let token = store.create_at(start);
        assert!(store.is_valid_at(&token, start + Duration::minutes(29)));
        assert!(!store.is_valid_at(&token, start + Duration::minutes(31)));
        // Expired tokens are dropped, so they stay invalid.
        assert!(!store.is_valid_at(&token, start));
    }

    #[test]
    fn removed_session_is_invalid() {
        let store = SessionStore::new(Duration::minutes(30));
        let token = store.create();
        store.remove(&token);
        assert!(!store.is_valid(&token));
    }

    #[test]
    fn token_is_read_among_other_cookies() {
        let token = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE}={token}")).unwrap(),
        );
        assert_eq!(session_token(&headers), Some(token));

        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("rugby_session=garbage"));
        assert_eq!(session_token(&headers), None);
    }
}
