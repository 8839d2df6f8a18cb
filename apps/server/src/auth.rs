//! Login, logout and the session guard in front of every dashboard route.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use argon2::{
    password_hash::{Error as PasswordHashError, PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{
    extract::{Query, Request, State},
    http::{
        header::{AUTHORIZATION, COOKIE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::api::shared::validate_next;
use crate::main_lib::AppState;

pub const SESSION_COOKIE: &str = "asxtrade_session";

/// The authenticated user of a request, inserted by [`require_session`].
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

pub struct AuthManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

#[derive(Debug)]
pub enum AuthError {
    Unauthorized,
    InvalidCredentials,
    BadRequest(String),
    Internal(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    code: u16,
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    username: String,
    exp: usize,
    iat: usize,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub next: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPage {
    pub title: String,
    pub next: String,
}

impl AuthManager {
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret),
            decoding_key: DecodingKey::from_secret(jwt_secret),
            validation,
            token_ttl,
        }
    }

    pub fn issue_token(&self, user: &CurrentUser) -> Result<String, AuthError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| AuthError::Internal("System clock is before UNIX_EPOCH".into()))?;
        let exp = now + self.token_ttl;
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            iat: now.as_secs() as usize,
            exp: exp.as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to sign token: {e}")))
    }

    /// The user named by a valid, unexpired token.
    pub fn validate_token(&self, token: &str) -> Result<CurrentUser, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| CurrentUser {
                id: data.claims.sub,
                username: data.claims.username,
            })
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature
                | jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::Base64(_)
                | jsonwebtoken::errors::ErrorKind::Json(_)
                | jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(_) => {
                    AuthError::Unauthorized
                }
                other => AuthError::Internal(format!("Failed to validate token: {other:?}")),
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            AuthError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ),
            AuthError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthError::Internal(msg) => {
                tracing::error!("Authentication failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = Json(AuthErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}

/// A fresh secret; sessions then last only as long as the process.
pub fn generate_secret_key() -> Vec<u8> {
    let mut secret = vec![0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

pub fn verify_password(password_hash: &str, candidate: &str) -> Result<(), AuthError> {
    let parsed = PasswordHash::new(password_hash)
        .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {e}")))?;
    Argon2::default()
        .verify_password(candidate.as_bytes(), &parsed)
        .map_err(|err| match err {
            PasswordHashError::Password => AuthError::InvalidCredentials,
            other => AuthError::Internal(format!("Password verification failed: {other}")),
        })
}

/// Token from the session cookie, falling back to a bearer header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, token)| token.trim().to_string());
    if let Some(token) = from_cookie.filter(|t| !t.is_empty()) {
        return Some(token);
    }

    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn session_cookie(token: &str, max_age: Duration) -> String {
    format!(
        "{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}",
        max_age.as_secs()
    )
}

pub async fn login_page(Query(query): Query<NextQuery>) -> Result<Json<LoginPage>, AuthError> {
    let next = validate_next(query.next.as_deref()).map_err(AuthError::BadRequest)?;
    Ok(Json(LoginPage {
        title: "Login".to_string(),
        next,
    }))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NextQuery>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AuthError> {
    let next = validate_next(payload.next.as_deref().or(query.next.as_deref()))
        .map_err(AuthError::BadRequest)?;
    let user = state
        .user_service
        .find_active_by_username(payload.username.trim())
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::InvalidCredentials)?;
    verify_password(&user.password_hash, &payload.password)?;

    let current = CurrentUser {
        id: user.id,
        username: user.username,
    };
    let token = state.auth.issue_token(&current)?;
    tracing::info!("User {} logged in", current.username);

    let ttl = state.auth.expires_in();
    let cookie = session_cookie(&token, ttl);
    let body = Json(LoginResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        expires_in: ttl.as_secs(),
        next,
    });
    Ok(([(SET_COOKIE, cookie)], body).into_response())
}

pub async fn logout() -> Response {
    let cleared = session_cookie("", Duration::ZERO);
    ([(SET_COOKIE, cleared)], Redirect::to("/login")).into_response()
}

/// Attaches a [`CurrentUser`] or sends the browser to the login page,
/// remembering where it was going.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    match authenticate(&state, request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            Ok(next.run(request).await)
        }
        Err(AuthError::Unauthorized) => {
            let target = request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str())
                .unwrap_or("/");
            tracing::debug!("No valid session for {}, redirecting to login", target);
            let location = format!("/login?next={}", urlencoding::encode(target));
            Ok(Redirect::to(&location).into_response())
        }
        Err(other) => Err(other),
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<CurrentUser, AuthError> {
    let token = session_token(headers).ok_or(AuthError::Unauthorized)?;
    let claimed = state.auth.validate_token(&token)?;
    // Deactivated or deleted users lose their sessions immediately.
    let user = state
        .user_service
        .find_active_by_id(&claimed.id)
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::Unauthorized)?;
    Ok(CurrentUser {
        id: user.id,
        username: user.username,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use argon2::{password_hash::SaltString, PasswordHasher};
    use axum::http::HeaderValue;

    fn alice() -> CurrentUser {
        CurrentUser {
            id: "u1".to_string(),
            username: "alice".to_string(),
        }
    }

    #[test]
    fn issued_tokens_validate() {
        let auth = AuthManager::new(&generate_secret_key(), Duration::from_secs(60));
        let token = auth.issue_token(&alice()).unwrap();
        assert_eq!(auth.validate_token(&token).unwrap(), alice());
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let issuer = AuthManager::new(&generate_secret_key(), Duration::from_secs(60));
        let verifier = AuthManager::new(&generate_secret_key(), Duration::from_secs(60));
        let token = issuer.issue_token(&alice()).unwrap();
        assert!(matches!(
            verifier.validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let secret = generate_secret_key();
        let auth = AuthManager::new(&secret, Duration::from_secs(60));
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize;
        let claims = Claims {
            sub: "u1".to_string(),
            username: "alice".to_string(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&secret),
        )
        .unwrap();
        assert!(matches!(
            auth.validate_token(&token),
            Err(AuthError::Unauthorized)
        ));
    }

    #[test]
    fn secret_keys_must_be_32_bytes() {
        let encoded = BASE64.encode([7u8; 32]);
        assert_eq!(decode_secret_key(&encoded).unwrap(), vec![7u8; 32]);
        assert!(decode_secret_key("").is_err());
        assert!(decode_secret_key(&BASE64.encode([7u8; 16])).is_err());
    }

    #[test]
    fn passwords_verify_against_argon2_hashes() {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(b"hunter22", &salt)
            .unwrap()
            .to_string();
        assert!(verify_password(&hash, "hunter22").is_ok());
        assert!(matches!(
            verify_password(&hash, "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn session_cookie_wins_over_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header-token"));
        assert_eq!(session_token(&headers).as_deref(), Some("header-token"));

        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; asxtrade_session=cookie-token"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("cookie-token"));
    }

    #[test]
    fn non_bearer_schemes_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(session_token(&headers).is_none());
    }
}
