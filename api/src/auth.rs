use crate::config::AuthSettings;
use crate::error::error_response;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use poem::{error::ResponseError, http::StatusCode, FromRequest, Request, RequestBody, Response};
use serde::Deserialize;
use sha2::Sha256;
use std::fmt;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

pub const SCOPE_READ: &str = "read";
pub const SCOPE_WRITE: &str = "write";

/// Caller identity taken from a validated bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    pub subject: String,
    pub scopes: Vec<String>,
}

impl AuthenticatedClient {
    pub fn require_scope(&self, scope: &str) -> Result<(), AuthError> {
        if self.scopes.iter().any(|s| s == scope) {
            Ok(())
        } else {
            Err(AuthError::InsufficientScope(scope.to_string()))
        }
    }
}

/// Claims read from the token payload
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub scope: String,
    pub exp: i64,
}

#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
}

/// Authentication error types
#[derive(Debug)]
pub enum AuthError {
    MissingHeader(String),
    InvalidFormat(String),
    InvalidSignature(String),
    TokenExpired,
    InsufficientScope(String),
    InternalError(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AuthError::MissingHeader(h) => write!(f, "Missing required header: {}", h),
            AuthError::InvalidFormat(msg) => write!(f, "Invalid format: {}", msg),
            AuthError::InvalidSignature(msg) => write!(f, "Invalid signature: {}", msg),
            AuthError::TokenExpired => write!(f, "Access token expired"),
            AuthError::InsufficientScope(scope) => {
                write!(f, "Access denied: token lacks scope '{}'", scope)
            }
            AuthError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

impl ResponseError for AuthError {
    fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidFormat(_) => StatusCode::UNAUTHORIZED,
            AuthError::InvalidSignature(_) => StatusCode::UNAUTHORIZED,
            AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn as_response(&self) -> Response {
        error_response(self.status(), &self.to_string())
    }
}

/// Verify an HS256 JWT and return its claims.
///
/// Only the signature and `exp` are checked; tokens are issued elsewhere.
pub fn verify_bearer_token(token: &str, secret: &str, now_secs: i64) -> Result<Claims, AuthError> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(AuthError::InvalidFormat(
            "Token must have three dot-separated parts".to_string(),
        ));
    };

    let header_bytes = URL_SAFE_NO_PAD
        .decode(header_b64)
        .map_err(|e| AuthError::InvalidFormat(format!("Invalid token header encoding: {}", e)))?;
    let header: Header = serde_json::from_slice(&header_bytes)
        .map_err(|e| AuthError::InvalidFormat(format!("Invalid token header: {}", e)))?;
    if header.alg != "HS256" {
        return Err(AuthError::InvalidFormat(format!(
            "Unsupported token algorithm: {}",
            header.alg
        )));
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).map_err(|e| {
        AuthError::InvalidFormat(format!("Invalid token signature encoding: {}", e))
    })?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::InternalError(format!("Invalid signing key: {}", e)))?;
    mac.update(header_b64.as_bytes());
    mac.update(b".");
    mac.update(payload_b64.as_bytes());
    mac.verify_slice(&signature).map_err(|_| {
        AuthError::InvalidSignature("Token signature verification failed".to_string())
    })?;

    let payload = URL_SAFE_NO_PAD
        .decode(payload_b64)
        .map_err(|e| AuthError::InvalidFormat(format!("Invalid token payload encoding: {}", e)))?;
    let claims: Claims = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::InvalidFormat(format!("Invalid token claims: {}", e)))?;

    if claims.exp <= now_secs {
        return Err(AuthError::TokenExpired);
    }

    Ok(claims)
}

/// Poem extractor for authenticated requests
impl FromRequest<'_> for AuthenticatedClient {
    async fn from_request(req: &Request, _body: &mut RequestBody) -> poem::Result<Self> {
        let settings = req
            .data::<Arc<AuthSettings>>()
            .ok_or_else(|| AuthError::InternalError("Auth settings not configured".to_string()))?;

        if settings.disabled {
            return Ok(AuthenticatedClient {
                subject: "anonymous".to_string(),
                scopes: vec![SCOPE_READ.to_string(), SCOPE_WRITE.to_string()],
            });
        }

        let secret = settings
            .jwt_secret
            .as_deref()
            .ok_or_else(|| AuthError::InternalError("JWT secret not configured".to_string()))?;

        let header = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AuthError::MissingHeader("Authorization".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .ok_or_else(|| {
                AuthError::InvalidFormat("Authorization header must use the Bearer scheme".to_string())
            })?;

        let claims = verify_bearer_token(token, secret, chrono::Utc::now().timestamp())?;

        Ok(AuthenticatedClient {
            subject: claims.sub,
            scopes: claims.scope.split_whitespace().map(str::to_string).collect(),
        })
    }
}

/// Sign claims the same way the token issuer does
#[cfg(test)]
pub fn sign_test_token(subject: &str, scope: &str, exp: i64, secret: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({ "sub": subject, "scope": scope, "exp": exp }).to_string(),
    );
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
    mac.update(header.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
    format!("{}.{}.{}", header, payload, signature)
}
