use poem::{error::ResponseError, http::StatusCode, Body, Response};
use std::fmt;

pub const RECIPE_NOT_FOUND: &str = "Recipe not found";
pub const INGREDIENT_NOT_FOUND: &str = "Ingredient not found";
pub const CRITERIA_NOT_FOUND: &str = "Search criteria not found";
pub const INGREDIENT_IN_USE: &str =
    "Ingredient is used by at least one recipe and cannot be deleted";
const INTERNAL_ERROR: &str = "Internal server error";

/// Failure kinds surfaced by recipe and ingredient operations
#[derive(Debug)]
pub enum ServiceError {
    NotFound(String),
    InvalidArgument(String),
    Internal(anyhow::Error),
}

impl ServiceError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        ServiceError::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ServiceError::InvalidArgument(msg.into())
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "{}", msg),
            ServiceError::InvalidArgument(msg) => write!(f, "{}", msg),
            ServiceError::Internal(e) => write!(f, "Internal error: {:#}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Internal(e.into())
    }
}

impl From<anyhow::Error> for ServiceError {
    fn from(e: anyhow::Error) -> Self {
        ServiceError::Internal(e)
    }
}

impl ResponseError for ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn as_response(&self) -> Response {
        let message = match self {
            ServiceError::Internal(e) => {
                tracing::error!(error = %format!("{:#}", e), "request failed with internal error");
                INTERNAL_ERROR.to_string()
            }
            other => other.to_string(),
        };
        error_response(self.status(), &message)
    }
}

/// JSON failure envelope shared by every error type
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = serde_json::json!({
        "success": false,
        "error": message,
    });
    Response::builder()
        .status(status)
        .content_type("application/json")
        .body(Body::from_json(&body).unwrap_or_else(|_| Body::from(message.to_string())))
}
