use crate::error::ServiceError;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

/// Renders a nanosecond timestamp as `YYYY-MM-DD HH:MM:SS` (UTC)
pub fn format_timestamp_ns(timestamp_ns: i64) -> String {
    chrono::DateTime::from_timestamp_nanos(timestamp_ns)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub(crate) fn now_ns() -> i64 {
    chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
}

/// Row offset for a zero-based page; rejects pages past the addressable range
pub(crate) fn page_offset(page: i64, size: i64) -> Result<i64, ServiceError> {
    if page < 0 {
        return Err(ServiceError::invalid("Page must not be negative"));
    }
    if size <= 0 {
        return Err(ServiceError::invalid("Page size must be positive"));
    }
    page.checked_mul(size)
        .ok_or_else(|| ServiceError::invalid("Page is out of range"))
}
