use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum SpyglassError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
}

impl SpyglassError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            SpyglassError::DatabaseConfig(_) => "E001",
            SpyglassError::DatabaseConnection(_) => "E002",
            SpyglassError::DatabaseOperation(_) => "E003",
            SpyglassError::Validation(_) => "E004",
            SpyglassError::NotFound(_) => "E005",
            SpyglassError::Serialization(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            SpyglassError::DatabaseConfig(_) => "Database Configuration Error",
            SpyglassError::DatabaseConnection(_) => "Database Connection Error",
            SpyglassError::DatabaseOperation(_) => "Database Operation Error",
            SpyglassError::Validation(_) => "Validation Error",
            SpyglassError::NotFound(_) => "Resource Not Found",
            SpyglassError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            SpyglassError::DatabaseConfig(msg) => msg,
            SpyglassError::DatabaseConnection(msg) => msg,
            SpyglassError::DatabaseOperation(msg) => msg,
            SpyglassError::Validation(msg) => msg,
            SpyglassError::NotFound(msg) => msg,
            SpyglassError::Serialization(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            SpyglassError::Validation(_) => StatusCode::BAD_REQUEST,
            SpyglassError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for SpyglassError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for SpyglassError {}

// 便捷的构造函数
impl SpyglassError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        SpyglassError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        SpyglassError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        SpyglassError::DatabaseOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        SpyglassError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        SpyglassError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        SpyglassError::Serialization(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for SpyglassError {
    fn from(err: sea_orm::DbErr) -> Self {
        SpyglassError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for SpyglassError {
    fn from(err: serde_json::Error) -> Self {
        SpyglassError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SpyglassError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SpyglassError::validation("x").code(), "E004");
        assert_eq!(SpyglassError::not_found("x").code(), "E005");
    }

    #[test]
    fn http_status_mapping() {
        assert_eq!(
            SpyglassError::not_found("resume").http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            SpyglassError::validation("bad").http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SpyglassError::database_operation("boom").http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn display_contains_type_and_message() {
        let err = SpyglassError::database_connection("pool exhausted");
        let s = err.to_string();
        assert!(s.contains("Database Connection Error"));
        assert!(s.contains("pool exhausted"));
    }
}
