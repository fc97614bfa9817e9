//! 存储层与后台任务共用的错误类型
//!
//! 每个变体携带错误代码、类型名和对应的 HTTP 状态，由宏统一生成。

use actix_web::http::StatusCode;
use std::fmt;

macro_rules! define_schooldesk_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal, $status:ident)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum SchoolDeskError {
            $($variant(String),)*
        }

        impl SchoolDeskError {
            pub fn code(&self) -> &'static str {
                match self {
                    $(SchoolDeskError::$variant(_) => $code,)*
                }
            }

            pub fn error_type(&self) -> &'static str {
                match self {
                    $(SchoolDeskError::$variant(_) => $type_name,)*
                }
            }

            /// 直接返回给客户端时使用的状态码
            pub fn status(&self) -> StatusCode {
                match self {
                    $(SchoolDeskError::$variant(_) => StatusCode::$status,)*
                }
            }

            pub fn message(&self) -> &str {
                match self {
                    $(SchoolDeskError::$variant(msg) => msg,)*
                }
            }
        }

        paste::paste! {
            impl SchoolDeskError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        SchoolDeskError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_schooldesk_errors! {
    CachePluginNotFound("E002", "Cache Plugin Not Found", INTERNAL_SERVER_ERROR),
    DatabaseConfig("E003", "Database Configuration Error", INTERNAL_SERVER_ERROR),
    DatabaseConnection("E004", "Database Connection Error", SERVICE_UNAVAILABLE),
    DatabaseOperation("E005", "Database Operation Error", INTERNAL_SERVER_ERROR),
    Validation("E007", "Validation Error", BAD_REQUEST),
    NotFound("E008", "Resource Not Found", NOT_FOUND),
    Authentication("E012", "Authentication Error", UNAUTHORIZED),
    Authorization("E013", "Authorization Error", FORBIDDEN),
    Conflict("E014", "Conflict Error", CONFLICT),
    InvalidState("E015", "Invalid State Error", CONFLICT),
    Export("E016", "Export Error", INTERNAL_SERVER_ERROR),
}

impl SchoolDeskError {
    pub fn is_server_error(&self) -> bool {
        self.status().is_server_error()
    }
}

impl fmt::Display for SchoolDeskError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for SchoolDeskError {}

impl From<sea_orm::DbErr> for SchoolDeskError {
    fn from(err: sea_orm::DbErr) -> Self {
        SchoolDeskError::DatabaseOperation(err.to_string())
    }
}

impl From<csv::Error> for SchoolDeskError {
    fn from(err: csv::Error) -> Self {
        SchoolDeskError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SchoolDeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_and_types() {
        assert_eq!(SchoolDeskError::database_config("x").code(), "E003");
        assert_eq!(SchoolDeskError::validation("x").code(), "E007");
        assert_eq!(SchoolDeskError::conflict("dup").code(), "E014");
        assert_eq!(
            SchoolDeskError::invalid_state("leave already approved").error_type(),
            "Invalid State Error"
        );
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(SchoolDeskError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(SchoolDeskError::invalid_state("x").status(), StatusCode::CONFLICT);
        assert_eq!(
            SchoolDeskError::database_connection("x").status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert!(SchoolDeskError::export("csv").is_server_error());
        assert!(!SchoolDeskError::authorization("x").is_server_error());
    }

    #[test]
    fn test_from_db_err() {
        let err: SchoolDeskError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_display() {
        let err = SchoolDeskError::not_found("student 7");
        assert_eq!(err.to_string(), "Resource Not Found: student 7");
    }
}
