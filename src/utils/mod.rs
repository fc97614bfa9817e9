pub mod client_ip;
pub mod extractor;
pub mod jwt;
pub mod money;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod validate;

pub use client_ip::{ClientIpInfo, IpType, resolve_client_ip};
pub use extractor::{SafeEntryIdI64, SafeIDI64, SafeUserIdI64};
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
pub use sql::escape_like_pattern;
