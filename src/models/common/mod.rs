pub mod enums;
pub mod pagination;
pub mod response;

pub use pagination::{
    PaginatedResponse, PaginationInfo, PaginationQuery, deserialize_opt_bool, deserialize_opt_i64,
};
pub use response::ApiResponse;
