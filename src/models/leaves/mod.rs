pub mod auto_approval;
pub mod entities;
pub mod requests;
