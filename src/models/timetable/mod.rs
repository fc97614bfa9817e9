pub mod conflict;
pub mod entities;
pub mod requests;
