//! API-facing types
//!
//! These are the JSON shapes served to clients, converted from the
//! database row types in db/models.rs.

pub mod catalog;
pub mod epg;
pub mod pagination;

// Re-export commonly used items
pub use pagination::{ApiResponse, PageParams, Pagination};
