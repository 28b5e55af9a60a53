//! Data models for Biblios

pub mod book;
pub mod page;
pub mod user;

// Re-export commonly used types
pub use book::Book;
pub use page::SortOrder;
pub use user::{User, UserDetails, UserSummary};
