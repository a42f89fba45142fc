//! Data models for Bookshelf

pub mod activity;
pub mod book;
pub mod envelope;
pub mod profile;
pub mod stats;

// Re-export commonly used types
pub use activity::Activity;
pub use book::{Book, BorrowBook, CreateBook};
pub use envelope::Envelope;
pub use profile::{CreateProfile, UserProfile};
pub use stats::{LibraryStats, UtilizationRate};
