//! Storage crate: persistence of users and completed search filters.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – SearchFilter, SearchFilterRecord, UserRecord
//! - [`repository`] – FilterStore trait (what the wizard needs from persistence)
//! - [`filter_repo`] – SqliteFilterStore (SQLite)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod filter_repo;
mod models;
mod repository;
mod sqlite_pool;

pub use error::StorageError;
pub use filter_repo::SqliteFilterStore;
pub use models::{SearchFilter, SearchFilterRecord, UserRecord};
pub use repository::FilterStore;
pub use sqlite_pool::SqlitePoolManager;
