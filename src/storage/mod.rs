//! SQLite-backed directory storage.

pub mod directory;
pub mod migrations;
pub mod sqlite;

pub use directory::DirectoryStore;
pub use sqlite::Database;
