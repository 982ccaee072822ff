//! Record store implementations for tinylink.
//!
//! [`InMemoryRepository`] keeps records in process memory and loses them on
//! restart; [`SqliteRepository`] persists them to a SQLite database.

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryRepository;
pub use sqlite::SqliteRepository;
pub use tinylink_core::{Repository, StorageError};
