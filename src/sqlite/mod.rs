//! `SQLite` session backend.
//!
//! Enable the `sqlx_sqlite` feature to use [`SqliteCollection`] as the
//! [`Collection`](crate::store::Collection) behind a
//! [`BackendStore`](crate::store::BackendStore).

mod collection;
pub mod migrations;

pub use collection::SqliteCollection;
