//! Database access for vinylhub-web
//!
//! Collection rows and settings live in the shared SQLite database
//! initialized by `vinylhub_common::db::init_database`.

pub mod collection;
pub mod settings;
