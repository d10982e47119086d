//! # VinylHub Common Library
//!
//! Shared code for the VinylHub services including:
//! - Domain model (albums, condition grades)
//! - Database initialization and schema
//! - Config file and data folder locations
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod model;

pub use error::{Error, Result};
pub use model::{Album, AlbumDetail, ConditionGrade, SearchResult, TrackInfo};
