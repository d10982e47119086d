//! HTTP API handlers for vinylhub-web

pub mod auth;
pub mod collection;
pub mod health;
pub mod search;
pub mod ui;

pub use auth::auth_routes;
pub use collection::collection_routes;
pub use health::health_routes;
pub use search::search_routes;
pub use ui::ui_routes;
