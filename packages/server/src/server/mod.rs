// HTTP server: routing, sessions and HTML rendering
pub mod app;
pub mod auth;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod static_files;
pub mod views;

pub use app::*;
