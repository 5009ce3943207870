//! HTTP server surface.

pub mod app;

pub use app::build_app;
