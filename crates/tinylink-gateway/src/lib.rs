//! HTTP gateway for tinylink: JSON API, HTML form and redirects.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod pages;
pub mod state;
pub mod telemetry;

pub use app::App;
pub use state::AppState;
