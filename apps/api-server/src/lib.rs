//! # Blog API Server
//!
//! Actix-web application exposing the `/posts` CRUD endpoints.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod startup;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use startup::{Application, RunningServer};
pub use state::AppState;
