//! # HTTP Server Module
//!
//! Axum transport for the registration service.
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `POST /register` - Submit a team registration
//! - `GET /registration/:id` - Look up a registration by its identifier

pub mod config;
pub mod health_routes;
pub mod registration_routes;
pub mod server;
pub mod state;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use state::AppState;
