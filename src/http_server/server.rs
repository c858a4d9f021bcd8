//! # HTTP Server
//!
//! Main HTTP server combining all endpoint routers.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::registration_routes::registration_routes;
use super::state::AppState;

/// HTTP server for the registration service
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server serving `state`
    pub fn new(config: HttpServerConfig, state: Arc<AppState>) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| match s.parse() {
                    Ok(origin) => Some(origin),
                    Err(_) => {
                        warn!(origin = %s, "ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(health_routes(state.clone()))
            .merge(registration_routes(state))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server and run until Ctrl-C
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, "registration server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("registration server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationQueue;
    use crate::registration::AdmissionPipeline;
    use crate::store::InMemoryRecordStore;

    fn state() -> Arc<AppState> {
        let (queue, _rx) = NotificationQueue::unbounded();
        let pipeline = AdmissionPipeline::new(Arc::new(InMemoryRecordStore::new()), queue);
        Arc::new(AppState::new(pipeline, "hackathon-registration", false))
    }

    #[test]
    fn test_server_with_default_config() {
        let server = HttpServer::new(HttpServerConfig::default(), state());
        assert_eq!(server.socket_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_server_with_custom_port() {
        let server = HttpServer::new(HttpServerConfig::with_port(8080), state());
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_origin_list() {
        let config = HttpServerConfig {
            cors_origins: vec!["https://hack.example.com".to_string(), "\n".to_string()],
            ..Default::default()
        };
        let _router = HttpServer::new(config, state()).router();
    }
}
