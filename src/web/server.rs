use axum::{
    http::{header, Method},
    Router,
};
use log::info;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::web::api::{create_router, AppState};

/// Configuration for the web server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Directory served for any path the API does not handle
    pub static_dir: Option<String>,
    pub enable_cors: bool,
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3005,
            static_dir: None,
            enable_cors: true,
            max_sessions: 1000,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Builds the application with middleware and fresh state
pub fn build_app(config: &ServerConfig) -> Router {
    let app_state = AppState::new(config.max_sessions);

    let mut app = Router::new().merge(create_router());

    if let Some(dir) = &config.static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    let mut app = app.with_state(app_state);

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        app = app.layer(ServiceBuilder::new().layer(cors).into_inner());
    }

    app
}

/// Start the web server with the given configuration
pub async fn start_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_app(&config);
    let addr = config.addr();

    info!("geo_sssp web server listening on http://{}", addr);
    info!("health check at http://{}/api/health", addr);
    if let Some(dir) = &config.static_dir {
        info!("serving static files from {}", dir);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
