//! API server for Relayboard
//!
//! Entry point for the realtime board backend: the Socket.IO hub and the
//! REST facade are served from a single port.

mod config;
mod realtime;
mod routes;
mod socket;
mod state;

use axum::http::HeaderValue;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;
use crate::realtime::MessageRouter;
use crate::socket::{create_socket_layer, SocketState};
use crate::state::AppState;
use rb_core::board::BoardStore;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api_server=debug,tower_http=debug,socketioxide=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Single source of truth for the board; the socket hub and the REST
    // facade share the same instance through the same router.
    let board = Arc::new(BoardStore::new());
    let router = Arc::new(MessageRouter::new(Arc::clone(&board)));

    let (socket_layer, io) = create_socket_layer(SocketState::new(Arc::clone(&router)));
    let app_state = AppState::new(board, router, io);

    // Layers are applied bottom-to-top; the socket layer sits outermost so
    // it can intercept the Socket.IO upgrade before routing.
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::board::router())
        .with_state(app_state)
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .layer(socket_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Relayboard listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    match &config.allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    }
}
