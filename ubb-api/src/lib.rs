//! # UBB API Server
//!
//! REST API exposing the academic registry to external callers.
//!
//! ## Endpoints
//!
//! - `GET /api/v1/owner` - Registry administrator
//! - `POST /api/v1/faculties` - Add a faculty
//! - `GET /api/v1/faculties/:symbol` - Look up a faculty
//! - `POST /api/v1/specializations` - Add a specialization
//! - `GET /api/v1/specializations/:name` - Look up a specialization with its faculty
//! - `POST /api/v1/students` - Register a student
//! - `GET /api/v1/students/address/:address` - Verify a student by address
//! - `GET /api/v1/students/cnp/:national_id` - Verify a student by national id
//! - `POST /api/v1/students/:national_id/finish` - Mark a student finished
//! - `POST /api/v1/students/:national_id/suspend` - Mark a student suspended
//! - `GET /api/v1/registry/stats` - Registry counts
//!
//! Mutating requests carry the caller address in the `x-caller-address` header.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ubb_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::new(owner);
//! let server = ApiServer::new(config);
//! server.run(([0, 0, 0, 0], 3001)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod routes;
mod handlers;
mod state;
mod dto;
mod error;

pub use routes::create_router;
pub use state::{AppState, ApiConfig, EnvSettings};
pub use error::ApiError;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use ubb_core::error::Result;

/// Largest accepted request body; registry payloads are a few short strings.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// API server for the registry.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server over a fresh in-memory registry.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// Creates a server from config, opening the snapshot file when one is set.
    pub async fn from_config(config: ApiConfig) -> Result<Self> {
        Ok(Self {
            state: Arc::new(AppState::from_config(config).await?),
        })
    }

    /// Creates a server over existing state.
    pub fn with_state(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        self.state.mark_started(Instant::now());

        info!(owner = %self.state.registry.owner(), "UBB registry API listening on {}", addr);

        axum::serve(listener, self.router()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;
    use ubb_core::constants::CALLER_HEADER;
    use ubb_core::types::EthAddress;

    #[tokio::test]
    async fn test_file_backed_server_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.ubb");
        let owner = EthAddress::from_array([0x11; 20]);

        let mut config = ApiConfig::new(owner);
        config.data_path = Some(path.clone());

        let server = ApiServer::from_config(config).await.unwrap();
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/faculties")
                    .header("content-type", "application/json")
                    .header(CALLER_HEADER, owner.to_hex_string())
                    .body(Body::from(r#"{"name":"Facultatea FSEGA","symbol":"FSEGA"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        // auto_save = 0 persists every write
        assert!(path.exists());
    }
}
