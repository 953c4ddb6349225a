//! API route configuration.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Access control
        .route("/api/v1/owner", get(handlers::get_owner))

        // Faculties
        .route("/api/v1/faculties", post(handlers::add_faculty))
        .route("/api/v1/faculties/:symbol", get(handlers::get_faculty))

        // Specializations
        .route("/api/v1/specializations", post(handlers::add_specialization))
        .route("/api/v1/specializations/:name", get(handlers::get_specialization))

        // Students
        .route("/api/v1/students", post(handlers::add_student))
        .route("/api/v1/students/address/:address", get(handlers::verify_by_address))
        .route("/api/v1/students/cnp/:national_id", get(handlers::verify_by_national_id))
        .route("/api/v1/students/:national_id/finish", post(handlers::mark_finished))
        .route("/api/v1/students/:national_id/suspend", post(handlers::mark_suspended))

        // Registry
        .route("/api/v1/registry/stats", get(handlers::get_registry_stats))

        .with_state(state)
}
