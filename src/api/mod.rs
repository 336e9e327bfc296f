//! REST API for simulation results and allocation data.
//!
//! Provides two GET endpoints:
//! - `/results` — site summary, per-plan results, and the best-plan index
//! - `/allocation` — 24-hour allocation profile with optional season choice

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::sim::comparator::PlanResult;
use crate::sim::types::SimulationSnapshot;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the simulation run completes and wrapped in
/// `Arc` — no locks needed since all data is read-only.
pub struct AppState {
    /// The committed snapshot the results were computed from.
    pub inputs: SimulationSnapshot,
    /// Per-plan results, in catalog order.
    pub results: Vec<PlanResult>,
    /// Index of the highest-profit plan.
    pub best: Option<usize>,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/results", get(handlers::get_results))
        .route("/allocation", get(handlers::get_allocation))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
