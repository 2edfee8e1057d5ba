use axum::{
    Router,
    routing::{delete, get, post, put},
};
use engine::{Bill, BillStore, ResiduePolicy};
use tokio::sync::RwLock;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use std::{path::Path, sync::Arc};

use crate::{bill, split};

#[derive(Clone)]
pub struct ServerState {
    /// Bill currently being edited.
    pub draft: Arc<RwLock<Bill>>,
    pub store: Arc<BillStore>,
    pub residue: ResiduePolicy,
}

impl ServerState {
    pub fn new(store: BillStore, residue: ResiduePolicy) -> Self {
        Self {
            draft: Arc::new(RwLock::new(Bill::new())),
            store: Arc::new(store),
            residue,
        }
    }
}

/// API routes, with unknown paths served from `static_dir`.
///
/// Paths that match no file fall back to `index.html` so client-side routes
/// resolve; without an `index.html` they answer `404`.
pub fn router(state: ServerState, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/api/split", post(split::split))
        .route("/api/bill", get(bill::get))
        .route("/api/bill/reset", post(bill::reset))
        .route("/api/bill/info", post(bill::update_info))
        .route("/api/bill/save", post(bill::save))
        .route("/api/bills/{id}", get(bill::get_saved))
        .route("/api/participant", post(bill::participant_new))
        .route("/api/participant/{id}", delete(bill::participant_remove))
        .route("/api/item", post(bill::item_new))
        .route("/api/item/{id}", delete(bill::item_remove))
        .route("/api/item/{id}/participants", put(bill::item_participants))
        .route("/api/calculate", get(bill::calculate))
        .fallback_service(assets)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    static_dir: &Path,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("Static files served from {}", static_dir.display());

    axum::serve(listener, router(state, static_dir)).await
}
