//! HTTP surface of the contact service.
//!
//! `GET /` answers liveness; `/api/contacts` lists and creates;
//! `/api/contacts/{id}` deletes.

pub mod error;
pub mod handlers;

use crate::store::ContactStore;
use axum::Router;
use axum::routing::{delete, get};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub const CONTACTS_PATH: &str = "/api/contacts";

#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn ContactStore>,
}

impl AppContext {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(handlers::liveness))
        .route(
            CONTACTS_PATH,
            get(handlers::list_contacts).post(handlers::create_contact),
        )
        .route(
            &format!("{CONTACTS_PATH}/{{id}}"),
            delete(handlers::delete_contact),
        )
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

pub fn log_routes() {
    log::info!("registered routes:");
    log::info!("  GET    {CONTACTS_PATH}");
    log::info!("  POST   {CONTACTS_PATH}");
    log::info!("  DELETE {CONTACTS_PATH}/{{id}}");
}

/// Serves until `shutdown` resolves, then drains in-flight requests.
pub async fn serve<F>(listener: TcpListener, ctx: AppContext, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_router(ctx))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                log::warn!("cannot register signal handlers; falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    log::info!("shutdown signal received");
}
