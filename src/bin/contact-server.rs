use anyhow::Context;
use clap::Parser;
use contact_manager::config::ServerConfig;
use contact_manager::server::{self, AppContext};
use contact_manager::store::{ContactStore, SqliteStore};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    contact_manager::utils::init_logging("info");
    let config = ServerConfig::parse();

    let store = Arc::new(SqliteStore::new(config.database_url.clone()));
    match store.connect().await {
        Ok(()) => log::info!("{} store connected at {}", store.backend_tag(), config.database_url),
        Err(err) => log::error!("store connection error: {err}"),
    }

    server::log_routes();
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("cannot listen on {addr}"))?;
    log::info!("server running on {addr}");

    server::serve(
        listener,
        AppContext::new(store),
        server::wait_for_shutdown_signal(),
    )
    .await
    .context("server failed")
}
