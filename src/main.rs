use adw::Application;
use adw::prelude::*;
use anyhow::Context;
use contact_manager::api::client::ApiClient;
use contact_manager::config::ClientConfig;
use contact_manager::{ui, utils};

fn main() -> anyhow::Result<()> {
    utils::init_logging("contact_manager=info");

    if let Some(path) = ClientConfig::config_path().filter(|p| !p.exists()) {
        match ClientConfig::default().save_to(&path) {
            Ok(()) => log::info!("wrote default client config to {}", path.display()),
            Err(err) => log::warn!("could not write {}: {err}", path.display()),
        }
    }
    let config = ClientConfig::load();
    let client = ApiClient::new(&config.api_url)
        .with_context(|| format!("invalid api_url {:?}", config.api_url))?;
    log::info!("using contact service at {}", client.base_url());

    let app = Application::builder()
        .application_id("com.example.ContactManager")
        .build();
    app.connect_activate(move |app| ui::build_ui(app, client.clone()));
    app.run();
    Ok(())
}
