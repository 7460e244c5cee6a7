use once_cell::sync::Lazy;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

/// Runtime for network calls made from the GTK main loop.
pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

pub fn spawn_async<F>(fut: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    RUNTIME.spawn(fut)
}

/// Installs the fmt subscriber; `log` records are forwarded to it.
/// `RUST_LOG` overrides `default_filter`.
pub fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_url_adds_missing_scheme() {
        assert_eq!(normalize_url(" localhost:5000 "), "http://localhost:5000");
        assert_eq!(normalize_url("https://api.test"), "https://api.test");
    }

    #[test]
    fn spawn_async_runs_on_the_shared_runtime() {
        let handle = spawn_async(async { 21 * 2 });
        assert_eq!(RUNTIME.block_on(handle).unwrap(), 42);
    }
}
