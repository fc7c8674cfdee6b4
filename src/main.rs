use std::sync::Arc;

mod assets;
mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_CONFIG_PATH.to_string());
    let cfg = config::Config::load_from(&config_path)?;
    logger::init(&cfg)?;

    // Create Tokio runtime, sizing worker threads from config
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_info(&format!("[CONFIG] Using {workers} worker threads"));
    } else {
        logger::log_info("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // The root is pinned to an absolute path here, once
    let mapping = assets::Mapping::from_config(&cfg.assets)?;
    if !mapping.root().is_dir() {
        logger::log_warning(&format!(
            "Asset root '{}' does not exist or is not a directory; every asset request will be 404",
            mapping.root().display()
        ));
    }

    let listener = server::create_listener(addr)?;
    logger::log_server_start(
        &listener.local_addr()?,
        &cfg,
        mapping.url_prefix(),
        mapping.root(),
    );

    let state = Arc::new(config::AppState::new(cfg, mapping));
    server::run(listener, state, server::shutdown_signal()).await?;

    logger::log_info("Server stopped");
    Ok(())
}
