use clap::Parser;
use contactbook_core::{init_logging, Store, StoreMode};
use contactbook_server::config::{Args, ServerConfig};
use contactbook_server::{build_app, AppState};
use log::{error, info, warn};
use std::error::Error;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_args(Args::parse())?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let store = Store::open(&config.store).map_err(|err| {
        error!("event=server_start module=server status=error error={err}");
        err
    })?;
    match store.mode() {
        StoreMode::File(path) => info!(
            "event=store_open module=server status=ok mode=file path={}",
            path.display()
        ),
        StoreMode::Memory => info!("event=store_open module=server status=ok mode=memory"),
        StoreMode::MemoryFallback { requested } => warn!(
            "event=store_open module=server status=degraded mode=memory requested={} persistent=false",
            requested.display()
        ),
    }

    let app = build_app(AppState::new(store), &config.cors_origins);
    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(
        "event=server_start module=server status=ok addr={}",
        listener.local_addr()?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=shutdown_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
