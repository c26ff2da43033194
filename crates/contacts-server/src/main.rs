// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use contacts_server::{
    build_router, open_contact_store, validate_startup_config_contract, AppState, ServiceConfig,
    StoreConfig,
};
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = ServiceConfig::from_env();
    init_tracing(config.log_json);

    if let Some(err) = ServiceConfig::store_selection_error(|name| std::env::var(name).ok()) {
        return Err(err);
    }
    validate_startup_config_contract(&config)?;
    match &config.store {
        StoreConfig::Memory => warn!("memory store selected: contacts are lost on restart"),
        StoreConfig::Sqlite { path } => info!(path = %path.display(), "opening sqlite store"),
    }

    let store = open_contact_store(&config.store).map_err(|e| format!("store open failed: {e}"))?;
    let state = AppState::with_config(store, config.api.clone());
    let app = build_router(state.clone());

    let addr: std::net::SocketAddr = config
        .bind
        .parse()
        .map_err(|e| format!("invalid bind addr {}: {e}", config.bind))?;
    let socket = if addr.is_ipv4() {
        tokio::net::TcpSocket::new_v4().map_err(|e| format!("socket v4 failed: {e}"))?
    } else {
        tokio::net::TcpSocket::new_v6().map_err(|e| format!("socket v6 failed: {e}"))?
    };
    socket
        .set_reuseaddr(true)
        .map_err(|e| format!("set_reuseaddr failed: {e}"))?;
    socket
        .set_keepalive(config.tcp_keepalive_enabled)
        .map_err(|e| format!("set_keepalive failed: {e}"))?;
    socket.bind(addr).map_err(|e| format!("bind failed: {e}"))?;
    let listener: TcpListener = socket
        .listen(1024)
        .map_err(|e| format!("listen failed: {e}"))?;
    info!(
        bind = %config.bind,
        store = state.store.backend_tag(),
        "contacts-server listening"
    );

    let accepting = state.accepting_requests.clone();
    let ready = state.ready.clone();
    let drain: Duration = config.shutdown_drain;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            wait_for_shutdown_signal().await;
            accepting.store(false, Ordering::Relaxed);
            ready.store(false, Ordering::Relaxed);
            info!(drain_ms = drain.as_millis() as u64, "shutdown requested, draining");
            tokio::time::sleep(drain).await;
        })
        .await
        .map_err(|e| format!("server failed: {e}"))
}
