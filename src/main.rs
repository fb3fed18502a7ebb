// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use game_token_gateway::{
    api::router,
    config::{Config, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    init_tracing();

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let config = Config::from_env().unwrap_or_else(|e| {
        error!(error = %e, "Failed to load configuration");
        process::exit(1);
    });
    let addr = config.bind_addr().unwrap_or_else(|e| {
        error!(error = %e, "Failed to parse bind address");
        process::exit(1);
    });
    let tls_paths = config
        .tls_paths()
        .map(|(cert, key)| (cert.to_path_buf(), key.to_path_buf()));

    let state = AppState::load(config).unwrap_or_else(|e| {
        error!(error = %e, "Failed to load crossdomain policy file");
        process::exit(1);
    });
    info!(
        platform = %state.endpoints.hash_info.origin().ascii_serialization(),
        timeout_secs = state.config.upstream_timeout_secs,
        "Platform endpoints configured"
    );
    let app = router(state);

    let handle = Handle::new();
    tokio::spawn(shutdown_signal(handle.clone()));

    let result = match tls_paths {
        Some((cert, key)) => {
            let tls_config = RustlsConfig::from_pem_file(&cert, &key)
                .await
                .unwrap_or_else(|e| {
                    error!(error = %e, cert = %cert.display(), "Failed to load TLS credentials");
                    process::exit(1);
                });
            info!("Game token gateway listening on https://{addr} (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!("Game token gateway listening on http://{addr} (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "HTTP server failed");
        process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.trim().eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

async fn shutdown_signal(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}
