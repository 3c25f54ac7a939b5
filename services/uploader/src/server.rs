//! Server startup and graceful shutdown

use std::{future::Future, net::SocketAddr};

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::{routes, state::AppState};

/// A bound HTTP listener together with the router it serves
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Bind the listener on the configured address
    pub async fn bind(state: AppState) -> Result<Self> {
        let addr = state.config.bind_address();
        let listener = TcpListener::bind(&addr).await?;
        let router = routes::create_router(state);

        Ok(Self { listener, router })
    }

    /// Address the listener is bound to
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serve requests until `shutdown` resolves
    ///
    /// Once `shutdown` resolves no new connections are accepted and the
    /// call returns after in-flight requests finish.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        Ok(())
    }
}

/// Resolve on Ctrl+C (SIGINT) or SIGTERM
///
/// # Panics
/// Panics if a signal handler cannot be installed.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }

    info!("Shutting down gracefully, draining in-flight requests");
}
