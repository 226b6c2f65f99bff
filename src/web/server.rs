//! Web server for Leclat.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::auth::reset::purge_expired_reset_tokens;
use crate::config::{Config, WebConfig};
use crate::db::AccountRepository;
use crate::{LeclatError, Result};

use super::handlers::{AppState, SharedDatabase};
use super::router::{create_health_router, create_router, create_swagger_router};

/// Interval of the expired reset-token sweep.
const RESET_PURGE_INTERVAL: Duration = Duration::from_secs(3600);

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
    /// Web configuration.
    web_config: WebConfig,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &Config, db: SharedDatabase) -> Result<Self> {
        let addr = format!("{}:{}", config.server.host, config.server.port)
            .parse()
            .map_err(|e| LeclatError::Config(format!("invalid listen address: {e}")))?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(db, config)),
            web_config: config.web.clone(),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the hourly sweep of expired reset tokens.
    fn start_reset_purge_task(db: SharedDatabase) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RESET_PURGE_INTERVAL);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                let repo = AccountRepository::new(db.pool());
                match purge_expired_reset_tokens(&repo, chrono::Utc::now()).await {
                    Ok(0) => tracing::debug!("No expired reset tokens to clear"),
                    Ok(count) => tracing::info!(cleared = count, "Cleared expired reset tokens"),
                    Err(e) => tracing::warn!(error = %e, "Failed to clear expired reset tokens"),
                }
            }
        });
    }

    fn build_router(&self) -> Router {
        create_router(self.app_state.clone(), &self.web_config)
            .merge(create_health_router())
            .merge(create_swagger_router())
            .layer(CompressionLayer::new())
    }

    async fn bind(&self) -> Result<(TcpListener, SocketAddr)> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        Self::start_reset_purge_task(self.app_state.db.clone());
        tracing::info!("Reset token purge task started (runs every hour)");
        tracing::info!("Web server listening on http://{}", local_addr);

        Ok((listener, local_addr))
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let router = self.build_router();
        let (listener, _) = self.bind().await?;

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await?;
        Ok(())
    }

    /// Serve in the background and return the bound address.
    ///
    /// Binding to port 0 picks a free port, which is what the tests use.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = self.build_router();
        let (listener, local_addr) = self.bind().await?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
