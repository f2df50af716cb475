//! ServerBuilder for fluent API to build the HTTP server

use super::entity_registry::EntityRegistry;
use super::host::{ServerHost, Services};
use super::router::RestExposure;
use crate::config::AppConfig;
use crate::entities::account::AccountDescriptor;
use crate::entities::author::AuthorDescriptor;
use crate::entities::comment::CommentDescriptor;
use crate::entities::course::CourseDescriptor;
use crate::storage::{CatalogStore, InMemoryStore};
use anyhow::{Context, Result};
use axum::Router;
use tokio::net::TcpListener;

/// Builder for the catalog HTTP server
///
/// # Example
///
/// ```ignore
/// ServerBuilder::new()
///     .with_config(AppConfig::from_yaml_file("catalog.yaml")?.with_env_overrides()?)
///     .with_store(InMemoryStore::new())
///     .serve("127.0.0.1:3000")
///     .await?;
/// ```
pub struct ServerBuilder {
    config: AppConfig,
    services: Option<Services>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder with default configuration
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            services: None,
            custom_routes: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the storage backend (defaults to an empty in-memory store)
    pub fn with_store(mut self, store: impl CatalogStore) -> Self {
        self.services = Some(Services::from_store(store));
        self
    }

    /// Add routes outside the `/api` tree
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Validate the configuration and assemble the shared state
    pub fn build_host(&mut self) -> Result<ServerHost> {
        self.config.validate().context("invalid configuration")?;

        let services = self.services.take().unwrap_or_else(|| {
            tracing::debug!("no store configured, using an empty in-memory store");
            Services::from_store(InMemoryStore::new())
        });

        ServerHost::new(services, &self.config).context("invalid configuration")
    }

    /// Build the final REST router
    pub fn build(mut self) -> Result<Router> {
        let host = self.build_host()?;

        let registry = EntityRegistry::new()
            .with(AccountDescriptor::new(host.clone()))
            .with(AuthorDescriptor::new(host.clone()))
            .with(CourseDescriptor::new(host.clone()))
            .with(CommentDescriptor::new(host));

        Ok(RestExposure::build_router(&registry, self.custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {}", addr))?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
