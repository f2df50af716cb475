//! Course catalog server
//!
//! Usage: `catalog-server [config.yaml]`
//!
//! The config path may also come from `CATALOG_CONFIG`. Without a file the
//! defaults are used; either way `CATALOG_*` environment variables win.

use anyhow::Result;
use catalog::config::AppConfig;
use catalog::server::ServerBuilder;
use catalog::storage::InMemoryStore;
use tracing_subscriber::EnvFilter;

const ENV_CONFIG: &str = "CATALOG_CONFIG";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    let bind = config.server.bind.clone();

    ServerBuilder::new()
        .with_config(config)
        .with_store(InMemoryStore::new())
        .serve(&bind)
        .await
}

fn load_config() -> Result<AppConfig> {
    let path = std::env::args().nth(1).or_else(|| std::env::var(ENV_CONFIG).ok());

    let config = match path {
        Some(path) => {
            tracing::info!(path = %path, "loading configuration");
            AppConfig::from_yaml_file(&path)?
        }
        None => AppConfig::default(),
    };

    let config = config.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}
