use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use fuels::crypto::SecretKey;
use fuels::prelude::{Provider, WalletUnlocked};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::error::{DeployError, Result};

pub const DEFAULT_CONTRACTS_DIR: &str = "..";

#[derive(Clone)]
pub struct Config {
    pub fuel_url: String,
    pub deployer_pk: String,
    pub contracts_dir: PathBuf,
}

// Keeps the key out of logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("fuel_url", &self.fuel_url)
            .field("contracts_dir", &self.contracts_dir)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Builds the config from any variable source, so tests don't have to touch the process env.
    pub fn from_vars<F>(var: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| var(name).ok_or(DeployError::MissingEnv(name));
        Ok(Config {
            fuel_url: required("FUEL_URL")?,
            deployer_pk: required("DEPLOYER_PK")?,
            contracts_dir: var("CONTRACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTRACTS_DIR)),
        })
    }
}

/// Reads the process environment, after loading `.env` if there is one.
pub fn config() -> Result<Config> {
    if let Ok(path) = dotenv() {
        debug!(path = %path.display(), "loaded .env");
    }
    Config::from_vars(|name| std::env::var(name).ok())
}

pub async fn get_wallet(config: &Config) -> Result<WalletUnlocked> {
    let deployer_pk = SecretKey::from_str(&config.deployer_pk)
        .map_err(|e| DeployError::InvalidKey(e.to_string()))?;
    let provider = Provider::connect(&config.fuel_url)
        .await
        .map_err(|e| DeployError::Connect {
            url: config.fuel_url.clone(),
            source: e.into(),
        })?;
    Ok(WalletUnlocked::new_from_private_key(deployer_pk, Some(provider)))
}

/// Diagnostics go to stderr; stdout is reserved for the deployment result.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
