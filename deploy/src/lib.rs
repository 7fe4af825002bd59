pub mod deployer;
pub mod error;
pub mod runner;
pub mod shared;

use std::io;
use std::path::PathBuf;

use fuels::prelude::WalletUnlocked;
use tracing::info;

use crate::deployer::FuelChain;
use crate::error::Result;
use crate::runner::{report_failure, DeploymentRunner, EXIT_FAILURE};
use crate::shared::{config, get_wallet, Config};

pub enum DeployTarget {
    /// Already funded wallet, typically on a local test node.
    Local {
        wallet: WalletUnlocked,
        contracts_dir: PathBuf,
    },
    /// Network and deployer taken from the environment.
    OnChain,
}

pub async fn connect(target: DeployTarget) -> Result<FuelChain> {
    connect_with(target, config).await
}

/// Like [`connect`], with the on-chain config coming from `load_config` instead of the environment.
pub async fn connect_with<F>(target: DeployTarget, load_config: F) -> Result<FuelChain>
where
    F: FnOnce() -> Result<Config>,
{
    match target {
        DeployTarget::Local { wallet, contracts_dir } => Ok(FuelChain::new(wallet, contracts_dir)),
        DeployTarget::OnChain => {
            let config = load_config()?;
            info!(?config, "deploying on chain");
            let wallet = get_wallet(&config).await?;
            Ok(FuelChain::new(wallet, config.contracts_dir))
        }
    }
}

/// Deploys the KYC contract to `target`, reporting on stdout. Returns the exit code.
pub async fn run_target(target: DeployTarget) -> i32 {
    let chain = match connect(target).await {
        Ok(chain) => chain,
        Err(err) => {
            report_failure(&mut io::stdout(), &err);
            return EXIT_FAILURE;
        }
    };
    let mut runner = DeploymentRunner::new(chain, io::stdout());
    runner.run().await
}
