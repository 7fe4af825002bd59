#![allow(async_fn_in_trait)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use fuels::accounts::{Account, ViewOnlyAccount};
use fuels::prelude::{Contract, ContractId, LoadConfiguration, Provider, TxPolicies, WalletUnlocked};
use fuels::programs::contract::Regular;
use fuels::types::transaction_builders::CreateTransactionBuilder;
use fuels::types::tx_status::TxStatus;
use fuels::types::{Bytes32, Salt};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::BoxError;

const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(200);
// Headroom on the dry-run fee estimate, same as the SDK's own deploy.
const MAX_FEE_ESTIMATION_TOLERANCE: f32 = 0.05;

/// Resolves deployable contracts by name.
pub trait ContractFactoryProvider {
    type Factory: ContractFactory;

    async fn get_contract_factory(&self, name: &str) -> Result<Self::Factory, BoxError>;
}

pub trait ContractFactory {
    type Deployed: DeployedContract;

    /// Submits the deployment and returns as soon as it is in flight.
    async fn deploy(self) -> Result<Self::Deployed, BoxError>;
}

pub trait DeployedContract {
    fn address(&self) -> String;

    /// Resolves once the network has committed the deployment.
    async fn deployed(&mut self) -> Result<(), BoxError>;
}

/// Fuel network reached through a funded wallet. Contracts are `forc` release
/// artifacts under `contracts_dir`.
#[derive(Clone)]
pub struct FuelChain {
    wallet: WalletUnlocked,
    contracts_dir: PathBuf,
}

impl FuelChain {
    pub fn new(wallet: WalletUnlocked, contracts_dir: impl Into<PathBuf>) -> Self {
        FuelChain {
            wallet,
            contracts_dir: contracts_dir.into(),
        }
    }

    pub fn artifact_path(&self, contract: &str) -> PathBuf {
        artifact_path(&self.contracts_dir, contract)
    }
}

pub fn artifact_path(contracts_dir: &Path, contract: &str) -> PathBuf {
    contracts_dir
        .join(contract)
        .join("out")
        .join("release")
        .join(format!("{}.bin", contract))
}

impl ContractFactoryProvider for FuelChain {
    type Factory = FuelContractFactory;

    async fn get_contract_factory(&self, name: &str) -> Result<FuelContractFactory, BoxError> {
        let path = self.artifact_path(name);
        debug!(contract = name, path = %path.display(), "loading contract artifact");
        // forc writes `<name>-storage_slots.json` next to the binary, the default config loads it
        let contract = Contract::load_from(&path, LoadConfiguration::default())?;
        Ok(FuelContractFactory {
            wallet: self.wallet.clone(),
            contract,
        })
    }
}

pub struct FuelContractFactory {
    wallet: WalletUnlocked,
    contract: Contract<Regular>,
}

impl ContractFactory for FuelContractFactory {
    type Deployed = FuelDeployment;

    /// Funds, signs and submits the create transaction. Returns once the node has
    /// accepted it, before it is committed.
    async fn deploy(self) -> Result<FuelDeployment, BoxError> {
        let salt = Salt::from(rand::thread_rng().gen::<[u8; 32]>());
        let contract = self.contract.with_salt(salt);
        let contract_id = contract.contract_id();
        info!(
            deployer = ?self.wallet.address().hash,
            contract_id = %format!("{:#x}", contract_id),
            "submitting deployment"
        );

        let mut tb = CreateTransactionBuilder::prepare_contract_deployment(
            contract.code(),
            contract_id,
            contract.state_root(),
            salt,
            contract.storage_slots().to_vec(),
            TxPolicies::default(),
        )
        .with_max_fee_estimation_tolerance(MAX_FEE_ESTIMATION_TOLERANCE);
        self.wallet.add_witnesses(&mut tb)?;
        self.wallet.adjust_for_fee(&mut tb, 0).await?;

        let provider = self.wallet.try_provider()?.clone();
        let tx = tb.build(&provider).await?;
        let tx_id = provider.send_transaction(tx).await?;
        debug!(tx_id = %format!("{:#x}", tx_id), "deployment submitted");

        Ok(FuelDeployment {
            contract_id,
            provider,
            tx_id,
            committed: false,
        })
    }
}

/// A submitted create transaction.
pub struct FuelDeployment {
    contract_id: ContractId,
    provider: Provider,
    tx_id: Bytes32,
    committed: bool,
}

impl DeployedContract for FuelDeployment {
    fn address(&self) -> String {
        format!("{:#x}", self.contract_id)
    }

    /// Polls the node until the transaction leaves the pool. Returns immediately once
    /// the deployment has been seen committed.
    async fn deployed(&mut self) -> Result<(), BoxError> {
        if self.committed {
            return Ok(());
        }
        loop {
            match self.provider.tx_status(&self.tx_id).await? {
                TxStatus::Submitted => tokio::time::sleep(STATUS_POLL_INTERVAL).await,
                status => {
                    status.check(None)?;
                    break;
                }
            }
        }
        self.committed = true;
        info!(contract_id = %format!("{:#x}", self.contract_id), "deployment committed");
        Ok(())
    }
}

impl Drop for FuelDeployment {
    fn drop(&mut self) {
        if !self.committed {
            warn!(
                contract_id = %format!("{:#x}", self.contract_id),
                tx_id = %format!("{:#x}", self.tx_id),
                "deployment dropped before confirmation, the transaction may still land"
            );
        }
    }
}
