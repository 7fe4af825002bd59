use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use fuels::accounts::ViewOnlyAccount;
use fuels::prelude::*;
use kyc_deploy::deployer::{artifact_path, ContractFactory, ContractFactoryProvider, DeployedContract};
use kyc_deploy::error::BoxError;

pub const BASE_ASSET_ID: AssetId = AssetId::BASE;

// `ret $one` twice; never executed, the node only stores it.
const KYC_BYTECODE: [u8; 8] = [0x24, 0x04, 0x00, 0x00, 0x24, 0x04, 0x00, 0x00];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Nothing,
    Lookup,
    Deploy,
    Confirmation,
}

/// In-process chain that succeeds or fails at a chosen step and records what it was asked.
#[derive(Clone)]
pub struct ScriptedChain {
    address: String,
    fail_at: FailAt,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedChain {
    pub fn new(address: &str, fail_at: FailAt) -> Self {
        ScriptedChain {
            address: address.to_string(),
            fail_at,
            calls: Rc::new(RefCell::new(vec![])),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.borrow_mut().push(call.into());
    }
}

fn failure(kind: io::ErrorKind, msg: &str) -> BoxError {
    io::Error::new(kind, msg.to_string()).into()
}

impl ContractFactoryProvider for ScriptedChain {
    type Factory = ScriptedFactory;

    async fn get_contract_factory(&self, name: &str) -> std::result::Result<ScriptedFactory, BoxError> {
        self.record(format!("lookup:{}", name));
        if self.fail_at == FailAt::Lookup {
            return Err(failure(io::ErrorKind::NotFound, "no artifact for contract"));
        }
        Ok(ScriptedFactory { chain: self.clone() })
    }
}

pub struct ScriptedFactory {
    chain: ScriptedChain,
}

impl ContractFactory for ScriptedFactory {
    type Deployed = ScriptedDeployment;

    async fn deploy(self) -> std::result::Result<ScriptedDeployment, BoxError> {
        self.chain.record("deploy");
        if self.chain.fail_at == FailAt::Deploy {
            return Err(failure(io::ErrorKind::PermissionDenied, "insufficient funds"));
        }
        Ok(ScriptedDeployment { chain: self.chain })
    }
}

pub struct ScriptedDeployment {
    chain: ScriptedChain,
}

impl DeployedContract for ScriptedDeployment {
    fn address(&self) -> String {
        self.chain.address.clone()
    }

    async fn deployed(&mut self) -> std::result::Result<(), BoxError> {
        self.chain.record("deployed");
        if self.chain.fail_at == FailAt::Confirmation {
            return Err(failure(io::ErrorKind::TimedOut, "network timeout"));
        }
        Ok(())
    }
}

pub fn lines(output: Vec<u8>) -> Vec<String> {
    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

pub async fn get_local_wallet() -> WalletUnlocked {
    let mut wallets = launch_custom_provider_and_get_wallets(
        WalletsConfig::new_multiple_assets(
            1,
            vec![AssetConfig {
                id: BASE_ASSET_ID,
                num_coins: 2,
                coin_amount: 1_000_000_000,
            }],
        ),
        None,
        None,
    )
    .await
    .unwrap();
    wallets.pop().unwrap()
}

/// Wallet on a running local node that owns no coins.
pub async fn get_unfunded_wallet() -> WalletUnlocked {
    let funded = get_local_wallet().await;
    let provider = funded.try_provider().unwrap().clone();
    WalletUnlocked::new_random(Some(provider))
}

/// Fresh, empty contracts directory.
pub fn contracts_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("kyc-deploy-{:016x}", rand::random::<u64>()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_kyc_artifact(contracts_dir: &Path) -> PathBuf {
    let path = artifact_path(contracts_dir, "kyc");
    let release = path.parent().unwrap();
    std::fs::create_dir_all(release).unwrap();
    std::fs::write(&path, KYC_BYTECODE).unwrap();
    std::fs::write(release.join("kyc-storage_slots.json"), "[]").unwrap();
    path
}
