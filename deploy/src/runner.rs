use std::io::Write;

use tracing::{error, info};

use crate::deployer::{ContractFactory, ContractFactoryProvider, DeployedContract};
use crate::error::{DeployError, Result};

pub const CONTRACT_NAME: &str = "kyc";

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Deploys the KYC contract through `chain`, writing progress and the result to `out`.
pub struct DeploymentRunner<C, W> {
    chain: C,
    out: W,
}

impl<C, W> DeploymentRunner<C, W>
where
    C: ContractFactoryProvider,
    W: Write,
{
    pub fn new(chain: C, out: W) -> Self {
        DeploymentRunner { chain, out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    pub async fn deploy(&mut self) -> Result<String> {
        writeln!(self.out, "Deploying")?;
        let factory = self
            .chain
            .get_contract_factory(CONTRACT_NAME)
            .await
            .map_err(|source| DeployError::Lookup {
                name: CONTRACT_NAME.to_string(),
                source,
            })?;
        let mut contract = factory.deploy().await.map_err(|source| DeployError::Deploy {
            name: CONTRACT_NAME.to_string(),
            source,
        })?;
        writeln!(self.out, "Good")?;
        contract
            .deployed()
            .await
            .map_err(|source| DeployError::Confirmation {
                name: CONTRACT_NAME.to_string(),
                source,
            })?;
        let address = contract.address();
        writeln!(self.out, "KYC Project deployed to: {}", address)?;
        self.out.flush()?;
        Ok(address)
    }

    /// Runs the deployment and maps the outcome to a process exit code. Failures are
    /// logged to `out`, same as the progress lines.
    pub async fn run(&mut self) -> i32 {
        match self.deploy().await {
            Ok(address) => {
                info!(%address, "deployment confirmed");
                EXIT_SUCCESS
            }
            Err(err) => {
                error!(%err, "deployment failed");
                report_failure(&mut self.out, &err);
                EXIT_FAILURE
            }
        }
    }
}

pub fn report_failure<W: Write>(out: &mut W, err: &DeployError) {
    // nothing left to report to if stdout itself is gone
    let _ = writeln!(out, "{:?}", err).and_then(|_| out.flush());
}
