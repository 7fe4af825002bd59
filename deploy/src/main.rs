use kyc_deploy::shared::init_tracing;
use kyc_deploy::DeployTarget;

#[tokio::main]
async fn main() {
    init_tracing();
    let code = kyc_deploy::run_target(DeployTarget::OnChain).await;
    std::process::exit(code);
}
