pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = DeployError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("missing env var {0}")]
    MissingEnv(&'static str),
    #[error("invalid deployer private key: {0}")]
    InvalidKey(String),
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to resolve contract `{name}`: {source}")]
    Lookup {
        name: String,
        #[source]
        source: BoxError,
    },
    #[error("failed to submit deployment of `{name}`: {source}")]
    Deploy {
        name: String,
        #[source]
        source: BoxError,
    },
    #[error("deployment of `{name}` was not confirmed: {source}")]
    Confirmation {
        name: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to write deployment output: {0}")]
    Output(#[from] std::io::Error),
}
