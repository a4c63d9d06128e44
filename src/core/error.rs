use thiserror::Error;

#[derive(Error, Debug)]
pub enum FloodError {
    #[error(
        "Unknown network type: '{0}'. Currently implemented network types are: \
         'erdos_renyi', 'barabasi_albert', 'watts_strogatz', and 'no_network'"
    )]
    UnknownNetwork(String),

    #[error(
        "Unknown flood map choice: '{0}'. Currently implemented choices are: \
         'harvey', '100yr', '500yr'"
    )]
    UnknownFloodMap(String),

    #[error("Unknown organisational structure: '{0}'. Expected 'centralised' or 'decentralised'")]
    UnknownStructure(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FloodError>;
