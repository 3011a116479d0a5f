use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing the config file: {0}")]
    ParseError(String),

    #[error("Error opening the config file: {0}")]
    FileOpenError(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("No candy machine defined: pass --candy-machine or set the {0} environment variable")]
    MissingCandyMachineId(String),

    #[error("Invalid candy machine id: {0}")]
    InvalidCandyMachineId(String),

    #[error("Failed to read keypair file {0}: {1}")]
    KeypairError(String, String),
}
