use std::fmt::{self, Display};

use anchor_client::solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::guards::RuleKind;

/// Transport and chain errors. Never retried here; surfaced to the caller.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    Rpc(String),

    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    #[error("Failed to deserialize account {0}: {1}")]
    InvalidAccountData(Pubkey, String),

    #[error("Transaction failed: {0}")]
    Transaction(String),
}

impl From<solana_client::client_error::ClientError> for ChainError {
    fn from(error: solana_client::client_error::ClientError) -> Self {
        ChainError::Rpc(error.to_string())
    }
}

/// Operator mistakes in the guard configuration or the local registry. These
/// block the action that hit them, not the whole evaluation.
#[derive(Debug, Error)]
pub enum GuardError {
    #[error("Allow list for group '{0}' is missing from the registry")]
    MissingAllowList(String),

    #[error("Address {1} is not part of the allow list for group '{0}'")]
    NotAllowListed(String, Pubkey),

    #[error("No guard configured for group '{0}'; minting is not possible")]
    NoGuardConfigured(String),

    #[error("Guard set '{0}' contains more than one {1} guard")]
    DuplicateRule(String, RuleKind),

    #[error("No wallet connected")]
    WalletNotConnected,

    #[error("A mint attempt is already in progress")]
    MintInProgress,

    #[error("No owned NFT from collection {0} can satisfy the nft gate guard")]
    MissingGateNft(Pubkey),

    #[error("The {0} guard is not supported by the bundled minter")]
    UnsupportedGuard(RuleKind),
}

/// Step of a mint attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintStage {
    Refreshing,
    Resolving,
    Routing,
    Assembling,
    Submitting,
}

impl Display for MintStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            MintStage::Refreshing => "refreshing candy machine",
            MintStage::Resolving => "resolving guard group",
            MintStage::Routing => "calling guard routes",
            MintStage::Assembling => "assembling mint arguments",
            MintStage::Submitting => "submitting mint",
        };
        f.write_str(stage)
    }
}

#[derive(Debug, Error)]
pub enum MintFailure {
    #[error(transparent)]
    Config(#[from] GuardError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

#[derive(Debug, Error)]
#[error("Mint failed while {stage}: {source}")]
pub struct MintError {
    pub stage: MintStage,
    #[source]
    pub source: MintFailure,
}

impl MintError {
    pub fn new<E: Into<MintFailure>>(stage: MintStage, error: E) -> Self {
        MintError {
            stage,
            source: error.into(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self.source, MintFailure::Config(_))
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Error setting up guard checker: {0}")]
    GuardCheckerSetupError(String),
}
