pub mod rpc;
pub mod submit;

pub use rpc::*;
pub use submit::*;

use anchor_client::solana_sdk::{pubkey::Pubkey, signature::Signature};
use async_trait::async_trait;

use crate::{candy_machine::CandyMachineState, errors::ChainError, guards::RuleSet};

/// Collection membership of an owned NFT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCollection {
    pub address: Pubkey,
    pub verified: bool,
}

/// An NFT held by the identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedAsset {
    pub mint: Pubkey,
    pub token_account: Pubkey,
    pub metadata: Pubkey,
    pub collection: Option<AssetCollection>,
}

impl OwnedAsset {
    pub fn is_verified_member(&self, collection: &Pubkey) -> bool {
        matches!(
            &self.collection,
            Some(AssetCollection { address, verified: true }) if address == collection
        )
    }
}

/// Read access to the chain. Every call is a single request; no retries.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn get_slot(&self) -> Result<u64, ChainError>;

    /// Block time of `slot`, `None` when the chain does not expose one.
    async fn get_block_time(&self, slot: u64) -> Result<Option<i64>, ChainError>;

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainError>;

    /// Raw amount held by a token account, `None` when the account does not
    /// exist.
    async fn get_token_account_balance(&self, account: &Pubkey)
        -> Result<Option<u64>, ChainError>;

    /// Account data, `None` when the account does not exist.
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError>;

    async fn find_candy_machine(&self, address: &Pubkey) -> Result<CandyMachineState, ChainError>;

    async fn find_assets_by_owner(&self, owner: &Pubkey) -> Result<Vec<OwnedAsset>, ChainError>;
}

/// Allow list proof submission for a guard group.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub candy_machine: Pubkey,
    pub candy_guard: Pubkey,
    pub minter: Pubkey,
    /// `None` selects the default guard set.
    pub group: Option<String>,
    pub merkle_root: [u8; 32],
    pub merkle_proof: Vec<[u8; 32]>,
}

/// Everything needed to issue one mint transaction.
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub candy_machine: CandyMachineState,
    pub candy_guard: Pubkey,
    pub minter: Pubkey,
    /// `None` selects the default guard set.
    pub group: Option<String>,
    pub rules: RuleSet,
    pub guards: MintGuardArgs,
}

/// Mint-time guard arguments picked from the identity's holdings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MintGuardArgs {
    pub nft_gate: Option<OwnedAsset>,
}

/// Write access to the chain. Each call issues exactly one transaction.
#[async_trait]
pub trait MintSubmitter: Send + Sync {
    async fn route_allow_list_proof(&self, request: &RouteRequest)
        -> Result<Signature, ChainError>;

    async fn mint(&self, request: &MintRequest) -> Result<Signature, ChainError>;
}
