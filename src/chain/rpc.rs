use std::sync::Arc;

use anchor_client::solana_sdk::{
    account::Account,
    commitment_config::{CommitmentConfig, CommitmentLevel},
    pubkey::Pubkey,
};
use anchor_lang::{AccountDeserialize, AnchorDeserialize};
use async_trait::async_trait;
use mpl_candy_guard::state::{CandyGuardData, DATA_OFFSET};
use mpl_candy_machine_core::CandyMachine;
use mpl_token_metadata::state::Metadata;
use solana_account_decoder::UiAccountEncoding;
use solana_client::{
    client_error::ClientErrorKind,
    nonblocking::rpc_client::RpcClient,
    rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig},
    rpc_filter::{Memcmp, MemcmpEncodedBytes, RpcFilterType},
    rpc_request::RpcError,
};
use solana_program::program_pack::Pack;
use spl_token::state::Account as TokenAccount;
use tracing::{debug, info};

use super::{AssetCollection, ChainReader, OwnedAsset};
use crate::{
    candy_machine::CandyMachineState, errors::ChainError, guards::to_candy_guard_state,
    pdas::find_metadata_pda,
};

// block or slot skipped, missing in long-term storage, not available yet
const BLOCK_TIME_UNAVAILABLE: [i64; 3] = [-32004, -32007, -32009];

const MULTIPLE_ACCOUNTS_LIMIT: usize = 100;

/// `ChainReader` over the Solana JSON RPC API.
pub struct RpcChainReader {
    client: Arc<RpcClient>,
}

impl RpcChainReader {
    pub fn new(client: Arc<RpcClient>) -> Self {
        RpcChainReader { client }
    }

    pub fn from_url(rpc_url: String) -> Self {
        RpcChainReader::new(Arc::new(RpcClient::new_with_commitment(
            rpc_url,
            CommitmentConfig::confirmed(),
        )))
    }

    pub fn client(&self) -> Arc<RpcClient> {
        Arc::clone(&self.client)
    }

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, ChainError> {
        Ok(self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await?
            .value)
    }

    async fn load_candy_guard(
        &self,
        candy_machine: &CandyMachine,
    ) -> Result<Option<crate::guards::CandyGuardState>, ChainError> {
        let address = candy_machine.mint_authority;
        let account = match self.get_account(&address).await? {
            Some(account) if account.owner == mpl_candy_guard::ID => account,
            _ => {
                debug!("Mint authority {} is not a candy guard", address);
                return Ok(None);
            }
        };

        let data = account.data.get(DATA_OFFSET..).ok_or_else(|| {
            ChainError::InvalidAccountData(address, "candy guard account too short".to_string())
        })?;
        let candy_guard_data = CandyGuardData::load(data)
            .map_err(|err| ChainError::InvalidAccountData(address, err.to_string()))?;

        to_candy_guard_state(address, &candy_guard_data)
            .map(Some)
            .map_err(|err| ChainError::InvalidAccountData(address, err.to_string()))
    }
}

#[async_trait]
impl ChainReader for RpcChainReader {
    async fn get_slot(&self) -> Result<u64, ChainError> {
        Ok(self.client.get_slot().await?)
    }

    async fn get_block_time(&self, slot: u64) -> Result<Option<i64>, ChainError> {
        match self.client.get_block_time(slot).await {
            Ok(time) => Ok(Some(time)),
            Err(err) => match err.kind() {
                ClientErrorKind::RpcError(RpcError::RpcResponseError { code, .. })
                    if BLOCK_TIME_UNAVAILABLE.contains(code) =>
                {
                    debug!("Block time for slot {} unavailable: {}", slot, err);
                    Ok(None)
                }
                _ => Err(err.into()),
            },
        }
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainError> {
        Ok(self.client.get_balance(address).await?)
    }

    async fn get_token_account_balance(
        &self,
        account: &Pubkey,
    ) -> Result<Option<u64>, ChainError> {
        match self.get_account(account).await? {
            Some(found) => {
                let token_account = TokenAccount::unpack(&found.data)
                    .map_err(|err| ChainError::InvalidAccountData(*account, err.to_string()))?;
                Ok(Some(token_account.amount))
            }
            None => Ok(None),
        }
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        Ok(self.get_account(address).await?.map(|account| account.data))
    }

    async fn find_candy_machine(&self, address: &Pubkey) -> Result<CandyMachineState, ChainError> {
        let account = self
            .get_account(address)
            .await?
            .ok_or(ChainError::AccountNotFound(*address))?;

        let candy_machine = CandyMachine::try_deserialize(&mut account.data.as_slice())
            .map_err(|err| ChainError::InvalidAccountData(*address, err.to_string()))?;
        let candy_guard = self.load_candy_guard(&candy_machine).await?;

        info!(
            "Loaded candy machine {} ({} of {} redeemed, guard: {})",
            address,
            candy_machine.items_redeemed,
            candy_machine.data.items_available,
            candy_guard
                .as_ref()
                .map(|candy_guard| candy_guard.address.to_string())
                .unwrap_or_else(|| "none".to_string())
        );

        Ok(CandyMachineState::from_account(
            *address,
            &candy_machine,
            candy_guard,
        ))
    }

    async fn find_assets_by_owner(&self, owner: &Pubkey) -> Result<Vec<OwnedAsset>, ChainError> {
        let config = RpcProgramAccountsConfig {
            filters: Some(vec![
                RpcFilterType::DataSize(TokenAccount::LEN as u64),
                RpcFilterType::Memcmp(Memcmp {
                    offset: 32, // owner
                    bytes: MemcmpEncodedBytes::Base58(owner.to_string()),
                    encoding: None,
                }),
            ]),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: None,
                commitment: Some(CommitmentConfig {
                    commitment: CommitmentLevel::Confirmed,
                }),
                min_context_slot: None,
            },
            with_context: None,
        };

        let token_accounts = self
            .client
            .get_program_accounts_with_config(&spl_token::ID, config)
            .await?;

        // NFTs only: a single token held
        let mut holdings = Vec::new();
        for (address, account) in token_accounts {
            let token_account = TokenAccount::unpack(&account.data)
                .map_err(|err| ChainError::InvalidAccountData(address, err.to_string()))?;
            if token_account.amount == 1 {
                holdings.push((token_account.mint, address));
            }
        }

        let mut assets = Vec::with_capacity(holdings.len());
        for chunk in holdings.chunks(MULTIPLE_ACCOUNTS_LIMIT) {
            let metadata_pdas: Vec<Pubkey> = chunk
                .iter()
                .map(|(mint, _)| find_metadata_pda(mint))
                .collect();
            let accounts = self.client.get_multiple_accounts(&metadata_pdas).await?;

            for (((mint, token_account), metadata), account) in
                chunk.iter().zip(metadata_pdas).zip(accounts)
            {
                // fungible tokens with a single unit have no metadata
                let account = match account {
                    Some(account) => account,
                    None => continue,
                };
                let collection = match Metadata::deserialize(&mut account.data.as_slice()) {
                    Ok(metadata) => metadata.collection.map(|collection| AssetCollection {
                        address: collection.key,
                        verified: collection.verified,
                    }),
                    Err(err) => {
                        debug!("Skipping metadata {}: {}", metadata, err);
                        continue;
                    }
                };

                assets.push(OwnedAsset {
                    mint: *mint,
                    token_account: *token_account,
                    metadata,
                    collection,
                });
            }
        }

        debug!("Found {} NFT(s) owned by {}", assets.len(), owner);

        Ok(assets)
    }
}
