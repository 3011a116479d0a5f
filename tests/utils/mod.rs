#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use anchor_client::solana_sdk::{pubkey::Pubkey, signature::Signature};
use async_trait::async_trait;
use guard_checker::{
    candy_machine::CandyMachineState,
    chain::{
        AssetCollection, ChainReader, MintRequest, MintSubmitter, OwnedAsset, RouteRequest,
    },
    constants::{ACCOUNT_DISCRIMINATOR_LEN, DEFAULT_GROUP},
    errors::ChainError,
    guards::{CandyGuardState, Rule, RuleSet},
    pdas::{find_ata, find_mint_limit_counter_pda},
};
use tokio::sync::Notify;

/// In-memory chain that counts every read.
#[derive(Default)]
pub struct MockChain {
    pub candy_machine: Option<CandyMachineState>,
    pub block_time: Option<i64>,
    pub balances: HashMap<Pubkey, u64>,
    pub token_accounts: HashMap<Pubkey, u64>,
    pub accounts: HashMap<Pubkey, Vec<u8>>,
    pub assets: Vec<OwnedAsset>,
    /// Balance and token account reads fail with an RPC error.
    pub fail_reads: bool,

    pub slot_calls: AtomicUsize,
    pub block_time_calls: AtomicUsize,
    pub balance_calls: AtomicUsize,
    pub token_calls: AtomicUsize,
    pub account_calls: AtomicUsize,
    pub candy_machine_calls: AtomicUsize,
    pub asset_calls: AtomicUsize,
}

impl MockChain {
    pub fn new(candy_machine: CandyMachineState) -> Self {
        MockChain {
            candy_machine: Some(candy_machine),
            ..MockChain::default()
        }
    }

    pub fn with_time(mut self, time: i64) -> Self {
        self.block_time = Some(time);
        self
    }

    pub fn with_balance(mut self, owner: Pubkey, lamports: u64) -> Self {
        self.balances.insert(owner, lamports);
        self
    }

    pub fn with_tokens(mut self, owner: Pubkey, mint: Pubkey, amount: u64) -> Self {
        self.token_accounts.insert(find_ata(&owner, &mint), amount);
        self
    }

    pub fn with_minted(mut self, id: u8, owner: Pubkey, count: u16) -> Self {
        let candy_machine = self.candy_machine.as_ref().unwrap();
        let (counter, _) = find_mint_limit_counter_pda(
            id,
            &owner,
            &candy_machine.mint_authority,
            &candy_machine.address,
        );
        let mut data = vec![0u8; ACCOUNT_DISCRIMINATOR_LEN];
        data.extend_from_slice(&count.to_le_bytes());
        self.accounts.insert(counter, data);
        self
    }

    pub fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn with_asset(mut self, asset: OwnedAsset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn total_calls(&self) -> usize {
        [
            &self.slot_calls,
            &self.block_time_calls,
            &self.balance_calls,
            &self.token_calls,
            &self.account_calls,
            &self.candy_machine_calls,
            &self.asset_calls,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::SeqCst))
        .sum()
    }
}

fn count(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::SeqCst);
}

#[async_trait]
impl ChainReader for MockChain {
    async fn get_slot(&self) -> Result<u64, ChainError> {
        count(&self.slot_calls);
        Ok(42)
    }

    async fn get_block_time(&self, _slot: u64) -> Result<Option<i64>, ChainError> {
        count(&self.block_time_calls);
        Ok(self.block_time)
    }

    async fn get_balance(&self, address: &Pubkey) -> Result<u64, ChainError> {
        count(&self.balance_calls);
        if self.fail_reads {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(self.balances.get(address).copied().unwrap_or(0))
    }

    async fn get_token_account_balance(
        &self,
        account: &Pubkey,
    ) -> Result<Option<u64>, ChainError> {
        count(&self.token_calls);
        if self.fail_reads {
            return Err(ChainError::Rpc("connection refused".to_string()));
        }
        Ok(self.token_accounts.get(account).copied())
    }

    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>, ChainError> {
        count(&self.account_calls);
        Ok(self.accounts.get(address).cloned())
    }

    async fn find_candy_machine(&self, address: &Pubkey) -> Result<CandyMachineState, ChainError> {
        count(&self.candy_machine_calls);
        self.candy_machine
            .clone()
            .ok_or(ChainError::AccountNotFound(*address))
    }

    async fn find_assets_by_owner(&self, _owner: &Pubkey) -> Result<Vec<OwnedAsset>, ChainError> {
        count(&self.asset_calls);
        Ok(self.assets.clone())
    }
}

/// Records every submission instead of sending it.
#[derive(Default)]
pub struct MockSubmitter {
    pub routes: Mutex<Vec<RouteRequest>>,
    pub mints: Mutex<Vec<MintRequest>>,
    /// When set, `mint` waits for a notification before completing.
    pub gate: Option<Arc<Notify>>,
    pub fail_mint: bool,
}

impl MockSubmitter {
    pub fn routes(&self) -> Vec<RouteRequest> {
        self.routes.lock().unwrap().clone()
    }

    pub fn mints(&self) -> Vec<MintRequest> {
        self.mints.lock().unwrap().clone()
    }
}

#[async_trait]
impl MintSubmitter for MockSubmitter {
    async fn route_allow_list_proof(
        &self,
        request: &RouteRequest,
    ) -> Result<Signature, ChainError> {
        self.routes.lock().unwrap().push(request.clone());
        Ok(Signature::new_unique())
    }

    async fn mint(&self, request: &MintRequest) -> Result<Signature, ChainError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_mint {
            return Err(ChainError::Transaction("insufficient funds".to_string()));
        }
        self.mints.lock().unwrap().push(request.clone());
        Ok(Signature::new_unique())
    }
}

pub fn rule_set(label: &str, rules: Vec<Rule>) -> RuleSet {
    RuleSet::new(label, rules).unwrap()
}

/// A candy machine wrapped by a candy guard with the given rule sets.
pub fn guarded_candy_machine(default: Vec<Rule>, groups: Vec<(&str, Vec<Rule>)>) -> CandyMachineState {
    let candy_guard = Pubkey::new_unique();

    CandyMachineState {
        address: Pubkey::new_unique(),
        authority: Pubkey::new_unique(),
        mint_authority: candy_guard,
        collection_mint: Pubkey::new_unique(),
        items_available: 100,
        items_redeemed: 10,
        candy_guard: Some(CandyGuardState {
            address: candy_guard,
            default: rule_set(DEFAULT_GROUP, default),
            groups: groups
                .into_iter()
                .map(|(label, rules)| rule_set(label, rules))
                .collect(),
        }),
    }
}

pub fn unguarded_candy_machine() -> CandyMachineState {
    CandyMachineState {
        address: Pubkey::new_unique(),
        authority: Pubkey::new_unique(),
        mint_authority: Pubkey::new_unique(),
        collection_mint: Pubkey::new_unique(),
        items_available: 100,
        items_redeemed: 0,
        candy_guard: None,
    }
}

pub fn nft(collection: Pubkey, verified: bool) -> OwnedAsset {
    OwnedAsset {
        mint: Pubkey::new_unique(),
        token_account: Pubkey::new_unique(),
        metadata: Pubkey::new_unique(),
        collection: Some(AssetCollection {
            address: collection,
            verified,
        }),
    }
}
