use anchor_client::solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::{
    chain::ChainReader,
    constants::{ACCOUNT_DISCRIMINATOR_LEN, UNAVAILABLE_TIME},
    errors::ChainError,
    identity::Identity,
    pdas::{find_ata, find_mint_limit_counter_pda},
};

/// Time and balances shared by every rule set of one evaluation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OracleSnapshot {
    /// Unix timestamp, `UNAVAILABLE_TIME` when not fetched or unknown.
    pub current_time: i64,
    /// Lamports, 0 when not fetched.
    pub sol_balance: u64,
}

impl OracleSnapshot {
    pub fn has_clock(&self) -> bool {
        self.current_time != UNAVAILABLE_TIME
    }
}

/// Chain reads behind the guard checks. A disconnected identity reads as
/// zero without touching the chain.
pub struct Oracle<'a, R: ChainReader + ?Sized> {
    reader: &'a R,
}

impl<'a, R: ChainReader + ?Sized> Oracle<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Oracle { reader }
    }

    /// Block time of the latest slot, `UNAVAILABLE_TIME` when the chain has
    /// none.
    pub async fn current_time(&self) -> Result<i64, ChainError> {
        let slot = self.reader.get_slot().await?;
        let time = self.reader.get_block_time(slot).await?;

        if time.is_none() {
            debug!("No block time for slot {}", slot);
        }

        Ok(time.unwrap_or(UNAVAILABLE_TIME))
    }

    pub async fn sol_balance(&self, identity: &Identity) -> Result<u64, ChainError> {
        if !identity.is_connected() {
            return Ok(0);
        }
        self.reader.get_balance(identity.address()).await
    }

    /// Balance of the identity's associated token account for `mint`.
    pub async fn token_balance(&self, identity: &Identity, mint: &Pubkey) -> Result<u64, ChainError> {
        if !identity.is_connected() {
            return Ok(0);
        }
        let ata = find_ata(identity.address(), mint);
        Ok(self
            .reader
            .get_token_account_balance(&ata)
            .await?
            .unwrap_or(0))
    }

    /// Mints already made by the identity under the mint limit guard `id`.
    pub async fn minted_count(
        &self,
        id: u8,
        identity: &Identity,
        candy_guard: &Pubkey,
        candy_machine: &Pubkey,
    ) -> Result<u16, ChainError> {
        if !identity.is_connected() {
            return Ok(0);
        }

        let (counter, _) =
            find_mint_limit_counter_pda(id, identity.address(), candy_guard, candy_machine);

        match self.reader.get_account_data(&counter).await? {
            Some(data) => decode_mint_counter(&counter, &data),
            None => Ok(0),
        }
    }
}

/// Reads the `count` of a mint counter account (discriminator + u16).
pub fn decode_mint_counter(address: &Pubkey, data: &[u8]) -> Result<u16, ChainError> {
    let start = ACCOUNT_DISCRIMINATOR_LEN;
    let bytes = data.get(start..start + 2).ok_or_else(|| {
        ChainError::InvalidAccountData(*address, "mint counter too short".to_string())
    })?;

    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}
