use anchor_client::solana_sdk::pubkey::Pubkey;
use mpl_candy_machine_core::CandyMachine;

use crate::guards::CandyGuardState;

pub use mpl_candy_machine_core::ID as CANDY_MACHINE_ID;

/// Live state of a candy machine and its guard layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandyMachineState {
    pub address: Pubkey,
    pub authority: Pubkey,
    pub mint_authority: Pubkey,
    pub collection_mint: Pubkey,
    pub items_available: u64,
    pub items_redeemed: u64,
    /// `None` when the candy machine is not wrapped by a candy guard.
    pub candy_guard: Option<CandyGuardState>,
}

impl CandyMachineState {
    pub fn from_account(
        address: Pubkey,
        candy_machine: &CandyMachine,
        candy_guard: Option<CandyGuardState>,
    ) -> Self {
        CandyMachineState {
            address,
            authority: candy_machine.authority,
            mint_authority: candy_machine.mint_authority,
            collection_mint: candy_machine.collection_mint,
            items_available: candy_machine.data.items_available,
            items_redeemed: candy_machine.items_redeemed,
            candy_guard,
        }
    }

    pub fn items_remaining(&self) -> u64 {
        self.items_available.saturating_sub(self.items_redeemed)
    }
}
