use anchor_client::solana_sdk::pubkey::Pubkey;
use mpl_token_metadata::pda::{
    find_collection_authority_account, find_master_edition_account, find_metadata_account,
};
use spl_associated_token_account::get_associated_token_address;

use crate::{
    candy_machine::CANDY_MACHINE_ID,
    constants::{ALLOW_LIST_SEED, CANDY_MACHINE_SEED, MINT_LIMIT_SEED},
};

pub fn find_ata(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

pub fn find_metadata_pda(mint: &Pubkey) -> Pubkey {
    let (pda, _bump) = find_metadata_account(mint);

    pda
}

pub fn find_master_edition_pda(mint: &Pubkey) -> Pubkey {
    let (pda, _bump) = find_master_edition_account(mint);

    pda
}

pub fn find_collection_authority_pda(mint: &Pubkey, authority: &Pubkey) -> Pubkey {
    let (pda, _bump) = find_collection_authority_account(mint, authority);

    pda
}

pub fn find_candy_machine_authority_pda(candy_machine_id: &Pubkey) -> (Pubkey, u8) {
    let authority_seeds = &[CANDY_MACHINE_SEED.as_bytes(), candy_machine_id.as_ref()];

    Pubkey::find_program_address(authority_seeds, &CANDY_MACHINE_ID)
}

/// Counter of mints by `user` for the mint limit guard `id`.
pub fn find_mint_limit_counter_pda(
    id: u8,
    user: &Pubkey,
    candy_guard: &Pubkey,
    candy_machine: &Pubkey,
) -> (Pubkey, u8) {
    let counter_seeds = &[
        MINT_LIMIT_SEED.as_bytes(),
        &[id],
        user.as_ref(),
        candy_guard.as_ref(),
        candy_machine.as_ref(),
    ];

    Pubkey::find_program_address(counter_seeds, &mpl_candy_guard::ID)
}

/// Proof account created by the allow list route for `user`.
pub fn find_allow_list_proof_pda(
    merkle_root: &[u8; 32],
    user: &Pubkey,
    candy_guard: &Pubkey,
    candy_machine: &Pubkey,
) -> (Pubkey, u8) {
    let proof_seeds = &[
        ALLOW_LIST_SEED.as_bytes(),
        merkle_root.as_ref(),
        user.as_ref(),
        candy_guard.as_ref(),
        candy_machine.as_ref(),
    ];

    Pubkey::find_program_address(proof_seeds, &mpl_candy_guard::ID)
}
