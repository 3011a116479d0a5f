use std::sync::Arc;

use anchor_client::solana_sdk::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_instruction, system_program, sysvar,
    transaction::Transaction,
};
use anchor_lang::{AnchorSerialize, InstructionData};
use mpl_candy_guard::{instructions::RouteArgs, state::GuardType};
use solana_client::nonblocking::rpc_client::RpcClient;
use spl_associated_token_account::create_associated_token_account;
use spl_token::{
    instruction::{initialize_mint, mint_to},
    ID as TOKEN_PROGRAM_ID,
};
use tracing::{debug, info};

use super::{MintRequest, MintSubmitter, RouteRequest};
use crate::{
    constants::MINT_LAYOUT,
    errors::{ChainError, GuardError},
    guards::{Rule, RuleKind},
    pdas::*,
};

/// Order in which the candy guard program consumes the remaining accounts of
/// the mint instruction.
const REMAINING_ACCOUNTS_ORDER: [RuleKind; 15] = [
    RuleKind::SolPayment,
    RuleKind::TokenPayment,
    RuleKind::StartDate,
    RuleKind::TokenGate,
    RuleKind::EndDate,
    RuleKind::AllowList,
    RuleKind::MintLimit,
    RuleKind::NftPayment,
    RuleKind::RedeemedAmount,
    RuleKind::AddressGate,
    RuleKind::NftGate,
    RuleKind::NftBurn,
    RuleKind::TokenBurn,
    RuleKind::FreezeSolPayment,
    RuleKind::FreezeTokenPayment,
];

/// `MintSubmitter` signing with a local keypair and sending over JSON RPC.
pub struct RpcMintSubmitter {
    client: Arc<RpcClient>,
    payer: Arc<Keypair>,
}

impl RpcMintSubmitter {
    pub fn new(client: Arc<RpcClient>, payer: Arc<Keypair>) -> Self {
        RpcMintSubmitter { client, payer }
    }

    async fn send(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<Signature, ChainError> {
        let blockhash = self.client.get_latest_blockhash().await?;

        let mut all_signers = vec![self.payer.as_ref()];
        all_signers.extend_from_slice(signers);

        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &all_signers,
            blockhash,
        );

        self.client
            .send_and_confirm_transaction(&tx)
            .await
            .map_err(|err| ChainError::Transaction(err.to_string()))
    }
}

/// Accounts the mint instruction expects after the fixed ones, one batch per
/// active guard.
pub fn guard_remaining_accounts(request: &MintRequest) -> Result<Vec<AccountMeta>, GuardError> {
    let payer = request.minter;
    let mut accounts = Vec::new();

    for kind in REMAINING_ACCOUNTS_ORDER {
        let rule = match request.rules.get(kind) {
            Some(rule) => rule,
            None => continue,
        };

        match rule {
            Rule::SolPayment { destination, .. } => {
                accounts.push(AccountMeta::new(*destination, false));
            }
            Rule::TokenPayment {
                mint,
                destination_ata,
                ..
            } => {
                accounts.push(AccountMeta::new(find_ata(&payer, mint), false));
                accounts.push(AccountMeta::new(*destination_ata, false));
            }
            Rule::TokenGate { mint, .. } => {
                accounts.push(AccountMeta::new_readonly(find_ata(&payer, mint), false));
            }
            Rule::AllowList { merkle_root } => {
                let (proof, _) = find_allow_list_proof_pda(
                    merkle_root,
                    &payer,
                    &request.candy_guard,
                    &request.candy_machine.address,
                );
                accounts.push(AccountMeta::new_readonly(proof, false));
            }
            Rule::MintLimit { id, .. } => {
                let (counter, _) = find_mint_limit_counter_pda(
                    *id,
                    &payer,
                    &request.candy_guard,
                    &request.candy_machine.address,
                );
                accounts.push(AccountMeta::new(counter, false));
            }
            Rule::NftGate {
                required_collection,
            } => {
                let asset = request
                    .guards
                    .nft_gate
                    .as_ref()
                    .ok_or(GuardError::MissingGateNft(*required_collection))?;
                accounts.push(AccountMeta::new_readonly(asset.token_account, false));
                accounts.push(AccountMeta::new_readonly(asset.metadata, false));
            }
            Rule::TokenBurn { mint, .. } => {
                accounts.push(AccountMeta::new(find_ata(&payer, mint), false));
                accounts.push(AccountMeta::new(*mint, false));
            }
            Rule::StartDate { .. }
            | Rule::EndDate { .. }
            | Rule::RedeemedAmount { .. }
            | Rule::AddressGate { .. } => {}
            Rule::NftPayment { .. }
            | Rule::NftBurn { .. }
            | Rule::FreezeSolPayment { .. }
            | Rule::FreezeTokenPayment { .. } => {
                return Err(GuardError::UnsupportedGuard(rule.kind()));
            }
        }
    }

    Ok(accounts)
}

#[async_trait::async_trait]
impl MintSubmitter for RpcMintSubmitter {
    async fn route_allow_list_proof(
        &self,
        request: &RouteRequest,
    ) -> Result<Signature, ChainError> {
        let (proof_pda, _) = find_allow_list_proof_pda(
            &request.merkle_root,
            &request.minter,
            &request.candy_guard,
            &request.candy_machine,
        );

        let data = request
            .merkle_proof
            .try_to_vec()
            .map_err(|err| ChainError::Transaction(err.to_string()))?;

        let route_ix = Instruction {
            program_id: mpl_candy_guard::ID,
            accounts: vec![
                AccountMeta::new_readonly(request.candy_guard, false),
                AccountMeta::new(request.candy_machine, false),
                AccountMeta::new(self.payer.pubkey(), true),
                // allow list route
                AccountMeta::new(proof_pda, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ],
            data: mpl_candy_guard::instruction::Route {
                args: RouteArgs {
                    data,
                    guard: GuardType::AllowList,
                },
                label: request.group.clone(),
            }
            .data(),
        };

        let signature = self.send(&[route_ix], &[]).await?;
        info!("Allow list proof stored in {}: {}", proof_pda, signature);

        Ok(signature)
    }

    async fn mint(&self, request: &MintRequest) -> Result<Signature, ChainError> {
        let payer = self.payer.pubkey();
        let candy_machine = &request.candy_machine;

        let remaining_accounts = guard_remaining_accounts(request)
            .map_err(|err| ChainError::Transaction(err.to_string()))?;

        let nft_mint = Keypair::new();

        // Allocate memory for the account
        let min_rent = self
            .client
            .get_minimum_balance_for_rent_exemption(MINT_LAYOUT as usize)
            .await?;

        // Create mint account
        let create_mint_account_ix = system_instruction::create_account(
            &payer,
            &nft_mint.pubkey(),
            min_rent,
            MINT_LAYOUT,
            &TOKEN_PROGRAM_ID,
        );

        // Initalize mint ix
        let init_mint_ix = initialize_mint(
            &TOKEN_PROGRAM_ID,
            &nft_mint.pubkey(),
            &payer,
            Some(&payer),
            0,
        )
        .map_err(|err| ChainError::Transaction(err.to_string()))?;

        let assoc = find_ata(&payer, &nft_mint.pubkey());

        let create_assoc_account_ix =
            create_associated_token_account(&payer, &payer, &nft_mint.pubkey());

        let mint_to_ix = mint_to(
            &TOKEN_PROGRAM_ID,
            &nft_mint.pubkey(),
            &assoc,
            &payer,
            &[],
            1,
        )
        .map_err(|err| ChainError::Transaction(err.to_string()))?;

        let (authority_pda, _) = find_candy_machine_authority_pda(&candy_machine.address);
        let collection_mint = candy_machine.collection_mint;

        let mut accounts = vec![
            AccountMeta::new_readonly(request.candy_guard, false),
            AccountMeta::new_readonly(mpl_candy_machine_core::ID, false),
            AccountMeta::new(candy_machine.address, false),
            AccountMeta::new(authority_pda, false),
            AccountMeta::new(payer, true),
            AccountMeta::new(find_metadata_pda(&nft_mint.pubkey()), false),
            AccountMeta::new(nft_mint.pubkey(), false),
            AccountMeta::new_readonly(payer, true),
            AccountMeta::new(find_master_edition_pda(&nft_mint.pubkey()), false),
            AccountMeta::new_readonly(
                find_collection_authority_pda(&collection_mint, &authority_pda),
                false,
            ),
            AccountMeta::new_readonly(collection_mint, false),
            AccountMeta::new(find_metadata_pda(&collection_mint), false),
            AccountMeta::new_readonly(find_master_edition_pda(&collection_mint), false),
            AccountMeta::new_readonly(candy_machine.authority, false),
            AccountMeta::new_readonly(mpl_token_metadata::ID, false),
            AccountMeta::new_readonly(TOKEN_PROGRAM_ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(sysvar::rent::ID, false),
            AccountMeta::new_readonly(sysvar::slot_hashes::ID, false),
            AccountMeta::new_readonly(sysvar::instructions::ID, false),
        ];
        accounts.extend(remaining_accounts);

        let mint_ix = Instruction {
            program_id: mpl_candy_guard::ID,
            accounts,
            data: mpl_candy_guard::instruction::Mint {
                mint_args: vec![],
                label: request.group.clone(),
            }
            .data(),
        };

        debug!(
            "Minting {} from {} with group {:?}",
            nft_mint.pubkey(),
            candy_machine.address,
            request.group
        );

        let signature = self
            .send(
                &[
                    create_mint_account_ix,
                    init_mint_ix,
                    create_assoc_account_ix,
                    mint_to_ix,
                    mint_ix,
                ],
                &[&nft_mint],
            )
            .await?;

        info!("Minted {}! TxId: {}", nft_mint.pubkey(), signature);

        Ok(signature)
    }
}
