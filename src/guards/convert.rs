use mpl_candy_guard::state::{CandyGuardData, GuardSet};
use tracing::debug;

use super::{CandyGuardState, Rule, RuleSet};
use crate::{
    common::Pubkey,
    constants::DEFAULT_GROUP,
    errors::GuardError,
};

/// Builds the off-chain rule set for a guard set read from the candy guard
/// account.
pub fn to_rule_set(label: &str, guard_set: &GuardSet) -> Result<RuleSet, GuardError> {
    let mut rules = Vec::new();

    if let Some(address_gate) = &guard_set.address_gate {
        rules.push(Rule::AddressGate {
            address: address_gate.address,
        });
    }
    if let Some(allow_list) = &guard_set.allow_list {
        rules.push(Rule::AllowList {
            merkle_root: allow_list.merkle_root,
        });
    }
    if let Some(end_date) = &guard_set.end_date {
        rules.push(Rule::EndDate {
            date: end_date.date,
        });
    }
    if let Some(freeze_sol_payment) = &guard_set.freeze_sol_payment {
        rules.push(Rule::FreezeSolPayment {
            lamports: freeze_sol_payment.lamports,
            destination: freeze_sol_payment.destination,
        });
    }
    if let Some(mint_limit) = &guard_set.mint_limit {
        rules.push(Rule::MintLimit {
            id: mint_limit.id,
            limit: mint_limit.limit,
        });
    }
    if let Some(freeze_token_payment) = &guard_set.freeze_token_payment {
        rules.push(Rule::FreezeTokenPayment {
            amount: freeze_token_payment.amount,
            mint: freeze_token_payment.mint,
            destination_ata: freeze_token_payment.destination_ata,
        });
    }
    if let Some(nft_burn) = &guard_set.nft_burn {
        rules.push(Rule::NftBurn {
            required_collection: nft_burn.required_collection,
        });
    }
    if let Some(nft_gate) = &guard_set.nft_gate {
        rules.push(Rule::NftGate {
            required_collection: nft_gate.required_collection,
        });
    }
    if let Some(nft_payment) = &guard_set.nft_payment {
        rules.push(Rule::NftPayment {
            required_collection: nft_payment.required_collection,
            destination: nft_payment.destination,
        });
    }
    if let Some(redeemed_amount) = &guard_set.redeemed_amount {
        rules.push(Rule::RedeemedAmount {
            maximum: redeemed_amount.maximum,
        });
    }
    if let Some(sol_payment) = &guard_set.sol_payment {
        rules.push(Rule::SolPayment {
            lamports: sol_payment.lamports,
            destination: sol_payment.destination,
        });
    }
    if let Some(start_date) = &guard_set.start_date {
        rules.push(Rule::StartDate {
            date: start_date.date,
        });
    }
    if let Some(token_burn) = &guard_set.token_burn {
        rules.push(Rule::TokenBurn {
            amount: token_burn.amount,
            mint: token_burn.mint,
        });
    }
    if let Some(token_gate) = &guard_set.token_gate {
        rules.push(Rule::TokenGate {
            amount: token_gate.amount,
            mint: token_gate.mint,
        });
    }
    if let Some(token_payment) = &guard_set.token_payment {
        rules.push(Rule::TokenPayment {
            amount: token_payment.amount,
            mint: token_payment.mint,
            destination_ata: token_payment.destination_ata,
        });
    }

    // enforced on-chain only
    if guard_set.bot_tax.is_some() {
        debug!("Guard set '{}': bot tax has no off-chain check", label);
    }
    if guard_set.third_party_signer.is_some() {
        debug!("Guard set '{}': third party signer has no off-chain check", label);
    }
    if guard_set.gatekeeper.is_some() {
        debug!("Guard set '{}': gatekeeper has no off-chain check", label);
    }
    if guard_set.program_gate.is_some() {
        debug!("Guard set '{}': program gate has no off-chain check", label);
    }
    if guard_set.allocation.is_some() {
        debug!("Guard set '{}': allocation has no off-chain check", label);
    }

    RuleSet::new(label, rules)
}

/// Converts the data section of a candy guard account.
pub fn to_candy_guard_state(
    address: Pubkey,
    data: &CandyGuardData,
) -> Result<CandyGuardState, GuardError> {
    let default = to_rule_set(DEFAULT_GROUP, &data.default)?;

    let groups = if let Some(groups) = &data.groups {
        let mut group_vec = Vec::with_capacity(groups.len());

        for group in groups {
            group_vec.push(to_rule_set(&group.label, &group.guards)?);
        }

        group_vec
    } else {
        Vec::new()
    };

    Ok(CandyGuardState {
        address,
        default,
        groups,
    })
}
