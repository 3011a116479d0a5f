use std::sync::Arc;

use anchor_client::solana_sdk::pubkey::Pubkey;
use futures::future::join_all;
use tracing::{error, info, warn};

use super::{
    DenyReason, EvaluationContext, Evaluation, GuardDecision, Rule, RuleKind, RuleSet,
};
use crate::{
    allow_list::AllowListRegistry,
    candy_machine::CandyMachineState,
    chain::ChainReader,
    constants::DEFAULT_GROUP,
    errors::ChainError,
    identity::Identity,
    oracle::Oracle,
};

/// Decides, per guard group, whether the identity can mint right now.
pub struct GuardEvaluator<R: ChainReader + ?Sized> {
    reader: Arc<R>,
    registry: Arc<AllowListRegistry>,
}

impl<R: ChainReader + ?Sized> GuardEvaluator<R> {
    pub fn new(reader: Arc<R>, registry: Arc<AllowListRegistry>) -> Self {
        GuardEvaluator { reader, registry }
    }

    /// Evaluates every guard group of `candy_machine`, override groups first
    /// and the default set last.
    pub async fn evaluate_all(
        &self,
        identity: Identity,
        candy_machine: &CandyMachineState,
    ) -> Result<Evaluation, ChainError> {
        let candy_guard = match &candy_machine.candy_guard {
            Some(candy_guard) => candy_guard,
            None => {
                warn!("Candy machine {} has no candy guard", candy_machine.address);
                return Ok(Evaluation {
                    decisions: vec![GuardDecision::denied(
                        DEFAULT_GROUP,
                        DenyReason::NoGuardLayer,
                    )],
                    owned_assets: None,
                });
            }
        };

        let rule_sets = candy_guard.rule_sets();

        if !identity.is_connected() {
            info!("No wallet connected, denying every guard group");
            return Ok(Evaluation {
                decisions: rule_sets
                    .iter()
                    .map(|rule_set| {
                        GuardDecision::denied(rule_set.label(), DenyReason::WalletNotConnected)
                    })
                    .collect(),
                owned_assets: None,
            });
        }

        let context =
            EvaluationContext::load(self.reader.as_ref(), identity, candy_machine, &rule_sets)
                .await?;

        if identity.address() == &candy_machine.authority {
            self.log_merkle_roots(&rule_sets);
        }

        let decisions = join_all(
            rule_sets
                .iter()
                .map(|rule_set| self.evaluate(&context, rule_set)),
        )
        .await
        .into_iter()
        .collect::<Result<Vec<GuardDecision>, ChainError>>()?;

        info!(
            "Evaluated {} guard group(s) for {}: {} allowed",
            decisions.len(),
            identity,
            decisions.iter().filter(|decision| decision.allowed).count()
        );

        Ok(Evaluation {
            decisions,
            owned_assets: context.owned_assets,
        })
    }

    /// Checks the rules of `rule_set` in order and stops at the first one
    /// that fails.
    pub async fn evaluate(
        &self,
        context: &EvaluationContext<'_>,
        rule_set: &RuleSet,
    ) -> Result<GuardDecision, ChainError> {
        let label = rule_set.label();

        if !context.identity.is_connected() {
            return Ok(GuardDecision::denied(label, DenyReason::WalletNotConnected));
        }

        for rule in rule_set.rules() {
            if let Some(reason) = self.check(context, label, rule).await? {
                warn!("Guard {}; {}", label, reason);
                return Ok(GuardDecision::denied(label, reason));
            }
        }

        Ok(GuardDecision::allowed(label))
    }

    async fn check(
        &self,
        context: &EvaluationContext<'_>,
        label: &str,
        rule: &Rule,
    ) -> Result<Option<DenyReason>, ChainError> {
        let identity = &context.identity;
        let snapshot = &context.snapshot;
        let candy_machine = context.candy_machine;
        let oracle = Oracle::new(self.reader.as_ref());

        let reason = match rule {
            Rule::AddressGate { address } => {
                (identity.address() != address).then(|| DenyReason::AddressGate)
            }
            Rule::AllowList { merkle_root } => self.check_allow_list(label, identity, merkle_root),
            Rule::EndDate { date } => {
                if !snapshot.has_clock() {
                    Some(DenyReason::ClockUnavailable)
                } else if snapshot.current_time > *date {
                    Some(DenyReason::EndDateReached { end: *date })
                } else {
                    None
                }
            }
            Rule::FreezeSolPayment { lamports, .. } | Rule::SolPayment { lamports, .. } => {
                check_sol_balance(rule.kind(), *lamports, snapshot.sol_balance)
            }
            Rule::MintLimit { id, limit } => {
                // the candy guard is the mint authority of a wrapped candy machine
                let minted = oracle
                    .minted_count(
                        *id,
                        identity,
                        &candy_machine.mint_authority,
                        &candy_machine.address,
                    )
                    .await?;

                (minted >= *limit).then(|| DenyReason::MintLimitReached {
                    limit: *limit,
                    minted,
                })
            }
            Rule::FreezeTokenPayment { amount, mint, .. }
            | Rule::TokenBurn { amount, mint }
            | Rule::TokenGate { amount, mint }
            | Rule::TokenPayment { amount, mint, .. } => {
                let balance = oracle.token_balance(identity, mint).await?;

                (balance < *amount).then(|| DenyReason::InsufficientTokens {
                    guard: rule.kind(),
                    mint: *mint,
                    required: *amount,
                    balance,
                })
            }
            Rule::NftBurn {
                required_collection,
            }
            | Rule::NftGate {
                required_collection,
            }
            | Rule::NftPayment {
                required_collection,
                ..
            } => {
                let holds = context
                    .owned_assets()
                    .iter()
                    .any(|asset| asset.is_verified_member(required_collection));

                (!holds).then(|| DenyReason::MissingCollectionNft {
                    guard: rule.kind(),
                    collection: *required_collection,
                })
            }
            // closed once the maximum covers everything minted so far
            Rule::RedeemedAmount { maximum } => (*maximum >= candy_machine.items_redeemed)
                .then(|| DenyReason::RedeemedAmountReached {
                    maximum: *maximum,
                    redeemed: candy_machine.items_redeemed,
                }),
            Rule::StartDate { date } => {
                if !snapshot.has_clock() {
                    Some(DenyReason::ClockUnavailable)
                } else if snapshot.current_time < *date {
                    Some(DenyReason::NotLive { start: *date })
                } else {
                    None
                }
            }
        };

        Ok(reason)
    }

    fn check_allow_list(
        &self,
        label: &str,
        identity: &Identity,
        merkle_root: &[u8; 32],
    ) -> Option<DenyReason> {
        if !self.registry.has(label) {
            error!("Guard {}; allow list missing in registry", label);
            return Some(DenyReason::AllowListMissing);
        }

        if let Some(root) = self.registry.merkle_root(label) {
            if root != *merkle_root {
                warn!(
                    "Guard {}; registry merkle root {} differs from the on-chain root {}",
                    label,
                    hex::encode(root),
                    hex::encode(merkle_root)
                );
            }
        }

        if !self.registry.is_member(label, identity.address()) {
            return Some(DenyReason::NotAllowListed);
        }

        None
    }

    fn log_merkle_roots(&self, rule_sets: &[&RuleSet]) {
        for rule_set in rule_sets {
            if let Some(root) = self.registry.merkle_root(rule_set.label()) {
                info!(
                    "Add this merkle root to the allow list guard of '{}': {}",
                    rule_set.label(),
                    hex::encode(root)
                );
            }
        }
    }
}

fn check_sol_balance(guard: RuleKind, required: u64, balance: u64) -> Option<DenyReason> {
    (balance < required).then(|| DenyReason::InsufficientSol {
        guard,
        required,
        balance,
    })
}

/// Collection requirement of the nft gate guard, if active.
pub fn nft_gate_collection(rule_set: &RuleSet) -> Option<Pubkey> {
    match rule_set.get(RuleKind::NftGate) {
        Some(Rule::NftGate {
            required_collection,
        }) => Some(*required_collection),
        _ => None,
    }
}
