use futures::try_join;
use tracing::debug;

use super::{Rule, RuleSet};
use crate::{
    candy_machine::CandyMachineState,
    chain::{ChainReader, OwnedAsset},
    constants::UNAVAILABLE_TIME,
    errors::ChainError,
    identity::Identity,
    oracle::{Oracle, OracleSnapshot},
};

/// Read-only inputs shared by every rule set of one evaluation pass. Built
/// once, before any rule set is evaluated.
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    pub identity: Identity,
    pub candy_machine: &'a CandyMachineState,
    pub snapshot: OracleSnapshot,
    pub owned_assets: Option<Vec<OwnedAsset>>,
}

fn any_rule(rule_sets: &[&RuleSet], predicate: fn(&Rule) -> bool) -> bool {
    rule_sets
        .iter()
        .any(|rule_set| rule_set.rules().iter().any(predicate))
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        identity: Identity,
        candy_machine: &'a CandyMachineState,
        snapshot: OracleSnapshot,
        owned_assets: Option<Vec<OwnedAsset>>,
    ) -> Self {
        EvaluationContext {
            identity,
            candy_machine,
            snapshot,
            owned_assets,
        }
    }

    /// Fetches only what `rule_sets` need: the clock for date guards, the SOL
    /// balance for SOL payments and the owned NFTs for NFT guards. Nothing
    /// is fetched for a disconnected identity.
    pub async fn load<R: ChainReader + ?Sized>(
        reader: &R,
        identity: Identity,
        candy_machine: &'a CandyMachineState,
        rule_sets: &[&RuleSet],
    ) -> Result<EvaluationContext<'a>, ChainError> {
        if !identity.is_connected() {
            return Ok(EvaluationContext::new(
                identity,
                candy_machine,
                OracleSnapshot::default(),
                None,
            ));
        }

        let oracle = Oracle::new(reader);
        let needs_clock = any_rule(rule_sets, Rule::needs_clock);
        let needs_sol_balance = any_rule(rule_sets, Rule::needs_sol_balance);
        let needs_owned_assets = any_rule(rule_sets, Rule::needs_owned_assets);

        debug!(
            "Snapshot for {}: clock={}, sol balance={}, owned assets={}",
            identity, needs_clock, needs_sol_balance, needs_owned_assets
        );

        let (current_time, sol_balance, owned_assets) = try_join!(
            async {
                if needs_clock {
                    oracle.current_time().await
                } else {
                    Ok(UNAVAILABLE_TIME)
                }
            },
            async {
                if needs_sol_balance {
                    oracle.sol_balance(&identity).await
                } else {
                    Ok(0)
                }
            },
            async {
                if needs_owned_assets {
                    reader
                        .find_assets_by_owner(identity.address())
                        .await
                        .map(Some)
                } else {
                    Ok(None)
                }
            },
        )?;

        Ok(EvaluationContext::new(
            identity,
            candy_machine,
            OracleSnapshot {
                current_time,
                sol_balance,
            },
            owned_assets,
        ))
    }

    pub fn owned_assets(&self) -> &[OwnedAsset] {
        self.owned_assets.as_deref().unwrap_or(&[])
    }
}
