pub mod context;
pub mod convert;
pub mod decision;
pub mod evaluator;
pub mod rules;
pub mod selector;

pub use context::*;
pub use convert::*;
pub use decision::*;
pub use evaluator::*;
pub use rules::*;
pub use selector::*;

use anchor_client::solana_sdk::pubkey::Pubkey;

/// Guard layer wrapping a candy machine: the default rule set plus the
/// labeled override groups, in on-chain order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandyGuardState {
    pub address: Pubkey,
    pub default: RuleSet,
    pub groups: Vec<RuleSet>,
}

impl CandyGuardState {
    /// Rule sets of an evaluation pass: override groups first, default last.
    pub fn rule_sets(&self) -> Vec<&RuleSet> {
        self.groups
            .iter()
            .chain(std::iter::once(&self.default))
            .collect()
    }

    pub fn group(&self, label: &str) -> Option<&RuleSet> {
        self.groups.iter().find(|group| group.label() == label)
    }
}
