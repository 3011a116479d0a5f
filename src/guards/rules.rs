use std::fmt::{self, Display};

use anchor_client::solana_sdk::pubkey::Pubkey;
use serde::Serialize;

use crate::{config::to_string, constants::DEFAULT_GROUP, errors::GuardError};

/// Guard kinds with an off-chain check, declared in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RuleKind {
    AddressGate,
    AllowList,
    EndDate,
    FreezeSolPayment,
    MintLimit,
    FreezeTokenPayment,
    NftBurn,
    NftGate,
    NftPayment,
    RedeemedAmount,
    SolPayment,
    StartDate,
    TokenBurn,
    TokenGate,
    TokenPayment,
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuleKind::AddressGate => "address gate",
            RuleKind::AllowList => "allow list",
            RuleKind::EndDate => "end date",
            RuleKind::FreezeSolPayment => "freeze sol payment",
            RuleKind::MintLimit => "mint limit",
            RuleKind::FreezeTokenPayment => "freeze token payment",
            RuleKind::NftBurn => "nft burn",
            RuleKind::NftGate => "nft gate",
            RuleKind::NftPayment => "nft payment",
            RuleKind::RedeemedAmount => "redeemed amount",
            RuleKind::SolPayment => "sol payment",
            RuleKind::StartDate => "start date",
            RuleKind::TokenBurn => "token burn",
            RuleKind::TokenGate => "token gate",
            RuleKind::TokenPayment => "token payment",
        };
        f.write_str(name)
    }
}

/// A single eligibility rule with its on-chain settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "guard", rename_all = "camelCase")]
pub enum Rule {
    AddressGate {
        #[serde(serialize_with = "to_string")]
        address: Pubkey,
    },
    AllowList {
        #[serde(serialize_with = "hex_root")]
        merkle_root: [u8; 32],
    },
    EndDate {
        date: i64,
    },
    FreezeSolPayment {
        lamports: u64,
        #[serde(serialize_with = "to_string")]
        destination: Pubkey,
    },
    MintLimit {
        id: u8,
        limit: u16,
    },
    FreezeTokenPayment {
        amount: u64,
        #[serde(serialize_with = "to_string")]
        mint: Pubkey,
        #[serde(serialize_with = "to_string")]
        destination_ata: Pubkey,
    },
    NftBurn {
        #[serde(serialize_with = "to_string")]
        required_collection: Pubkey,
    },
    NftGate {
        #[serde(serialize_with = "to_string")]
        required_collection: Pubkey,
    },
    NftPayment {
        #[serde(serialize_with = "to_string")]
        required_collection: Pubkey,
        #[serde(serialize_with = "to_string")]
        destination: Pubkey,
    },
    RedeemedAmount {
        maximum: u64,
    },
    SolPayment {
        lamports: u64,
        #[serde(serialize_with = "to_string")]
        destination: Pubkey,
    },
    StartDate {
        date: i64,
    },
    TokenBurn {
        amount: u64,
        #[serde(serialize_with = "to_string")]
        mint: Pubkey,
    },
    TokenGate {
        amount: u64,
        #[serde(serialize_with = "to_string")]
        mint: Pubkey,
    },
    TokenPayment {
        amount: u64,
        #[serde(serialize_with = "to_string")]
        mint: Pubkey,
        #[serde(serialize_with = "to_string")]
        destination_ata: Pubkey,
    },
}

fn hex_root<S>(root: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&hex::encode(root))
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::AddressGate { .. } => RuleKind::AddressGate,
            Rule::AllowList { .. } => RuleKind::AllowList,
            Rule::EndDate { .. } => RuleKind::EndDate,
            Rule::FreezeSolPayment { .. } => RuleKind::FreezeSolPayment,
            Rule::MintLimit { .. } => RuleKind::MintLimit,
            Rule::FreezeTokenPayment { .. } => RuleKind::FreezeTokenPayment,
            Rule::NftBurn { .. } => RuleKind::NftBurn,
            Rule::NftGate { .. } => RuleKind::NftGate,
            Rule::NftPayment { .. } => RuleKind::NftPayment,
            Rule::RedeemedAmount { .. } => RuleKind::RedeemedAmount,
            Rule::SolPayment { .. } => RuleKind::SolPayment,
            Rule::StartDate { .. } => RuleKind::StartDate,
            Rule::TokenBurn { .. } => RuleKind::TokenBurn,
            Rule::TokenGate { .. } => RuleKind::TokenGate,
            Rule::TokenPayment { .. } => RuleKind::TokenPayment,
        }
    }

    pub fn needs_clock(&self) -> bool {
        matches!(self, Rule::StartDate { .. } | Rule::EndDate { .. })
    }

    pub fn needs_sol_balance(&self) -> bool {
        matches!(
            self,
            Rule::SolPayment { .. } | Rule::FreezeSolPayment { .. }
        )
    }

    pub fn needs_owned_assets(&self) -> bool {
        matches!(
            self,
            Rule::NftBurn { .. } | Rule::NftGate { .. } | Rule::NftPayment { .. }
        )
    }
}

/// Labeled set of rules, at most one per kind, kept in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleSet {
    label: String,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new<L: Into<String>>(label: L, rules: Vec<Rule>) -> Result<Self, GuardError> {
        let label = label.into();
        let mut rules = rules;
        rules.sort_by_key(Rule::kind);

        if let Some(pair) = rules.windows(2).find(|pair| pair[0].kind() == pair[1].kind()) {
            return Err(GuardError::DuplicateRule(label, pair[0].kind()));
        }

        Ok(RuleSet { label, rules })
    }

    pub fn default_set(rules: Vec<Rule>) -> Result<Self, GuardError> {
        RuleSet::new(DEFAULT_GROUP, rules)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn get(&self, kind: RuleKind) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.kind() == kind)
    }

    pub fn contains(&self, kind: RuleKind) -> bool {
        self.get(kind).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_kept_in_evaluation_order() {
        let rule_set = RuleSet::new(
            "public",
            vec![
                Rule::TokenPayment {
                    amount: 1,
                    mint: Pubkey::new_unique(),
                    destination_ata: Pubkey::new_unique(),
                },
                Rule::StartDate { date: 10 },
                Rule::AddressGate {
                    address: Pubkey::new_unique(),
                },
                Rule::EndDate { date: 20 },
            ],
        )
        .unwrap();

        let kinds: Vec<RuleKind> = rule_set.rules().iter().map(Rule::kind).collect();
        assert_eq!(
            kinds,
            vec![
                RuleKind::AddressGate,
                RuleKind::EndDate,
                RuleKind::StartDate,
                RuleKind::TokenPayment
            ]
        );
    }

    #[test]
    fn duplicate_kinds_are_rejected() {
        let error = RuleSet::new(
            "vip",
            vec![
                Rule::StartDate { date: 1 },
                Rule::SolPayment {
                    lamports: 5,
                    destination: Pubkey::new_unique(),
                },
                Rule::StartDate { date: 2 },
            ],
        )
        .unwrap_err();

        assert!(matches!(
            error,
            GuardError::DuplicateRule(label, RuleKind::StartDate) if label == "vip"
        ));
    }

    #[test]
    fn token_checks_run_last() {
        assert!(RuleKind::StartDate < RuleKind::TokenBurn);
        assert!(RuleKind::TokenBurn < RuleKind::TokenGate);
        assert!(RuleKind::TokenGate < RuleKind::TokenPayment);
        assert!(RuleKind::AddressGate < RuleKind::AllowList);
    }
}
