use std::fmt::{self, Display};

use anchor_client::solana_sdk::pubkey::Pubkey;
use serde::Serialize;

use super::RuleKind;
use crate::{chain::OwnedAsset, config::to_string};

/// Why a guard group does not allow minting right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum DenyReason {
    NoGuardLayer,
    WalletNotConnected,
    AddressGate,
    AllowListMissing,
    NotAllowListed,
    ClockUnavailable,
    EndDateReached {
        end: i64,
    },
    NotLive {
        start: i64,
    },
    InsufficientSol {
        guard: RuleKind,
        required: u64,
        balance: u64,
    },
    MintLimitReached {
        limit: u16,
        minted: u16,
    },
    InsufficientTokens {
        guard: RuleKind,
        #[serde(serialize_with = "to_string")]
        mint: Pubkey,
        required: u64,
        balance: u64,
    },
    MissingCollectionNft {
        guard: RuleKind,
        #[serde(serialize_with = "to_string")]
        collection: Pubkey,
    },
    RedeemedAmountReached {
        maximum: u64,
        redeemed: u64,
    },
}

impl Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NoGuardLayer => write!(f, "candy machine has no candy guard"),
            DenyReason::WalletNotConnected => write!(f, "no wallet connected"),
            DenyReason::AddressGate => write!(f, "address gate: wallet is not allowed to mint"),
            DenyReason::AllowListMissing => write!(f, "allow list missing in registry"),
            DenyReason::NotAllowListed => write!(f, "wallet not allow listed"),
            DenyReason::ClockUnavailable => write!(f, "chain time unavailable"),
            DenyReason::EndDateReached { end } => write!(f, "end date reached ({})", end),
            DenyReason::NotLive { start } => write!(f, "guard not live until {}", start),
            DenyReason::InsufficientSol {
                guard,
                required,
                balance,
            } => write!(
                f,
                "{}: not enough SOL (required {}, balance {})",
                guard, required, balance
            ),
            DenyReason::MintLimitReached { limit, minted } => {
                write!(f, "mint limit reached ({}/{})", minted, limit)
            }
            DenyReason::InsufficientTokens {
                guard,
                mint,
                required,
                balance,
            } => write!(
                f,
                "{}: not enough tokens of {} (required {}, balance {})",
                guard, mint, required, balance
            ),
            DenyReason::MissingCollectionNft { guard, collection } => {
                write!(f, "{}: no verified NFT from collection {}", guard, collection)
            }
            DenyReason::RedeemedAmountReached { maximum, redeemed } => {
                write!(f, "redeemed amount maximum {} reached ({} minted)", maximum, redeemed)
            }
        }
    }
}

/// Outcome for one guard group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardDecision {
    pub label: String,
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DenyReason>,
}

impl GuardDecision {
    pub fn allowed<L: Into<String>>(label: L) -> Self {
        GuardDecision {
            label: label.into(),
            allowed: true,
            reason: None,
        }
    }

    pub fn denied<L: Into<String>>(label: L, reason: DenyReason) -> Self {
        GuardDecision {
            label: label.into(),
            allowed: false,
            reason: Some(reason),
        }
    }
}

/// Result of one evaluation pass.
#[derive(Debug, Clone, Default)]
pub struct Evaluation {
    pub decisions: Vec<GuardDecision>,
    /// Owned assets fetched during the pass, if any rule needed them.
    pub owned_assets: Option<Vec<OwnedAsset>>,
}

impl Evaluation {
    pub fn any_allowed(&self) -> bool {
        self.decisions.iter().any(|decision| decision.allowed)
    }

    pub fn decision(&self, label: &str) -> Option<&GuardDecision> {
        self.decisions.iter().find(|decision| decision.label == label)
    }
}
