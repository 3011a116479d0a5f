use std::sync::Arc;

use anchor_client::solana_sdk::{pubkey::Pubkey, signature::Signature};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::{
    allow_list::AllowListRegistry,
    chain::{
        guard_remaining_accounts, ChainReader, MintGuardArgs, MintRequest, MintSubmitter,
        OwnedAsset, RouteRequest,
    },
    errors::{GuardError, MintError, MintStage},
    guards::{nft_gate_collection, select_group, Rule, RuleKind, RuleSet},
    identity::Identity,
};

/// Result of a successful mint attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintOutcome {
    pub label: String,
    /// Signature of the allow list proof transaction, when one was needed.
    pub route_signature: Option<Signature>,
    pub signature: Signature,
    /// Mint of the NFT presented to the nft gate guard.
    pub nft_gate: Option<Pubkey>,
}

/// Drives a mint under a chosen guard group. At most one attempt runs at a
/// time; a second call while one is pending fails immediately.
pub struct MintOrchestrator<R: ChainReader + ?Sized, S: MintSubmitter + ?Sized> {
    reader: Arc<R>,
    submitter: Arc<S>,
    registry: Arc<AllowListRegistry>,
    in_flight: Mutex<()>,
}

impl<R, S> MintOrchestrator<R, S>
where
    R: ChainReader + ?Sized,
    S: MintSubmitter + ?Sized,
{
    pub fn new(reader: Arc<R>, submitter: Arc<S>, registry: Arc<AllowListRegistry>) -> Self {
        MintOrchestrator {
            reader,
            submitter,
            registry,
            in_flight: Mutex::new(()),
        }
    }

    /// Mints one NFT from `candy_machine` under the group `label`.
    ///
    /// The candy machine is re-read first; the group is then resolved
    /// against that fresh state. Allow list proofs are routed before the
    /// mint arguments are assembled, and the mint is submitted exactly once. `owned_assets` from an earlier
    /// evaluation avoids fetching the holdings again for the nft gate guard.
    pub async fn mint(
        &self,
        identity: Identity,
        candy_machine: &Pubkey,
        label: &str,
        owned_assets: Option<&[OwnedAsset]>,
    ) -> Result<MintOutcome, MintError> {
        let _in_flight = self
            .in_flight
            .try_lock()
            .map_err(|_| MintError::new(MintStage::Refreshing, GuardError::MintInProgress))?;

        if !identity.is_connected() {
            return Err(MintError::new(
                MintStage::Refreshing,
                GuardError::WalletNotConnected,
            ));
        }

        let state = self
            .reader
            .find_candy_machine(candy_machine)
            .await
            .map_err(|err| MintError::new(MintStage::Refreshing, err))?;

        let selected = select_group(&state, label);
        let rules = selected.require_rules().map_err(|err| {
            error!("No guard defined for '{}'", label);
            MintError::new(MintStage::Resolving, err)
        })?;
        let candy_guard = state
            .candy_guard
            .as_ref()
            .map(|candy_guard| candy_guard.address)
            .ok_or_else(|| {
                MintError::new(
                    MintStage::Resolving,
                    GuardError::NoGuardConfigured(selected.label.clone()),
                )
            })?;

        info!(
            "Minting from {} with guard group '{}'",
            candy_machine, selected.label
        );

        let route_signature = match rules.get(RuleKind::AllowList) {
            Some(Rule::AllowList { merkle_root }) => Some(
                self.route_allow_list(
                    &identity,
                    &state.address,
                    candy_guard,
                    selected.group_arg(),
                    &selected.label,
                    *merkle_root,
                )
                .await?,
            ),
            _ => None,
        };

        let guards = self
            .mint_guard_args(&identity, rules, owned_assets)
            .await?;

        let request = MintRequest {
            candy_machine: state.clone(),
            candy_guard,
            minter: *identity.address(),
            group: selected.group_arg(),
            rules: rules.clone(),
            guards,
        };
        guard_remaining_accounts(&request)
            .map_err(|err| MintError::new(MintStage::Assembling, err))?;

        let signature = self
            .submitter
            .mint(&request)
            .await
            .map_err(|err| MintError::new(MintStage::Submitting, err))?;

        info!("Minted with '{}': {}", selected.label, signature);

        Ok(MintOutcome {
            label: selected.label,
            route_signature,
            signature,
            nft_gate: request.guards.nft_gate.map(|asset| asset.mint),
        })
    }

    async fn mint_guard_args(
        &self,
        identity: &Identity,
        rules: &RuleSet,
        owned_assets: Option<&[OwnedAsset]>,
    ) -> Result<MintGuardArgs, MintError> {
        let collection = match nft_gate_collection(rules) {
            Some(collection) => collection,
            None => return Ok(MintGuardArgs::default()),
        };

        let fetched;
        let assets = match owned_assets {
            Some(assets) => assets,
            None => {
                fetched = self
                    .reader
                    .find_assets_by_owner(identity.address())
                    .await
                    .map_err(|err| MintError::new(MintStage::Assembling, err))?;
                &fetched[..]
            }
        };

        let gate = assets
            .iter()
            .find(|asset| asset.is_verified_member(&collection))
            .cloned()
            .ok_or_else(|| {
                MintError::new(MintStage::Assembling, GuardError::MissingGateNft(collection))
            })?;

        info!("Using {} for the nft gate guard", gate.mint);

        Ok(MintGuardArgs {
            nft_gate: Some(gate),
        })
    }

    async fn route_allow_list(
        &self,
        identity: &Identity,
        candy_machine: &Pubkey,
        candy_guard: Pubkey,
        group: Option<String>,
        label: &str,
        merkle_root: [u8; 32],
    ) -> Result<Signature, MintError> {
        if !self.registry.has(label) {
            error!("Allow list for '{}' is not defined in the registry", label);
            return Err(MintError::new(
                MintStage::Routing,
                GuardError::MissingAllowList(label.to_string()),
            ));
        }

        let merkle_proof = self
            .registry
            .merkle_proof(label, identity.address())
            .ok_or_else(|| {
                MintError::new(
                    MintStage::Routing,
                    GuardError::NotAllowListed(label.to_string(), *identity.address()),
                )
            })?;

        let route = RouteRequest {
            candy_machine: *candy_machine,
            candy_guard,
            minter: *identity.address(),
            group,
            merkle_root,
            merkle_proof,
        };

        self.submitter
            .route_allow_list_proof(&route)
            .await
            .map_err(|err| MintError::new(MintStage::Routing, err))
    }
}
