mod utils;

use std::sync::{atomic::Ordering, Arc};

use anchor_client::solana_sdk::pubkey::Pubkey;
use guard_checker::{
    allow_list::{leaf_hash, verify, AllowListRegistry},
    errors::{GuardError, MintFailure, MintStage},
    guards::Rule,
    identity::Identity,
    mint::MintOrchestrator,
};
use tokio::sync::Notify;
use utils::*;

fn orchestrator(
    chain: MockChain,
    submitter: MockSubmitter,
    registry: AllowListRegistry,
) -> (
    Arc<MockChain>,
    Arc<MockSubmitter>,
    MintOrchestrator<MockChain, MockSubmitter>,
) {
    let chain = Arc::new(chain);
    let submitter = Arc::new(submitter);
    let orchestrator = MintOrchestrator::new(
        Arc::clone(&chain),
        Arc::clone(&submitter),
        Arc::new(registry),
    );
    (chain, submitter, orchestrator)
}

#[tokio::test]
async fn allow_list_proof_is_routed_before_minting() {
    let wallet = Pubkey::new_unique();
    let mut registry = AllowListRegistry::new();
    registry.insert("early", vec![Pubkey::new_unique(), wallet, Pubkey::new_unique()]);
    let root = registry.merkle_root("early").unwrap();

    let candy_machine = guarded_candy_machine(
        vec![],
        vec![("early", vec![Rule::AllowList { merkle_root: root }])],
    );
    let address = candy_machine.address;
    let (chain, submitter, orchestrator) =
        orchestrator(MockChain::new(candy_machine), MockSubmitter::default(), registry);

    let outcome = orchestrator
        .mint(Identity::new(wallet), &address, "early", None)
        .await
        .unwrap();

    let routes = submitter.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].group, Some("early".to_string()));
    assert_eq!(routes[0].merkle_root, root);
    assert!(verify(
        &routes[0].merkle_proof,
        &root,
        &leaf_hash(wallet.to_string().as_bytes())
    ));

    let mints = submitter.mints();
    assert_eq!(mints.len(), 1);
    assert_eq!(mints[0].group, Some("early".to_string()));
    assert_eq!(mints[0].minter, wallet);
    assert_eq!(outcome.label, "early");
    assert!(outcome.route_signature.is_some());
    assert_eq!(chain.candy_machine_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_allow_list_fails_before_any_submission() {
    let candy_machine = guarded_candy_machine(
        vec![],
        vec![("vip", vec![Rule::AllowList { merkle_root: [1u8; 32] }])],
    );
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let err = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "vip", None)
        .await
        .unwrap_err();

    assert!(err.is_config());
    assert_eq!(err.stage, MintStage::Routing);
    assert!(matches!(
        err.source,
        MintFailure::Config(GuardError::MissingAllowList(ref label)) if label == "vip"
    ));
    assert!(submitter.routes().is_empty());
    assert!(submitter.mints().is_empty());
}

#[tokio::test]
async fn unguarded_candy_machine_cannot_mint() {
    let candy_machine = unguarded_candy_machine();
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let err = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "default", None)
        .await
        .unwrap_err();

    assert_eq!(err.stage, MintStage::Resolving);
    assert!(matches!(
        err.source,
        MintFailure::Config(GuardError::NoGuardConfigured(_))
    ));
    assert!(submitter.mints().is_empty());
}

#[tokio::test]
async fn default_group_is_minted_without_a_group_argument() {
    let candy_machine = guarded_candy_machine(
        vec![Rule::SolPayment {
            lamports: 5,
            destination: Pubkey::new_unique(),
        }],
        vec![("early", vec![])],
    );
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let outcome = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "default", None)
        .await
        .unwrap();

    let mints = submitter.mints();
    assert_eq!(mints.len(), 1);
    assert_eq!(mints[0].group, None);
    assert_eq!(outcome.label, "default");
    assert!(outcome.route_signature.is_none());
    assert!(submitter.routes().is_empty());
}

#[tokio::test]
async fn unknown_group_falls_back_to_default() {
    let candy_machine = guarded_candy_machine(vec![], vec![("early", vec![])]);
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let outcome = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "late", None)
        .await
        .unwrap();

    assert_eq!(outcome.label, "default");
    assert_eq!(submitter.mints()[0].group, None);
}

#[tokio::test]
async fn nft_gate_uses_first_verified_member() {
    let collection = Pubkey::new_unique();
    let unverified = nft(collection, false);
    let first = nft(collection, true);
    let second = nft(collection, true);
    let candy_machine = guarded_candy_machine(
        vec![],
        vec![(
            "holders",
            vec![Rule::NftGate {
                required_collection: collection,
            }],
        )],
    );
    let address = candy_machine.address;
    let (chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine)
            .with_asset(unverified)
            .with_asset(first.clone())
            .with_asset(second),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let outcome = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "holders", None)
        .await
        .unwrap();

    assert_eq!(outcome.nft_gate, Some(first.mint));
    assert_eq!(submitter.mints()[0].guards.nft_gate, Some(first));
    assert_eq!(chain.asset_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn nft_gate_reuses_evaluated_assets() {
    let collection = Pubkey::new_unique();
    let held = nft(collection, true);
    let candy_machine = guarded_candy_machine(
        vec![Rule::NftGate {
            required_collection: collection,
        }],
        vec![],
    );
    let address = candy_machine.address;
    let (chain, _submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let outcome = orchestrator
        .mint(
            Identity::new(Pubkey::new_unique()),
            &address,
            "default",
            Some(&[held.clone()]),
        )
        .await
        .unwrap();

    assert_eq!(outcome.nft_gate, Some(held.mint));
    assert_eq!(chain.asset_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_gate_nft_is_a_config_error() {
    let collection = Pubkey::new_unique();
    let candy_machine = guarded_candy_machine(
        vec![Rule::NftGate {
            required_collection: collection,
        }],
        vec![],
    );
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine).with_asset(nft(collection, false)),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let err = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "default", None)
        .await
        .unwrap_err();

    assert!(err.is_config());
    assert_eq!(err.stage, MintStage::Assembling);
    assert!(matches!(
        err.source,
        MintFailure::Config(GuardError::MissingGateNft(key)) if key == collection
    ));
    assert!(submitter.mints().is_empty());
}

#[tokio::test]
async fn disconnected_wallet_cannot_mint() {
    let candy_machine = guarded_candy_machine(vec![], vec![]);
    let address = candy_machine.address;
    let (chain, _submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let err = orchestrator
        .mint(Identity::disconnected(), &address, "default", None)
        .await
        .unwrap_err();

    assert!(matches!(
        err.source,
        MintFailure::Config(GuardError::WalletNotConnected)
    ));
    assert_eq!(chain.total_calls(), 0);
}

#[tokio::test]
async fn failed_submission_reports_the_chain_error() {
    let candy_machine = guarded_candy_machine(vec![], vec![]);
    let address = candy_machine.address;
    let (_chain, _submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter {
            fail_mint: true,
            ..MockSubmitter::default()
        },
        AllowListRegistry::new(),
    );

    let err = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "default", None)
        .await
        .unwrap_err();

    assert!(!err.is_config());
    assert_eq!(err.stage, MintStage::Submitting);
}

#[tokio::test]
async fn concurrent_attempt_is_rejected() {
    let gate = Arc::new(Notify::new());
    let candy_machine = guarded_candy_machine(vec![], vec![]);
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter {
            gate: Some(Arc::clone(&gate)),
            ..MockSubmitter::default()
        },
        AllowListRegistry::new(),
    );
    let wallet = Identity::new(Pubkey::new_unique());

    let (first, second, _) = tokio::join!(
        orchestrator.mint(wallet, &address, "default", None),
        orchestrator.mint(wallet, &address, "default", None),
        async { gate.notify_one() },
    );

    assert!(first.is_ok());
    let err = second.unwrap_err();
    assert!(matches!(
        err.source,
        MintFailure::Config(GuardError::MintInProgress)
    ));
    assert_eq!(submitter.mints().len(), 1);
}

#[tokio::test]
async fn route_runs_before_mint_arguments_are_assembled() {
    let wallet = Pubkey::new_unique();
    let collection = Pubkey::new_unique();
    let mut registry = AllowListRegistry::new();
    registry.insert("holders", vec![wallet]);
    let root = registry.merkle_root("holders").unwrap();

    let candy_machine = guarded_candy_machine(
        vec![],
        vec![(
            "holders",
            vec![
                Rule::AllowList { merkle_root: root },
                Rule::NftGate {
                    required_collection: collection,
                },
            ],
        )],
    );
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) =
        orchestrator(MockChain::new(candy_machine), MockSubmitter::default(), registry);

    let err = orchestrator
        .mint(Identity::new(wallet), &address, "holders", None)
        .await
        .unwrap_err();

    assert_eq!(err.stage, MintStage::Assembling);
    assert!(matches!(
        err.source,
        MintFailure::Config(GuardError::MissingGateNft(key)) if key == collection
    ));
    assert_eq!(submitter.routes().len(), 1);
    assert!(submitter.mints().is_empty());
}

#[tokio::test]
async fn unsupported_guard_fails_while_assembling() {
    let candy_machine = guarded_candy_machine(
        vec![Rule::NftBurn {
            required_collection: Pubkey::new_unique(),
        }],
        vec![],
    );
    let address = candy_machine.address;
    let (_chain, submitter, orchestrator) = orchestrator(
        MockChain::new(candy_machine),
        MockSubmitter::default(),
        AllowListRegistry::new(),
    );

    let err = orchestrator
        .mint(Identity::new(Pubkey::new_unique()), &address, "default", None)
        .await
        .unwrap_err();

    assert_eq!(err.stage, MintStage::Assembling);
    assert!(matches!(
        err.source,
        MintFailure::Config(GuardError::UnsupportedGuard(_))
    ));
    assert!(submitter.mints().is_empty());
}
