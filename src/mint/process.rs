use console::style;

use crate::{
    allow_list::AllowListRegistry,
    chain::{RpcChainReader, RpcMintSubmitter},
    common::*,
    config::candy_machine_id,
    identity::Identity,
    mint::MintOrchestrator,
    utils::*,
};

pub struct MintArgs {
    pub keypair: Option<String>,
    pub rpc_url: Option<String>,
    pub candy_machine: Option<String>,
    pub group: String,
    pub allow_list: String,
}

pub async fn process_mint(args: MintArgs) -> Result<()> {
    let config = checker_setup(args.keypair, args.rpc_url)?;
    let candy_machine_id = candy_machine_id(args.candy_machine)?;
    let keypair = config.keypair.ok_or(GuardError::WalletNotConnected)?;
    let identity = Identity::new(keypair.pubkey());
    let registry = Arc::new(AllowListRegistry::load(&args.allow_list)?);

    println!(
        "{} {}Minting from candy machine",
        style("[1/1]").bold().dim(),
        CANDY_EMOJI
    );
    println!("Candy machine ID: {}", &candy_machine_id);

    let reader = Arc::new(RpcChainReader::from_url(config.rpc_url));
    let submitter = Arc::new(RpcMintSubmitter::new(reader.client(), Arc::new(keypair)));
    let orchestrator = MintOrchestrator::new(reader, submitter, registry);

    let pb = spinner_with_style();
    pb.set_message(format!("Minting with guard group '{}'...", args.group));

    let outcome = match orchestrator
        .mint(identity, &candy_machine_id, &args.group, None)
        .await
    {
        Ok(outcome) => outcome,
        Err(err) => {
            pb.finish_and_clear();
            error!("{:?}", err);
            return Err(err.into());
        }
    };

    pb.finish_with_message(format!(
        "{} {}",
        style("Signature:").bold(),
        outcome.signature
    ));

    print_with_style("", "guard group", &outcome.label);
    if let Some(route_signature) = outcome.route_signature {
        print_with_style("", "allow list proof", route_signature);
    }
    if let Some(nft_gate) = outcome.nft_gate {
        print_with_style("", "nft gate", nft_gate);
    }

    Ok(())
}
