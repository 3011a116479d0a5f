use console::style;
use serde::Serialize;

use crate::{
    allow_list::AllowListRegistry,
    chain::{ChainReader, RpcChainReader},
    common::*,
    config::{candy_machine_id, to_string, MintCopy},
    guards::{GuardDecision, GuardEvaluator},
    identity::Identity,
    render::{mint_buttons, MintButton},
    utils::*,
};

pub struct CheckArgs {
    pub keypair: Option<String>,
    pub rpc_url: Option<String>,
    pub candy_machine: Option<String>,
    pub address: Option<String>,
    pub allow_list: String,
    pub mint_text: String,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    #[serde(serialize_with = "to_string")]
    pub candy_machine: Pubkey,
    #[serde(serialize_with = "to_string")]
    pub identity: Identity,
    pub items_available: u64,
    pub items_redeemed: u64,
    pub items_remaining: u64,
    pub any_allowed: bool,
    pub decisions: Vec<GuardDecision>,
    pub buttons: Vec<MintButton>,
}

pub async fn process_check(args: CheckArgs) -> Result<()> {
    let config = checker_setup(args.keypair, args.rpc_url)?;
    let candy_machine_id = candy_machine_id(args.candy_machine)?;

    // an explicit address takes precedence over the configured wallet
    let identity = match args.address {
        Some(address) => Identity::new(
            Pubkey::from_str(&address).map_err(|_| anyhow!("Failed to parse address: {}", address))?,
        ),
        None => identity_of(config.keypair.as_ref()),
    };

    let registry = Arc::new(AllowListRegistry::load(&args.allow_list)?);
    let copy = MintCopy::load(&args.mint_text)?;

    if !args.json {
        println!(
            "{} {}Checking guard groups",
            style("[1/1]").bold().dim(),
            GUARD_EMOJI
        );
    }

    let pb = if args.json {
        None
    } else {
        let pb = spinner_with_style();
        pb.set_message("Connecting...");
        Some(pb)
    };

    let reader = Arc::new(RpcChainReader::from_url(config.rpc_url));
    let candy_machine = reader.find_candy_machine(&candy_machine_id).await?;
    let evaluator = GuardEvaluator::new(reader, registry);
    let evaluation = evaluator.evaluate_all(identity, &candy_machine).await?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let report = CheckReport {
        candy_machine: candy_machine_id,
        identity,
        items_available: candy_machine.items_available,
        items_redeemed: candy_machine.items_redeemed,
        items_remaining: candy_machine.items_remaining(),
        any_allowed: evaluation.any_allowed(),
        buttons: mint_buttons(&evaluation.decisions, &copy),
        decisions: evaluation.decisions,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(())
}

fn print_report(report: &CheckReport) {
    println!(
        "\n{}{} {}",
        CANDY_EMOJI,
        style("Candy machine ID:").dim(),
        report.candy_machine
    );
    print_with_style("", "wallet", report.identity);
    print_with_style(
        "",
        "items remaining",
        format!(
            "{} of {}",
            report.items_remaining, report.items_available
        ),
    );

    println!(" {}", style(":").dim());
    print_with_style("", "guard groups", "");
    for decision in &report.decisions {
        let status = if decision.allowed {
            style("allowed".to_string()).green().to_string()
        } else {
            let reason = decision
                .reason
                .as_ref()
                .map(|reason| reason.to_string())
                .unwrap_or_default();
            format!("{} ({})", style("denied").red(), reason)
        };
        print_with_style("    ", &decision.label, status);
    }

    println!(" {}", style(":").dim());
    print_with_style("", "mint buttons", "");
    for button in &report.buttons {
        let state = if button.allowed {
            style(&button.button_label).bold().to_string()
        } else {
            style(&button.button_label).dim().strikethrough().to_string()
        };
        print_with_style("    ", &button.label, format!("{} [{}]", button.mint_text, state));
    }

    if report.any_allowed {
        println!("\n{}", style("Minting is possible.").green().bold());
    } else {
        println!(
            "\n{}{}",
            WARNING_EMOJI,
            style("No guard group allows minting right now.").yellow()
        );
    }
}
