use anchor_client::solana_sdk::native_token::LAMPORTS_PER_SOL;
use chrono::NaiveDateTime;
use console::style;

use crate::{
    chain::{ChainReader, RpcChainReader},
    common::*,
    config::candy_machine_id,
    guards::{Rule, RuleSet},
    utils::*,
};

pub struct ShowArgs {
    pub keypair: Option<String>,
    pub rpc_url: Option<String>,
    pub candy_machine: Option<String>,
}

pub async fn process_show(args: ShowArgs) -> Result<()> {
    println!(
        "{} {}Looking up candy machine",
        style("[1/1]").bold().dim(),
        LOOKING_GLASS_EMOJI
    );

    let pb = spinner_with_style();
    pb.set_message("Connecting...");

    let config = checker_setup(args.keypair, args.rpc_url)?;
    let candy_machine_id = candy_machine_id(args.candy_machine)?;

    let reader = RpcChainReader::from_url(config.rpc_url);
    let state = reader.find_candy_machine(&candy_machine_id).await?;

    pb.finish_and_clear();

    println!(
        "\n{}{} {}",
        CANDY_EMOJI,
        style("Candy machine ID:").dim(),
        &candy_machine_id
    );
    println!(" {}", style(":").dim());
    print_with_style("", "authority", state.authority);
    print_with_style("", "mint authority", state.mint_authority);
    print_with_style("", "collection mint", state.collection_mint);
    print_with_style("", "items redeemed", state.items_redeemed);
    print_with_style("", "items available", state.items_available);
    print_with_style("", "items remaining", state.items_remaining());

    let candy_guard = match state.candy_guard {
        Some(candy_guard) => candy_guard,
        None => {
            print_with_style("", "candy guard", "none");
            return Ok(());
        }
    };

    println!(
        "\n{}{} {}",
        GUARD_EMOJI,
        style("Candy Guard ID:").dim(),
        candy_guard.address
    );
    println!(" {}", style(":").dim());

    print_with_style("", "default", "");
    print_rule_set(&candy_guard.default, "    :   ");

    if candy_guard.groups.is_empty() {
        print_with_style("", "groups", "none");
        return Ok(());
    }

    print_with_style("", "groups", "");
    for (index, group) in candy_guard.groups.iter().enumerate() {
        if index > 0 {
            // padding between groups
            println!("      {}", style(":").dim());
        }
        print_with_style("    ", "label", group.label());
        print_rule_set(group, "        ");
    }

    Ok(())
}

fn format_date(timestamp: i64) -> String {
    match NaiveDateTime::from_timestamp_opt(timestamp, 0) {
        Some(date) => date.format("%a %B %e %Y %H:%M:%S UTC").to_string(),
        None => "<parse error>".to_string(),
    }
}

fn format_sol(lamports: u64) -> String {
    format!(
        "{} (◎ {})",
        lamports,
        lamports as f64 / LAMPORTS_PER_SOL as f64
    )
}

fn print_rule_set(rule_set: &RuleSet, padding: &str) {
    if rule_set.is_empty() {
        print_with_style(padding, "guards", "none");
        return;
    }

    let detail = format!("{}:   ", padding);

    for rule in rule_set.rules() {
        print_with_style(padding, &rule.kind().to_string(), "");

        match rule {
            Rule::AddressGate { address } => print_with_style(&detail, "address", address),
            Rule::AllowList { merkle_root } => {
                print_with_style(&detail, "merkle root", hex::encode(merkle_root))
            }
            Rule::EndDate { date } | Rule::StartDate { date } => {
                print_with_style(&detail, "date", format_date(*date))
            }
            Rule::FreezeSolPayment {
                lamports,
                destination,
            }
            | Rule::SolPayment {
                lamports,
                destination,
            } => {
                print_with_style(&detail, "lamports", format_sol(*lamports));
                print_with_style(&detail, "destination", destination);
            }
            Rule::MintLimit { id, limit } => {
                print_with_style(&detail, "id", id);
                print_with_style(&detail, "limit", limit);
            }
            Rule::FreezeTokenPayment {
                amount,
                mint,
                destination_ata,
            }
            | Rule::TokenPayment {
                amount,
                mint,
                destination_ata,
            } => {
                print_with_style(&detail, "amount", amount);
                print_with_style(&detail, "token mint", mint);
                print_with_style(&detail, "destination", destination_ata);
            }
            Rule::NftBurn {
                required_collection,
            }
            | Rule::NftGate {
                required_collection,
            } => print_with_style(&detail, "required collection", required_collection),
            Rule::NftPayment {
                required_collection,
                destination,
            } => {
                print_with_style(&detail, "required collection", required_collection);
                print_with_style(&detail, "destination", destination);
            }
            Rule::RedeemedAmount { maximum } => print_with_style(&detail, "maximum", maximum),
            Rule::TokenBurn { amount, mint } | Rule::TokenGate { amount, mint } => {
                print_with_style(&detail, "amount", amount);
                print_with_style(&detail, "token mint", mint);
            }
        }
    }
}
