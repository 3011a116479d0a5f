use std::{fs::OpenOptions, path::PathBuf, str::FromStr};

use anyhow::{anyhow, Result};
use clap::Parser;
use console::style;
use guard_checker::{
    allow_list::{
        process_allow_list_proof, process_allow_list_root, AllowListProofArgs, AllowListRootArgs,
    },
    check::{process_check, CheckArgs},
    cli::{AllowlistSubcommands, Cli, Commands},
    constants::{COMPLETE_EMOJI, ERROR_EMOJI, LOG_FILE},
    mint::{process_mint, MintArgs},
    parse::parse_checker_errors,
    show::{process_show, ShowArgs},
};
use tracing::subscriber::set_global_default;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{self, filter::LevelFilter, prelude::*, EnvFilter};

fn setup_logging(level: Option<EnvFilter>) -> Result<()> {
    // Log in current directory for now.
    let log_path = PathBuf::from(LOG_FILE);

    let file = OpenOptions::new()
        .write(true)
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Prioritize user-provided level, otherwise read from RUST_LOG env var for log level, fall back to "trace" if not set.
    let env_filter = if let Some(filter) = level {
        filter
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("trace"))
    };

    let formatting_layer = BunyanFormattingLayer::new("guard-checker".into(), file);
    let level_filter = LevelFilter::from_str(&env_filter.to_string())?;

    let subscriber = tracing_subscriber::registry()
        .with(formatting_layer.with_filter(level_filter))
        .with(JsonStorageLayer);

    set_global_default(subscriber)?;

    Ok(())
}

#[tokio::main(worker_threads = 4)]
async fn main() {
    match run().await {
        Ok(()) => {
            println!(
                "\n{}{}",
                COMPLETE_EMOJI,
                style("Command successful.").green().bold().dim()
            );
        }
        Err(err) => {
            let parsed_err = parse_checker_errors(&err.to_string());

            println!(
                "\n{}{} {}",
                ERROR_EMOJI,
                style("Error running command:").red(),
                parsed_err,
            );
            // finished the program with an error code to the OS
            std::process::exit(1);
        }
    }
}

async fn run() -> Result<()> {
    solana_logger::setup_with_default("solana=off");

    let cli = Cli::parse();

    if let Some(user_filter) = cli.log_level {
        let filter = EnvFilter::from_str(&user_filter).map_err(|_| {
            anyhow!(
                "Invalid log level: {:?}.\n Valid levels are: trace, debug, info, warn, error.",
                user_filter
            )
        })?;
        setup_logging(Some(filter))?;
    } else {
        setup_logging(None)?;
    }

    tracing::info!("Checking candy guards.");

    match cli.command {
        Commands::Check {
            keypair,
            rpc_url,
            candy_machine,
            address,
            allow_list,
            mint_text,
            json,
        } => {
            process_check(CheckArgs {
                keypair,
                rpc_url,
                candy_machine,
                address,
                allow_list,
                mint_text,
                json,
            })
            .await?
        }
        Commands::Mint {
            keypair,
            rpc_url,
            candy_machine,
            group,
            allow_list,
        } => {
            process_mint(MintArgs {
                keypair,
                rpc_url,
                candy_machine,
                group,
                allow_list,
            })
            .await?
        }
        Commands::Show {
            keypair,
            rpc_url,
            candy_machine,
        } => {
            process_show(ShowArgs {
                keypair,
                rpc_url,
                candy_machine,
            })
            .await?
        }
        Commands::Allowlist { command } => match command {
            AllowlistSubcommands::Root { label, allow_list } => {
                process_allow_list_root(AllowListRootArgs { allow_list, label })?
            }
            AllowlistSubcommands::Proof {
                label,
                address,
                allow_list,
            } => process_allow_list_proof(AllowListProofArgs {
                allow_list,
                label,
                address,
            })?,
        },
    }

    Ok(())
}
