use clap::{AppSettings, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version, about)]
#[clap(setting(AppSettings::SubcommandRequiredElseHelp))]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error, off
    #[clap(short, long, global = true)]
    pub log_level: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Evaluate every guard group of the candy machine for a wallet
    Check {
        /// Path to the keypair file, uses Sol config or defaults to "~/.config/solana/id.json"
        #[clap(short, long)]
        keypair: Option<String>,

        /// RPC Url
        #[clap(short, long)]
        rpc_url: Option<String>,

        /// Address of the candy machine, defaults to the CANDY_MACHINE_ID environment variable
        #[clap(long)]
        candy_machine: Option<String>,

        /// Wallet address to check instead of the keypair's
        #[clap(short, long)]
        address: Option<String>,

        /// Path to the allow list file
        #[clap(long, default_value = "allowlist.json")]
        allow_list: String,

        /// Path to the mint text file
        #[clap(long, default_value = "mint_text.json")]
        mint_text: String,

        /// Print the result as JSON
        #[clap(long)]
        json: bool,
    },

    /// Mint one NFT from the candy machine under a guard group
    Mint {
        /// Path to the keypair file, uses Sol config or defaults to "~/.config/solana/id.json"
        #[clap(short, long)]
        keypair: Option<String>,

        /// RPC Url
        #[clap(short, long)]
        rpc_url: Option<String>,

        /// Address of the candy machine, defaults to the CANDY_MACHINE_ID environment variable
        #[clap(long)]
        candy_machine: Option<String>,

        /// Label of the guard group to mint with
        #[clap(short, long, default_value = "default")]
        group: String,

        /// Path to the allow list file
        #[clap(long, default_value = "allowlist.json")]
        allow_list: String,
    },

    /// Show the on-chain guard configuration of the candy machine
    Show {
        /// Path to the keypair file, uses Sol config or defaults to "~/.config/solana/id.json"
        #[clap(short, long)]
        keypair: Option<String>,

        /// RPC Url
        #[clap(short, long)]
        rpc_url: Option<String>,

        /// Address of the candy machine, defaults to the CANDY_MACHINE_ID environment variable
        #[clap(long)]
        candy_machine: Option<String>,
    },

    /// Inspect the allow list registry
    Allowlist {
        #[clap(subcommand)]
        command: AllowlistSubcommands,
    },
}

#[derive(Subcommand)]
pub enum AllowlistSubcommands {
    /// Print the merkle root of the allow lists
    Root {
        /// Label of the allow list, prints every list when omitted
        label: Option<String>,

        /// Path to the allow list file
        #[clap(long, default_value = "allowlist.json")]
        allow_list: String,
    },

    /// Print the merkle proof of an address
    Proof {
        /// Label of the allow list
        label: String,

        /// Address to prove
        address: String,

        /// Path to the allow list file
        #[clap(long, default_value = "allowlist.json")]
        allow_list: String,
    },
}
