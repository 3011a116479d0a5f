use anchor_client::solana_sdk::signature::{read_keypair_file, Keypair, Signer};
use tracing::{info, warn};

use crate::{
    config::data::GuardCheckerConfig,
    constants::{DEFAULT_KEYPATH, DEFAULT_RPC_URL},
    errors::SetupError,
    identity::Identity,
    parse::parse_solana_config,
};

/// Resolves the RPC url and the minting keypair: command line first, then the
/// Solana CLI config, then the defaults. An unreadable keypair leaves the
/// checker without a wallet.
pub fn checker_setup(
    keypair_opt: Option<String>,
    rpc_url_opt: Option<String>,
) -> Result<GuardCheckerConfig, SetupError> {
    let sol_config_option = parse_solana_config();

    let rpc_url = match rpc_url_opt {
        Some(rpc_url) => rpc_url,
        None => match sol_config_option {
            Some(ref sol_config) => sol_config.json_rpc_url.clone(),
            None => String::from(DEFAULT_RPC_URL),
        },
    };

    if rpc_url.trim().is_empty() {
        return Err(SetupError::GuardCheckerSetupError(
            "RPC url must not be empty".to_string(),
        ));
    }

    let keypair_path = match keypair_opt {
        Some(keypair_path) => keypair_path,
        None => match sol_config_option {
            Some(ref sol_config) => sol_config.keypair_path.clone(),
            None => DEFAULT_KEYPATH.to_string(),
        },
    };

    let keypair = match read_keypair_file(&*shellexpand::tilde(&keypair_path)) {
        Ok(keypair) => {
            info!("Using keypair {}", keypair_path);
            Some(keypair)
        }
        Err(err) => {
            warn!("Failed to read keypair file {}: {}", keypair_path, err);
            None
        }
    };

    Ok(GuardCheckerConfig { keypair, rpc_url })
}

/// Identity of the configured wallet, the disconnected sentinel without one.
pub fn identity_of(keypair: Option<&Keypair>) -> Identity {
    keypair
        .map(|keypair| Identity::new(keypair.pubkey()))
        .unwrap_or_else(Identity::disconnected)
}
