use std::{env, fs::File, path::PathBuf};

use crate::config::data::*;

fn home_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        let drive = env::var_os("HOMEDRIVE")?;
        let path = env::var_os("HOMEPATH")?;
        Some(PathBuf::from(drive).join(path))
    } else {
        env::var_os("HOME").map(PathBuf::from)
    }
}

/// Solana CLI configuration, when present and readable.
pub fn parse_solana_config() -> Option<SolanaConfig> {
    let config_path = home_dir()?
        .join(".config")
        .join("solana")
        .join("cli")
        .join("config.yml");

    let conf_file = File::open(config_path).ok()?;
    serde_yaml::from_reader(&conf_file).ok()
}

/// Strips the transport noise of RPC errors down to the program message.
pub fn parse_checker_errors(msg: &str) -> String {
    match msg.find("custom program error:") {
        Some(index) => msg[index..].to_string(),
        None => msg.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_errors_are_trimmed() {
        let msg = "RPC response error -32002: Transaction simulation failed: Error processing \
                   Instruction 4: custom program error: 0x177b";
        assert_eq!(parse_checker_errors(msg), "custom program error: 0x177b");
        assert_eq!(parse_checker_errors("plain"), "plain");
    }
}
