pub mod data;
pub mod errors;

pub use data::*;
pub use errors::*;

use std::{env, str::FromStr};

use anchor_client::solana_sdk::pubkey::Pubkey;

use crate::constants::CANDY_MACHINE_ENV_VAR;

/// Resolves the target candy machine: the command line value takes
/// precedence over the environment.
pub fn candy_machine_id(arg: Option<String>) -> Result<Pubkey, ConfigError> {
    let value = match arg {
        Some(value) => value,
        None => env::var(CANDY_MACHINE_ENV_VAR)
            .map_err(|_| ConfigError::MissingCandyMachineId(CANDY_MACHINE_ENV_VAR.to_string()))?,
    };

    if value.trim().is_empty() {
        return Err(ConfigError::MissingCandyMachineId(
            CANDY_MACHINE_ENV_VAR.to_string(),
        ));
    }

    Pubkey::from_str(value.trim()).map_err(|_| ConfigError::InvalidCandyMachineId(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_is_parsed() {
        let id = Pubkey::new_unique();
        assert_eq!(candy_machine_id(Some(id.to_string())).unwrap(), id);
    }

    #[test]
    fn malformed_argument_is_rejected() {
        let error = candy_machine_id(Some("not-an-address".to_string())).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidCandyMachineId(_)));

        let error = candy_machine_id(Some("  ".to_string())).unwrap_err();
        assert!(matches!(error, ConfigError::MissingCandyMachineId(_)));
    }

    #[test]
    fn mint_copy_falls_back() {
        let copy = MintCopy::new(vec![MintText {
            label: "early".to_string(),
            mint_text: "Early birds".to_string(),
            button_label: "Mint early".to_string(),
        }]);

        assert_eq!(
            copy.texts_for("early"),
            ("Early birds".to_string(), "Mint early".to_string())
        );
        let (mint_text, button_label) = copy.texts_for("public");
        assert_eq!(mint_text, crate::constants::MINT_TEXT_FALLBACK);
        assert_eq!(button_label, crate::constants::MINT_TEXT_FALLBACK);
    }
}
