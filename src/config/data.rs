use std::{fmt::Display, fs::File, path::Path};

use anchor_client::solana_sdk::signature::Keypair;
use serde::{Deserialize, Serialize, Serializer};
use tracing::info;

use crate::{config::errors::ConfigError, constants::MINT_TEXT_FALLBACK};

pub struct GuardCheckerConfig {
    /// `None` when no keypair could be loaded; the identity is then the
    /// disconnected sentinel.
    pub keypair: Option<Keypair>,
    pub rpc_url: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SolanaConfig {
    pub json_rpc_url: String,
    pub keypair_path: String,
    pub commitment: String,
}

/// Display copy for one guard group.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MintText {
    pub label: String,
    pub mint_text: String,
    pub button_label: String,
}

#[derive(Debug, Clone, Default)]
pub struct MintCopy(Vec<MintText>);

impl MintCopy {
    pub fn new(entries: Vec<MintText>) -> Self {
        MintCopy(entries)
    }

    /// Loads a JSON array of mint texts. A missing file yields no copy.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Mint text file {} not found, using fallback copy", path.display());
            return Ok(MintCopy::default());
        }

        let file = File::open(path)
            .map_err(|err| ConfigError::FileOpenError(format!("{}: {}", path.display(), err)))?;
        let entries = serde_json::from_reader(file)
            .map_err(|err| ConfigError::ParseError(format!("{}: {}", path.display(), err)))?;

        Ok(MintCopy(entries))
    }

    pub fn get(&self, label: &str) -> Option<&MintText> {
        self.0.iter().find(|entry| entry.label == label)
    }

    /// `(mint text, button label)` for `label`, with the fallback text when
    /// no copy is defined.
    pub fn texts_for(&self, label: &str) -> (String, String) {
        match self.get(label) {
            Some(entry) => (entry.mint_text.clone(), entry.button_label.clone()),
            None => (
                MINT_TEXT_FALLBACK.to_string(),
                MINT_TEXT_FALLBACK.to_string(),
            ),
        }
    }
}

pub fn to_string<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: Display,
    S: Serializer,
{
    serializer.collect_str(value)
}
