pub mod merkle;
pub mod process;

pub use merkle::*;
pub use process::*;

use std::{fs::File, path::Path, str::FromStr};

use anchor_client::solana_sdk::pubkey::Pubkey;
use indexmap::IndexMap;
use tracing::info;

use crate::config::ConfigError;

/// Allow lists keyed by guard group label.
#[derive(Debug, Clone, Default)]
pub struct AllowListRegistry {
    lists: IndexMap<String, Vec<Pubkey>>,
}

impl AllowListRegistry {
    pub fn new() -> Self {
        AllowListRegistry::default()
    }

    pub fn insert<L: Into<String>>(&mut self, label: L, addresses: Vec<Pubkey>) {
        self.lists.insert(label.into(), addresses);
    }

    /// Loads a JSON object of `label -> [address]`. A missing file is an
    /// empty registry.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            info!("Allow list file {} not found, using an empty registry", path.display());
            return Ok(AllowListRegistry::new());
        }

        let file = File::open(path)
            .map_err(|err| ConfigError::FileOpenError(format!("{}: {}", path.display(), err)))?;
        let raw: IndexMap<String, Vec<String>> = serde_json::from_reader(file)
            .map_err(|err| ConfigError::ParseError(format!("{}: {}", path.display(), err)))?;

        let mut registry = AllowListRegistry::new();

        for (label, addresses) in raw {
            let addresses = addresses
                .iter()
                .map(|address| {
                    Pubkey::from_str(address).map_err(|_| {
                        ConfigError::InvalidAddress(format!(
                            "{} (allow list '{}')",
                            address, label
                        ))
                    })
                })
                .collect::<Result<Vec<Pubkey>, ConfigError>>()?;
            registry.insert(label, addresses);
        }

        Ok(registry)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.lists.keys().map(String::as_str)
    }

    pub fn has(&self, label: &str) -> bool {
        self.lists.contains_key(label)
    }

    pub fn is_member(&self, label: &str, address: &Pubkey) -> bool {
        self.lists
            .get(label)
            .map(|addresses| addresses.contains(address))
            .unwrap_or(false)
    }

    fn tree(&self, label: &str) -> Option<MerkleTree> {
        let leaves: Vec<String> = self
            .lists
            .get(label)?
            .iter()
            .map(Pubkey::to_string)
            .collect();
        MerkleTree::from_data(&leaves)
    }

    /// Root to configure on the allow list guard of `label`.
    pub fn merkle_root(&self, label: &str) -> Option<[u8; 32]> {
        self.tree(label).map(|tree| tree.root())
    }

    pub fn merkle_proof(&self, label: &str, address: &Pubkey) -> Option<Vec<[u8; 32]>> {
        let index = self.lists.get(label)?.iter().position(|a| a == address)?;
        self.tree(label)?.proof(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> (AllowListRegistry, Vec<Pubkey>) {
        let addresses: Vec<Pubkey> = (0..5).map(|_| Pubkey::new_unique()).collect();
        let mut registry = AllowListRegistry::new();
        registry.insert("vip", addresses.clone());
        (registry, addresses)
    }

    #[test]
    fn membership_is_per_label() {
        let (registry, addresses) = registry();

        assert!(registry.has("vip"));
        assert!(!registry.has("public"));
        assert!(registry.is_member("vip", &addresses[3]));
        assert!(!registry.is_member("vip", &Pubkey::new_unique()));
        assert!(!registry.is_member("public", &addresses[3]));
    }

    #[test]
    fn proofs_verify_against_root() {
        let (registry, addresses) = registry();
        let root = registry.merkle_root("vip").unwrap();

        for address in &addresses {
            let proof = registry.merkle_proof("vip", address).unwrap();
            assert!(verify(&proof, &root, &leaf_hash(address.to_string().as_bytes())));
        }

        assert!(registry
            .merkle_proof("vip", &Pubkey::new_unique())
            .is_none());
    }

    #[test]
    fn root_is_deterministic() {
        let (registry, addresses) = registry();
        let mut copy = AllowListRegistry::new();
        copy.insert("other", addresses);

        assert_eq!(registry.merkle_root("vip"), copy.merkle_root("other"));
        assert_eq!(registry.merkle_root("vip"), registry.merkle_root("vip"));
    }
}
