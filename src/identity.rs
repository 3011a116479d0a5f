use std::fmt::{self, Display};

use anchor_client::solana_sdk::pubkey::Pubkey;

/// Address of the connected wallet, or the sentinel when none is connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity(Pubkey);

impl Identity {
    pub fn new(address: Pubkey) -> Self {
        Identity(address)
    }

    pub fn disconnected() -> Self {
        Identity(Pubkey::default())
    }

    pub fn address(&self) -> &Pubkey {
        &self.0
    }

    pub fn is_connected(&self) -> bool {
        self.0 != Pubkey::default()
    }
}

impl From<Pubkey> for Identity {
    fn from(address: Pubkey) -> Self {
        Identity(address)
    }
}

impl Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
