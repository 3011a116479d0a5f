use console::Emoji;

/// Label of the guard set used when no group is selected.
pub const DEFAULT_GROUP: &str = "default";

/// Base58 form of the all-ones sentinel address (the zero public key) used
/// when no wallet is connected.
pub const DISCONNECTED_ADDRESS: &str = "11111111111111111111111111111111";

/// Time reported by the oracle when the chain has no block time for the
/// latest slot.
pub const UNAVAILABLE_TIME: i64 = 0;

pub const MINT_TEXT_FALLBACK: &str = "definition missing in mint text configuration";

pub const DEFAULT_ALLOW_LIST_FILE: &str = "allowlist.json";
pub const DEFAULT_MINT_TEXT_FILE: &str = "mint_text.json";
pub const CANDY_MACHINE_ENV_VAR: &str = "CANDY_MACHINE_ID";
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_KEYPATH: &str = "~/.config/solana/id.json";
pub const LOG_FILE: &str = "guard-checker.log";

pub const MINT_LIMIT_SEED: &str = "mint_limit";
pub const ALLOW_LIST_SEED: &str = "allow_list";
pub const CANDY_MACHINE_SEED: &str = "candy_machine";

/// Discriminator length of anchor accounts.
pub const ACCOUNT_DISCRIMINATOR_LEN: usize = 8;

pub const MINT_LAYOUT: u64 = 82;

pub const CANDY_EMOJI: Emoji<'_, '_> = Emoji("🍬 ", "");
pub const GUARD_EMOJI: Emoji<'_, '_> = Emoji("🛡  ", "");
pub const LOOKING_GLASS_EMOJI: Emoji<'_, '_> = Emoji("🔍 ", "");
pub const KEY_EMOJI: Emoji<'_, '_> = Emoji("🔑 ", "");
pub const COMPLETE_EMOJI: Emoji<'_, '_> = Emoji("✅ ", "");
pub const ERROR_EMOJI: Emoji<'_, '_> = Emoji("🛑 ", "");
pub const WARNING_EMOJI: Emoji<'_, '_> = Emoji("⚠️  ", "");
