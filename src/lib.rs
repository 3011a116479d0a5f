pub mod allow_list;
pub mod candy_machine;
pub mod chain;
pub mod check;
pub mod cli;
pub mod common;
pub mod config;
pub mod constants;
pub mod errors;
pub mod guards;
pub mod identity;
pub mod mint;
pub mod oracle;
pub mod parse;
pub mod pdas;
pub mod render;
pub mod setup;
pub mod show;
pub mod utils;
