pub mod orchestrator;
pub mod process;

pub use orchestrator::*;
pub use process::*;
