//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod catalog;
mod check;
mod completions;
mod config;
mod eval;
mod stream;
mod transform;
mod utils;

pub use catalog::{handle_catalog, CatalogEntry};
pub use check::{handle_check, CheckReport, CheckStatus, RuleCheck};
pub use completions::handle_completions;
pub use config::handle_config;
pub use eval::handle_eval;
pub use stream::handle_stream;
pub use transform::{handle_transform, RuleTrace};
