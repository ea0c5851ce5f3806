//! The two verification graphs built on the engine.
//!
//! - [`commands`]: every contributed command is found in the command palette
//! - [`marketplace`]: the extensions view lists the installed extension with
//!   the expected title, description, author and installed flag

use std::time::Duration;

pub mod commands;
pub mod marketplace;
pub mod metadata;

pub use commands::{
    command_scenario, command_scenario_builder, resume_target, CommandContext,
    CommandContextPatch, CommandDeps, CommandState, Commands,
};
pub use marketplace::{
    marketplace_scenario, marketplace_scenario_builder, Marketplace, MarketplaceDeps,
    MarketplaceState,
};
pub use metadata::ExtensionMetadata;

/// Grace window before a state repeats a UI trigger such as opening a view.
pub const TRIGGER_WINDOW: Duration = Duration::from_millis(7500);
