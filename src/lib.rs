// Initiatived - Citizen Initiative Tracker
// Lifecycle management, dashboard statistics and AI urgency scoring for
// citizen-submitted initiatives.

pub mod cli;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
pub mod store;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use error::CoreError;
pub use models::{Category, Initiative, InitiativeStatus, InitiativedConfig};
pub use store::JsonStore;
