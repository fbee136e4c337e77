//! DriftGuard CLI and JSON API.
//!
//! The binary in `main.rs` only parses arguments and installs logging; every
//! subcommand and the HTTP server live here so they can be tested directly.

pub mod cli;
pub mod commands;
mod handlers;
pub mod render;
pub mod server;
pub mod state;

pub use cli::{Cli, Commands, ConfigAction};
pub use server::router;
pub use state::{AppState, SharedState};
