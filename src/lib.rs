//! Library crate for revolver-duel, exposing the group-chat revolver game
//! engine to host adapters, binaries, and integration tests.

pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod services;
pub mod state;
pub mod store;
pub mod text;

#[cfg(test)]
mod testing;
