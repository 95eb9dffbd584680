/// Core game logic: loading, firing, status, inactivity timeout.
pub mod game_service;
/// Misfire sampling over ordinary group messages.
pub mod misfire_service;
/// Mute penalty resolution and dispatch.
pub mod penalty_service;
/// Deferred execution of classifier-detected intents.
pub mod trigger_service;
