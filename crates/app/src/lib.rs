//! VoxPlay application shell: CLI, configuration, user accounts, and the
//! runtime that drives a game over the voice session.

pub mod config;
pub mod runtime;
pub mod stdin_voice;
pub mod users;
