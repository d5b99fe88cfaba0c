//! Generalized advantage estimation (GAE).
//!
//! Rewards-to-go and advantages are computed by a backward-in-time fold over
//! a trajectory. The fold state is [`GaeState`]; [`compute_advantages`] runs
//! it over whole trajectories and returns the new values as [`Advantages`]
//! without touching its inputs.
mod base;
mod config;
pub use base::{compute_advantages, Advantages, GaeState};
pub use config::GaeConfig;
