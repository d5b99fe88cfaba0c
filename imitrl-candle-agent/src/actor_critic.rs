//! Actor-critic model trained by PPO and behavioural cloning.
mod base;
mod config;
pub use base::{ActorCriticDist, ActorCriticModel};
pub use config::{ActionType, ActorCriticModelConfig};
