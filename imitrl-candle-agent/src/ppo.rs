//! Proximal policy optimization (PPO) with the clipped surrogate objective.
mod base;
mod config;
mod loss;
pub use base::Ppo;
pub use config::PpoConfig;
pub use loss::{clipped_surrogate_loss, ppo_loss, PpoLoss};
