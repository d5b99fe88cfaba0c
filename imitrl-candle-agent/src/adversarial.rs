//! Adversarial imitation learning (GAIL and AIRL).
//!
//! A discriminator is trained to separate expert transitions from
//! transitions of the current policy. Its reward prediction, see
//! [`Discriminator::predict_reward`](crate::discriminator::Discriminator::predict_reward),
//! is then used to optimize the policy.
mod base;
mod config;
pub use base::AdversarialImitation;
pub use config::AdversarialConfig;
