//! Discriminators of adversarial imitation learning.
//!
//! A discriminator scores `(state, action)` pairs with the probability of
//! being expert behaviour. [`DiscriminatorInput`] carries the inputs of the
//! two supported algorithms; a discriminator given inputs of the other
//! algorithm fails.
mod airl;
mod base;
mod config;
mod gail;
pub use airl::AirlDiscriminator;
pub use base::{Discriminator, DiscriminatorInput};
pub use config::{AirlDiscriminatorConfig, GailDiscriminatorConfig};
pub use gail::GailDiscriminator;
