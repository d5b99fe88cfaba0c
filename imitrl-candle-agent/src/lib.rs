//! Policy optimization and imitation learning implemented with
//! [candle](https://crates.io/crates/candle-core).
//!
//! The update steps are
//!
//! * [`Ppo`](ppo::Ppo): clipped proximal policy optimization on a
//!   [`RolloutBatch`](rollout::RolloutBatch) labelled by generalized
//!   advantage estimation,
//! * [`Bc`](bc::Bc): behavioral cloning on expert transitions,
//! * [`AdversarialImitation`](adversarial::AdversarialImitation): training of
//!   a GAIL or AIRL discriminator.
//!
//! Each step returns an [`imitrl_core::record::Record`] of its losses.
pub mod actor_critic;
pub mod adversarial;
pub mod bc;
pub mod dataset;
pub mod discriminator;
pub mod dist;
pub mod mlp;
pub mod model;
pub mod opt;
pub mod policy;
pub mod ppo;
pub mod rollout;
pub mod util;
