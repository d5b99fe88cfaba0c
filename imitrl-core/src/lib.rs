#![warn(missing_docs)]
//! Core of a policy optimization and imitation learning library.
//!
//! This crate holds the parts that do not depend on a tensor backend:
//! generalized advantage estimation, shuffled mini-batch sampling,
//! indexed access to transitions, records of update steps and errors.
pub mod error;
pub mod gae;
pub mod record;

mod algorithm;
mod indexer;
mod minibatch;
pub use algorithm::AdversarialAlgorithm;
pub use indexer::{check_index, n_transitions, TransitionIndexer};
pub use minibatch::MiniBatchSampler;
