//! Types for recording losses and statistics of update steps.
//!
//! Every update step of the library returns a [`Record`], a set of named
//! values such as the loss of the step and the number of processed
//! mini-batches.
//!
//! ```rust
//! use imitrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("loss_policy", RecordValue::Scalar(0.25));
//! record.insert("n_minibatches", RecordValue::Scalar(4.0));
//! assert_eq!(record.get_scalar("loss_policy").unwrap(), 0.25);
//! ```
//!
//! [`RecordStorage`] averages scalar values of several records, which is how
//! multi-epoch and multi-mini-batch updates summarise their losses.
mod base;
mod storage;

pub use base::{Record, RecordValue};
pub use storage::RecordStorage;
