//! Behavior cloning (BC) update step.
use super::BcConfig;
use crate::{dataset::TransitionDataset, policy::StochasticPolicy, util::mean_scalar};
use anyhow::Result;
use imitrl_core::{
    error::ImitrlError,
    record::{Record, RecordStorage, RecordValue},
    MiniBatchSampler, TransitionIndexer,
};
use log::{debug, trace};

/// Behavior cloning.
///
/// Maximizes the likelihood of expert actions under the policy, one
/// gradient step per mini-batch.
pub struct Bc {
    config: BcConfig,
    sampler: MiniBatchSampler,
}

impl Bc {
    /// Creates BC with the given configuration.
    pub fn new(config: BcConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(ImitrlError::InvalidBatchSize(0).into());
        }
        let sampler = MiniBatchSampler::new(config.seed);
        Ok(Self { config, sampler })
    }

    /// Runs one pass over shuffled mini-batches of expert transitions.
    ///
    /// An incomplete final mini-batch is dropped. The loss of a mini-batch is
    /// `-mean(logp(s, a))`.
    pub fn update<P: StochasticPolicy>(
        &mut self,
        policy: &mut P,
        expert: &TransitionDataset,
    ) -> Result<Record> {
        let batches = self
            .sampler
            .shuffled_batches(expert.len(), self.config.batch_size)?;
        let n_minibatches = batches.len();
        let mut storage = RecordStorage::new();

        for ixs in batches.iter() {
            let batch = expert.sample(ixs)?;
            let loss = policy.logp(&batch.obs, &batch.act)?.mean_all()?.neg()?;
            trace!("BC loss of {} transitions", batch.len());
            policy.backward_step(&loss, None)?;
            storage.store(Record::from_scalar("loss_bc", mean_scalar(&loss)?));
        }

        let mut record = storage.aggregate();
        record.insert("n_minibatches", RecordValue::Scalar(n_minibatches as f32));
        debug!(
            "BC: {} mini-batches, loss_bc = {:?}",
            n_minibatches,
            record.get_scalar("loss_bc")
        );

        Ok(record)
    }
}
