//! PPO update steps.
use super::{ppo_loss, PpoConfig};
use crate::{
    policy::{ActorCritic, PolicyOutputs},
    rollout::RolloutBatch,
    util::mean_scalar,
};
use anyhow::Result;
use imitrl_core::{
    error::ImitrlError,
    record::{Record, RecordStorage, RecordValue},
};
use log::{debug, trace};

/// Proximal policy optimization.
///
/// The advantages, rewards-to-go and old log-probabilities of a
/// [`RolloutBatch`] are fixed for the whole update cycle; only the policy
/// outputs are recomputed between gradient steps.
pub struct Ppo {
    config: PpoConfig,
}

impl Ppo {
    /// Creates PPO with the given configuration.
    pub fn new(config: PpoConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PpoConfig {
        &self.config
    }

    /// Performs exactly one gradient step on `model`.
    ///
    /// With `reuse_cached_outputs`, the policy outputs cached in the batch at
    /// collection time are used, which fails with [`ImitrlError::MissingField`]
    /// if the batch has none. Otherwise the outputs are recomputed with the
    /// current parameters.
    pub fn update<M: ActorCritic>(
        &self,
        model: &mut M,
        batch: &RolloutBatch,
        reuse_cached_outputs: bool,
    ) -> Result<Record> {
        let outputs: PolicyOutputs = match reuse_cached_outputs {
            true => batch
                .cached_outputs()
                .cloned()
                .ok_or_else(|| ImitrlError::MissingField("cached_outputs".to_string()))?,
            false => model.evaluate(batch.obs(), batch.act())?,
        };
        trace!(
            "logp: {:?}, value: {:?}, entropy: {:?}",
            outputs.logp.dims(),
            outputs.value.dims(),
            outputs.entropy.dims()
        );

        let loss = ppo_loss(&outputs, batch, &self.config)?;
        let grad_norm = model.backward_step(&loss.total, self.config.max_grad_norm)?;

        Ok(Record::from_slice(&[
            ("loss_policy", RecordValue::Scalar(mean_scalar(&loss.policy)?)),
            ("loss_value", RecordValue::Scalar(mean_scalar(&loss.value)?)),
            ("loss_entropy", RecordValue::Scalar(mean_scalar(&loss.entropy)?)),
            ("loss", RecordValue::Scalar(mean_scalar(&loss.total)?)),
            ("grad_norm", RecordValue::Scalar(grad_norm)),
            ("ratio_mean", RecordValue::Scalar(mean_scalar(&loss.ratio)?)),
        ]))
    }

    /// Runs the epochs of an update cycle on one batch.
    ///
    /// The first epoch reuses the cached outputs of the batch if present, the
    /// following epochs recompute them. Scalars of the returned record are
    /// averaged over epochs.
    pub fn opt<M: ActorCritic>(&self, model: &mut M, batch: &RolloutBatch) -> Result<Record> {
        let mut storage = RecordStorage::new();

        for epoch in 0..self.config.n_epochs {
            let reuse = epoch == 0 && batch.cached_outputs().is_some();
            let record = self.update(model, batch, reuse)?;
            trace!("epoch {}: loss = {:?}", epoch, record.get_scalar("loss"));
            storage.store(record);
        }

        let record = storage.aggregate();
        debug!(
            "PPO: {} epochs on {} transitions, loss = {:?}",
            self.config.n_epochs,
            batch.len(),
            record.get_scalar("loss")
        );
        Ok(record)
    }
}
