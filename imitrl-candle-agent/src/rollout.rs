//! Rollouts and the batches consumed by policy optimization.
use crate::policy::PolicyOutputs;
use anyhow::Result;
use candle_core::{DType, Tensor};
use imitrl_core::{
    error::ImitrlError,
    gae::{compute_advantages, GaeConfig},
};
use log::debug;

/// Data collected by running a policy in an environment.
///
/// `outputs` are the policy outputs on `(obs, act)` at collection time.
pub struct Rollout {
    /// States, time-ordered along the first dimension.
    pub obs: Tensor,
    /// Actions taken in the states.
    pub act: Tensor,
    /// Rewards.
    pub reward: Vec<f32>,
    /// Termination flags marking episode boundaries.
    pub is_terminated: Vec<i8>,
    /// Policy outputs on `(obs, act)` at collection time.
    pub outputs: PolicyOutputs,
}

impl Rollout {
    /// Labels the rollout with advantages and rewards-to-go.
    ///
    /// Advantages are computed on detached value estimates. The collection-time
    /// log-probabilities are frozen as `old_logp` and the outputs are kept as
    /// cached outputs of the batch.
    pub fn into_batch(self, config: &GaeConfig) -> Result<RolloutBatch> {
        let values: Vec<f32> = self
            .outputs
            .value
            .detach()
            .to_dtype(DType::F32)?
            .flatten_all()?
            .to_vec1()?;
        let advs = compute_advantages(&self.reward, &self.is_terminated, &values, config)?;
        let advantages = match config.normalize_advantages {
            true => advs.normalized(),
            false => advs.advantages,
        };
        debug!("Computed advantages of {} transitions", advantages.len());

        let outputs = self.outputs;
        let old_logp = outputs.logp.detach();
        let batch = RolloutBatch::new(self.obs, self.act, advantages, advs.rewards_to_go, old_logp)?;
        Ok(batch.with_cached_outputs(outputs))
    }
}

/// Transitions labelled for policy optimization.
///
/// `advantages`, `rewards_to_go` and `old_logp` are constants of shape
/// `(batch_size,)` and stay fixed for all epochs of an update cycle.
#[derive(Clone, Debug)]
pub struct RolloutBatch {
    obs: Tensor,
    act: Tensor,
    advantages: Tensor,
    rewards_to_go: Tensor,
    old_logp: Tensor,
    cached_outputs: Option<PolicyOutputs>,
}

fn check_len(field: &str, expected: usize, actual: usize) -> Result<(), ImitrlError> {
    if expected != actual {
        return Err(ImitrlError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

impl RolloutBatch {
    /// Creates a batch.
    ///
    /// Fails with [`ImitrlError::LengthMismatch`] if the fields do not have the
    /// same number of transitions.
    pub fn new(
        obs: Tensor,
        act: Tensor,
        advantages: Vec<f32>,
        rewards_to_go: Vec<f32>,
        old_logp: Tensor,
    ) -> Result<Self> {
        let n = obs.dim(0)?;
        check_len("act", n, act.dim(0)?)?;
        check_len("advantages", n, advantages.len())?;
        check_len("rewards_to_go", n, rewards_to_go.len())?;
        check_len("old_logp", n, old_logp.elem_count())?;

        let device = obs.device().clone();
        Ok(Self {
            obs,
            act,
            advantages: Tensor::from_vec(advantages, (n,), &device)?,
            rewards_to_go: Tensor::from_vec(rewards_to_go, (n,), &device)?,
            old_logp: old_logp.detach().flatten_all()?,
            cached_outputs: None,
        })
    }

    /// Attaches policy outputs computed on this batch before any update.
    pub fn with_cached_outputs(mut self, outputs: PolicyOutputs) -> Self {
        self.cached_outputs = Some(outputs);
        self
    }

    /// Removes the cached outputs.
    pub fn take_cached_outputs(&mut self) -> Option<PolicyOutputs> {
        self.cached_outputs.take()
    }

    /// Number of transitions.
    pub fn len(&self) -> usize {
        self.advantages.elem_count()
    }

    /// Returns `true` for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// States.
    pub fn obs(&self) -> &Tensor {
        &self.obs
    }

    /// Actions.
    pub fn act(&self) -> &Tensor {
        &self.act
    }

    /// Advantages, shape `(batch_size,)`.
    pub fn advantages(&self) -> &Tensor {
        &self.advantages
    }

    /// Rewards-to-go, shape `(batch_size,)`.
    pub fn rewards_to_go(&self) -> &Tensor {
        &self.rewards_to_go
    }

    /// Log-probabilities of the actions before the update cycle.
    pub fn old_logp(&self) -> &Tensor {
        &self.old_logp
    }

    /// Policy outputs cached at collection time, if any.
    pub fn cached_outputs(&self) -> Option<&PolicyOutputs> {
        self.cached_outputs.as_ref()
    }
}

/// Builder of [`RolloutBatch`] with named fields.
#[derive(Default)]
pub struct RolloutBatchBuilder {
    obs: Option<Tensor>,
    act: Option<Tensor>,
    advantages: Option<Vec<f32>>,
    rewards_to_go: Option<Vec<f32>>,
    old_logp: Option<Tensor>,
    cached_outputs: Option<PolicyOutputs>,
}

impl RolloutBatchBuilder {
    /// Sets states.
    pub fn obs(mut self, v: Tensor) -> Self {
        self.obs = Some(v);
        self
    }

    /// Sets actions.
    pub fn act(mut self, v: Tensor) -> Self {
        self.act = Some(v);
        self
    }

    /// Sets advantages.
    pub fn advantages(mut self, v: Vec<f32>) -> Self {
        self.advantages = Some(v);
        self
    }

    /// Sets rewards-to-go.
    pub fn rewards_to_go(mut self, v: Vec<f32>) -> Self {
        self.rewards_to_go = Some(v);
        self
    }

    /// Sets the log-probabilities before the update cycle.
    pub fn old_logp(mut self, v: Tensor) -> Self {
        self.old_logp = Some(v);
        self
    }

    /// Sets cached policy outputs.
    pub fn cached_outputs(mut self, v: PolicyOutputs) -> Self {
        self.cached_outputs = Some(v);
        self
    }

    /// Builds [`RolloutBatch`].
    ///
    /// Fails with [`ImitrlError::MissingField`] if a field other than the
    /// cached outputs is not set.
    pub fn build(self) -> Result<RolloutBatch> {
        fn required<T>(v: Option<T>, field: &str) -> Result<T, ImitrlError> {
            v.ok_or_else(|| ImitrlError::MissingField(field.to_string()))
        }

        let batch = RolloutBatch::new(
            required(self.obs, "obs")?,
            required(self.act, "act")?,
            required(self.advantages, "advantages")?,
            required(self.rewards_to_go, "rewards_to_go")?,
            required(self.old_logp, "old_logp")?,
        )?;

        Ok(match self.cached_outputs {
            Some(outputs) => batch.with_cached_outputs(outputs),
            None => batch,
        })
    }
}
