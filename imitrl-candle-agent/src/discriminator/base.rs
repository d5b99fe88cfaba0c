use anyhow::Result;
use candle_core::Tensor;
use imitrl_core::{error::ImitrlError, AdversarialAlgorithm};

/// Inputs of a discriminator for a batch of transitions.
pub enum DiscriminatorInput<'a> {
    /// GAIL scores `(state, action)`.
    Gail {
        obs: &'a Tensor,
        act: &'a Tensor,
    },

    /// AIRL scores `(state, action, next_state)` and is conditioned on the
    /// likelihood of the action under the current policy.
    Airl {
        obs: &'a Tensor,
        act: &'a Tensor,
        next_obs: &'a Tensor,
        policy_prob: &'a Tensor,
    },
}

impl<'a> DiscriminatorInput<'a> {
    /// Returns the algorithm the inputs belong to.
    pub fn algorithm(&self) -> AdversarialAlgorithm {
        match self {
            Self::Gail { .. } => AdversarialAlgorithm::Gail,
            Self::Airl { .. } => AdversarialAlgorithm::Airl,
        }
    }

    pub(crate) fn unsupported(&self, expected: AdversarialAlgorithm) -> ImitrlError {
        ImitrlError::UnsupportedInput {
            expected: expected.to_string(),
            actual: self.algorithm().to_string(),
        }
    }
}

/// A trainable binary classifier of expert against policy behaviour.
pub trait Discriminator {
    /// Probabilities in `(0, 1)` that the inputs are expert data, shape `(batch_size,)`.
    fn forward(&self, input: &DiscriminatorInput) -> Result<Tensor>;

    /// Reward signal for the policy, shape `(batch_size,)`, without gradient.
    fn predict_reward(&self, input: &DiscriminatorInput) -> Result<Tensor>;

    /// Performs one optimization step given a loss.
    fn backward_step(&mut self, loss: &Tensor) -> Result<()>;
}
