//! Capabilities of agents used by the update steps.
use crate::dist::ActionDistribution;
use anyhow::Result;
use candle_core::Tensor;

/// Policy-dependent quantities for a batch of `(state, action)` pairs.
///
/// All tensors have shape `(batch_size,)` and keep their computation graph.
#[derive(Clone, Debug)]
pub struct PolicyOutputs {
    /// Log-probabilities of the actions.
    pub logp: Tensor,

    /// State values.
    pub value: Tensor,

    /// Entropies of the action distributions.
    pub entropy: Tensor,
}

impl PolicyOutputs {
    /// Returns a copy cut off from the computation graph.
    pub fn detach(&self) -> Self {
        Self {
            logp: self.logp.detach(),
            value: self.value.detach(),
            entropy: self.entropy.detach(),
        }
    }
}

/// A trainable stochastic policy.
pub trait StochasticPolicy {
    /// Log-probabilities (densities) of actions given states.
    fn logp(&self, obs: &Tensor, act: &Tensor) -> Result<Tensor>;

    /// Performs one optimization step on the policy parameters.
    ///
    /// The gradients of `loss` are computed, their global L2 norm is clipped to
    /// `max_grad_norm` if given, and the optimizer is stepped once.
    /// Returns the gradient norm before clipping.
    fn backward_step(&mut self, loss: &Tensor, max_grad_norm: Option<f64>) -> Result<f32>;
}

/// A stochastic policy with a state-value head.
pub trait ActorCritic: StochasticPolicy {
    /// Action distribution produced by the policy.
    type Dist: ActionDistribution;

    /// Returns the action distribution and the state value for a batch of states.
    fn forward(&self, obs: &Tensor) -> Result<(Self::Dist, Tensor)>;

    /// Computes log-probabilities, values and entropies for a batch.
    fn evaluate(&self, obs: &Tensor, act: &Tensor) -> Result<PolicyOutputs> {
        let (dist, value) = self.forward(obs)?;
        Ok(PolicyOutputs {
            logp: dist.log_prob(act)?,
            value,
            entropy: dist.entropy()?,
        })
    }
}
