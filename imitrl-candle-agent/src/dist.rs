//! Action distributions.
use anyhow::Result;
use candle_core::{DType, Tensor, D};
use candle_nn::ops::log_softmax;

/// Distribution of actions predicted by a policy for a batch of states.
pub trait ActionDistribution {
    /// Log-probabilities (densities) of the given actions, shape `(batch_size,)`.
    fn log_prob(&self, act: &Tensor) -> Result<Tensor>;

    /// Entropy of the distribution for each state, shape `(batch_size,)`.
    fn entropy(&self) -> Result<Tensor>;
}

/// Categorical distribution over discrete actions.
///
/// Actions are indices of shape `(batch_size,)`.
pub struct Categorical {
    log_probs: Tensor,
}

impl Categorical {
    /// Constructs the distribution from unnormalized logits of shape
    /// `(batch_size, n_actions)`.
    pub fn from_logits(logits: &Tensor) -> Result<Self> {
        Ok(Self {
            log_probs: log_softmax(logits, D::Minus1)?,
        })
    }

    /// Returns the normalized log-probabilities of all actions.
    pub fn log_probs(&self) -> &Tensor {
        &self.log_probs
    }
}

impl ActionDistribution for Categorical {
    fn log_prob(&self, act: &Tensor) -> Result<Tensor> {
        let ixs = act
            .flatten_all()?
            .to_dtype(DType::U32)?
            .to_device(self.log_probs.device())?
            .unsqueeze(D::Minus1)?;
        Ok(self.log_probs.gather(&ixs, D::Minus1)?.squeeze(D::Minus1)?)
    }

    fn entropy(&self) -> Result<Tensor> {
        let probs = self.log_probs.exp()?;
        Ok((probs * &self.log_probs)?.sum(D::Minus1)?.neg()?)
    }
}

/// Gaussian distribution with diagonal covariance over continuous actions.
///
/// Actions have shape `(batch_size, action_dim)`; densities are products over
/// the action dimensions.
pub struct DiagGaussian {
    mean: Tensor,
    log_std: Tensor,
}

impl DiagGaussian {
    /// Constructs the distribution.
    ///
    /// `log_std` is broadcast to the shape of `mean`, so a state-independent
    /// vector of shape `(action_dim,)` is accepted.
    pub fn new(mean: Tensor, log_std: &Tensor) -> Result<Self> {
        let log_std = log_std.broadcast_as(mean.shape())?;
        Ok(Self { mean, log_std })
    }

    /// Mean of the distribution.
    pub fn mean(&self) -> &Tensor {
        &self.mean
    }

    /// Draws actions with the reparameterization `mean + std * N(0, 1)`.
    pub fn sample(&self) -> Result<Tensor> {
        let eps = self.mean.randn_like(0., 1.)?;
        Ok((&self.mean + (self.log_std.exp()? * eps)?)?.detach())
    }
}

impl ActionDistribution for DiagGaussian {
    fn log_prob(&self, act: &Tensor) -> Result<Tensor> {
        let act = act
            .to_dtype(DType::F32)?
            .to_device(self.mean.device())?
            .reshape(self.mean.shape())?;
        let z = ((act - &self.mean)? / self.log_std.exp()?)?;
        let c = 0.5 * (2.0 * std::f64::consts::PI).ln();
        let logp = ((z.sqr()? * -0.5)? - &self.log_std)?;
        Ok((logp - c)?.sum(D::Minus1)?)
    }

    fn entropy(&self) -> Result<Tensor> {
        let c = 0.5 + 0.5 * (2.0 * std::f64::consts::PI).ln();
        Ok((&self.log_std + c)?.sum(D::Minus1)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use candle_core::Device;

    #[test]
    fn test_categorical() -> Result<()> {
        let logits = Tensor::from_slice(&[0f32, 0.0, 0.0, 2f32.ln(), 0.0, 0.0], (2, 3), &Device::Cpu)?;
        let dist = Categorical::from_logits(&logits)?;
        let act = Tensor::from_slice(&[1u32, 0], (2,), &Device::Cpu)?;

        let logp: Vec<f32> = dist.log_prob(&act)?.to_vec1()?;
        assert!((logp[0] - (1f32 / 3.0).ln()).abs() < 1e-5);
        assert!((logp[1] - 0.5f32.ln()).abs() < 1e-5);

        let entropy: Vec<f32> = dist.entropy()?.to_vec1()?;
        assert!((entropy[0] - 3f32.ln()).abs() < 1e-5);
        let h1 = -(0.5f32 * 0.5f32.ln() + 2.0 * 0.25 * 0.25f32.ln());
        assert!((entropy[1] - h1).abs() < 1e-5);

        Ok(())
    }

    #[test]
    fn test_diag_gaussian() -> Result<()> {
        let mean = Tensor::from_slice(&[0f32, 1.0, 0.0, 0.0], (2, 2), &Device::Cpu)?;
        let log_std = Tensor::from_slice(&[0f32, 1f32.ln()], (2,), &Device::Cpu)?;
        let dist = DiagGaussian::new(mean, &log_std)?;
        let act = Tensor::from_slice(&[0f32, 1.0, 1.0, 0.0], (2, 2), &Device::Cpu)?;

        let logp: Vec<f32> = dist.log_prob(&act)?.to_vec1()?;
        let log_norm = -0.5 * (2.0 * std::f32::consts::PI).ln();
        assert!((logp[0] - 2.0 * log_norm).abs() < 1e-5);
        assert!((logp[1] - (2.0 * log_norm - 0.5)).abs() < 1e-5);

        let entropy: Vec<f32> = dist.entropy()?.to_vec1()?;
        let h = 1.0 + (2.0 * std::f32::consts::PI).ln();
        assert!((entropy[0] - h).abs() < 1e-5);
        assert_eq!(entropy.len(), 2);

        Ok(())
    }
}
