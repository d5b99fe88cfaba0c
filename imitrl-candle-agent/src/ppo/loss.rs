//! Loss of PPO.
use super::PpoConfig;
use crate::{policy::PolicyOutputs, rollout::RolloutBatch};
use anyhow::Result;
use candle_core::Tensor;
use candle_nn::loss::mse;

/// Terms of the PPO loss, scalar tensors except `ratio`.
pub struct PpoLoss {
    /// Clipped surrogate loss.
    pub policy: Tensor,

    /// Mean squared error of values against rewards-to-go.
    pub value: Tensor,

    /// Negative mean entropy.
    pub entropy: Tensor,

    /// `policy + value_loss_coef * value + entropy_loss_coef * entropy`.
    pub total: Tensor,

    /// Importance ratios, shape `(batch_size,)`.
    pub ratio: Tensor,
}

/// Returns the clipped surrogate loss and the importance ratios.
///
/// ```text
/// ratio = exp(logp - old_logp)
/// loss  = -mean(min(ratio * adv, clamp(ratio, 1 - clip, 1 + clip) * adv))
/// ```
pub fn clipped_surrogate_loss(
    logp: &Tensor,
    old_logp: &Tensor,
    adv: &Tensor,
    clip: f64,
) -> Result<(Tensor, Tensor)> {
    let ratio = (logp - old_logp)?.exp()?;
    let surr1 = (&ratio * adv)?;
    let surr2 = (ratio.clamp(1.0 - clip, 1.0 + clip)? * adv)?;
    let loss = surr1.minimum(&surr2)?.mean_all()?.neg()?;
    Ok((loss, ratio))
}

/// Composes the PPO loss from policy outputs on a batch.
pub fn ppo_loss(outputs: &PolicyOutputs, batch: &RolloutBatch, config: &PpoConfig) -> Result<PpoLoss> {
    let (policy, ratio) =
        clipped_surrogate_loss(&outputs.logp, batch.old_logp(), batch.advantages(), config.clip)?;
    let value = mse(&outputs.value, batch.rewards_to_go())?;
    let entropy = outputs.entropy.mean_all()?.neg()?;
    let total = ((&policy + (&value * config.value_loss_coef)?)?
        + (&entropy * config.entropy_loss_coef)?)?;

    Ok(PpoLoss {
        policy,
        value,
        entropy,
        total,
        ratio,
    })
}
