//! Utilities.
use anyhow::Result;
use candle_core::{DType, Device, Tensor};
use candle_nn::encoding::one_hot;

/// Interface for handling output dimensions.
pub trait OutDim {
    /// Returns the output dimension.
    fn get_out_dim(&self) -> i64;

    /// Sets the  output dimension.
    fn set_out_dim(&mut self, v: i64);
}

/// Binary cross-entropy between probabilities and a constant target label.
///
/// As in PyTorch, log-probabilities are clamped from below at `-100`.
pub fn binary_cross_entropy(prob: &Tensor, target: f64) -> Result<Tensor> {
    let log_p = prob.log()?.maximum(-100f64)?;
    let log_1mp = prob.affine(-1.0, 1.0)?.log()?.maximum(-100f64)?;
    let ll = ((log_p * target)? + (log_1mp * (1.0 - target))?)?;
    Ok(ll.mean_all()?.neg()?)
}

/// Converts actions to float features.
///
/// With `n_discrete_actions = Some(n)`, action indices are one-hot encoded
/// into `n` dimensions.
pub fn action_features(act: &Tensor, n_discrete_actions: Option<usize>) -> Result<Tensor> {
    match n_discrete_actions {
        Some(n) => {
            let device = act.device().clone();
            let ixs = act.flatten_all()?.to_dtype(DType::U32)?.to_device(&Device::Cpu)?;
            Ok(one_hot(ixs, n, 1f32, 0f32)?.to_device(&device)?)
        }
        None => Ok(act.to_dtype(DType::F32)?),
    }
}

/// Returns the mean of a tensor as `f32`.
pub fn mean_scalar(t: &Tensor) -> Result<f32> {
    Ok(t.detach()
        .to_dtype(DType::F32)?
        .mean_all()?
        .to_scalar::<f32>()?)
}
