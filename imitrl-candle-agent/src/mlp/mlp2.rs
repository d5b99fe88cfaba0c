use super::{create_linear_layers, mlp_forward, MlpConfig};
use crate::model::SubModel1;
use anyhow::Result;
use candle_core::{Device, Module, Tensor, D};
use candle_nn::{linear, Linear, VarBuilder};

/// Multilayer perceptron with a policy head and a scalar value head.
///
/// The hidden layers given by `units` are shared by both heads. The policy head
/// outputs `out_dim` values (logits or action means), the value head a tensor of
/// shape `(batch_size,)`.
pub struct Mlp2 {
    _config: MlpConfig,
    device: Device,
    policy_head: Linear,
    value_head: Linear,
    layers: Vec<Linear>,
}

impl SubModel1 for Mlp2 {
    type Config = MlpConfig;
    type Input = Tensor;
    type Output = (Tensor, Tensor);

    fn forward(&self, xs: &Self::Input) -> Result<Self::Output> {
        let xs = xs.to_device(&self.device)?;
        let xs = mlp_forward(&xs, &self.layers, true)?;
        let policy = self.policy_head.forward(&xs)?;
        let value = self.value_head.forward(&xs)?.squeeze(D::Minus1)?;
        Ok((policy, value))
    }

    fn build(vs: VarBuilder, config: Self::Config) -> Result<Self> {
        let device = vs.device().clone();
        let layers = create_linear_layers("mlp", vs.clone(), config.in_dim, &config.units, None)?;
        let in_dim = *config.units.last().unwrap_or(&config.in_dim);
        let policy_head = linear(in_dim as _, config.out_dim as _, vs.pp("policy"))?;
        let value_head = linear(in_dim as _, 1, vs.pp("value"))?;

        Ok(Self {
            _config: config,
            device,
            policy_head,
            value_head,
            layers,
        })
    }
}
