//! AIRL discriminator.
use super::{AirlDiscriminatorConfig, Discriminator, DiscriminatorInput};
use crate::{
    model::{SubModel1, SubModel2},
    opt::{Optimizer, OptimizerConfig},
    util::action_features,
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::{ops::sigmoid, VarBuilder, VarMap};
use imitrl_core::AdversarialAlgorithm;
use log::{info, trace};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

const MIN_PROB: f64 = 1e-12;

/// Discriminator of adversarial inverse reinforcement learning.
///
/// With a reward network `g(s, a)` and a shaping network `h(s)`,
///
/// ```text
/// f(s, a, s') = g(s, a) + γ h(s') - h(s)
/// D(s, a, s') = exp(f) / (exp(f) + π(a|s)) = sigmoid(f - ln π(a|s))
/// ```
///
/// where `π(a|s)` is given as the `policy_prob` input.
pub struct AirlDiscriminator<G, H>
where
    G: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    H: SubModel1<Input = Tensor, Output = Tensor>,
    G::Config: DeserializeOwned + Serialize,
    H::Config: DeserializeOwned + Serialize,
{
    device: Device,
    varmap: VarMap,
    reward_model: G,
    shaping_model: H,
    discount: f64,
    n_discrete_actions: Option<usize>,

    #[allow(dead_code)]
    opt_config: OptimizerConfig,
    opt: Optimizer,
}

impl<G, H> AirlDiscriminator<G, H>
where
    G: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    H: SubModel1<Input = Tensor, Output = Tensor>,
    G::Config: DeserializeOwned + Serialize,
    H::Config: DeserializeOwned + Serialize,
{
    /// Constructs [`AirlDiscriminator`].
    pub fn build(config: AirlDiscriminatorConfig<G::Config, H::Config>, device: Device) -> Result<Self> {
        let reward_model_config = config
            .reward_model_config
            .context("reward_model_config is not set.")?;
        let shaping_model_config = config
            .shaping_model_config
            .context("shaping_model_config is not set.")?;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let reward_model = G::build(vb.pp("reward"), reward_model_config)?;
        let shaping_model = H::build(vb.pp("shaping"), shaping_model_config)?;
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            reward_model,
            shaping_model,
            discount: config.discount,
            n_discrete_actions: config.n_discrete_actions,
            opt_config: config.opt_config,
            opt,
        })
    }

    /// Returns `f(s, a, s') - ln π(a|s)`.
    fn logits(&self, input: &DiscriminatorInput) -> Result<Tensor> {
        match input {
            DiscriminatorInput::Airl {
                obs,
                act,
                next_obs,
                policy_prob,
            } => {
                let obs = obs.to_device(&self.device)?;
                let next_obs = next_obs.to_device(&self.device)?;
                let act = action_features(act, self.n_discrete_actions)?.to_device(&self.device)?;
                let g = self.reward_model.forward(&obs, &act)?.flatten_all()?;
                let h = self.shaping_model.forward(&obs)?.flatten_all()?;
                let h_next = self.shaping_model.forward(&next_obs)?.flatten_all()?;
                let f = ((g + (h_next * self.discount)?)? - h)?;
                let log_pi = policy_prob
                    .to_device(&self.device)?
                    .flatten_all()?
                    .maximum(MIN_PROB)?
                    .log()?;
                trace!("AIRL f: {:?}, ln pi: {:?}", f.dims(), log_pi.dims());
                Ok((f - log_pi)?)
            }
            _ => Err(input.unsupported(AdversarialAlgorithm::Airl).into()),
        }
    }

    /// Returns the parameters.
    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Saves the parameters.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save discriminator to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load discriminator from {:?}", path.as_ref());
        Ok(())
    }
}

impl<G, H> Discriminator for AirlDiscriminator<G, H>
where
    G: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    H: SubModel1<Input = Tensor, Output = Tensor>,
    G::Config: DeserializeOwned + Serialize,
    H::Config: DeserializeOwned + Serialize,
{
    fn forward(&self, input: &DiscriminatorInput) -> Result<Tensor> {
        Ok(sigmoid(&self.logits(input)?)?)
    }

    /// `f(s, a, s') - ln π(a|s)`, that is `ln D - ln(1 - D)`.
    fn predict_reward(&self, input: &DiscriminatorInput) -> Result<Tensor> {
        Ok(self.logits(input)?.detach())
    }

    fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        self.opt.backward_step(loss)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mlp::{Mlp, MlpConfig};
    use imitrl_core::error::ImitrlError;

    fn discriminator() -> Result<AirlDiscriminator<Mlp, Mlp>> {
        let config = AirlDiscriminatorConfig::default()
            .reward_model_config(MlpConfig::new(3 + 1, vec![8], 1, false))
            .shaping_model_config(MlpConfig::new(3, vec![8], 1, false))
            .discount(0.9);
        AirlDiscriminator::build(config, Device::Cpu)
    }

    #[test]
    fn test_policy_prob_conditioning() -> Result<()> {
        let disc = discriminator()?;
        let obs = Tensor::randn(0f32, 1.0, (5, 3), &Device::Cpu)?;
        let next_obs = Tensor::randn(0f32, 1.0, (5, 3), &Device::Cpu)?;
        let act = Tensor::randn(0f32, 1.0, (5, 1), &Device::Cpu)?;
        let pi_a = Tensor::full(0.2f32, 5, &Device::Cpu)?;
        let pi_b = Tensor::full(0.8f32, 5, &Device::Cpu)?;

        let input_a = DiscriminatorInput::Airl {
            obs: &obs,
            act: &act,
            next_obs: &next_obs,
            policy_prob: &pi_a,
        };
        let input_b = DiscriminatorInput::Airl {
            obs: &obs,
            act: &act,
            next_obs: &next_obs,
            policy_prob: &pi_b,
        };
        let d_a: Vec<f32> = disc.forward(&input_a)?.to_vec1()?;
        let d_b: Vec<f32> = disc.forward(&input_b)?.to_vec1()?;

        // The more likely the action under the policy, the less expert-like it looks
        for (a, b) in d_a.iter().zip(d_b.iter()) {
            assert!(a > b);
        }

        // Shifting ln π by ln 4 shifts the reward by the same amount
        let r_a: Vec<f32> = disc.predict_reward(&input_a)?.to_vec1()?;
        let r_b: Vec<f32> = disc.predict_reward(&input_b)?.to_vec1()?;
        for (a, b) in r_a.iter().zip(r_b.iter()) {
            assert!((a - b - 4f32.ln()).abs() < 1e-4);
        }

        Ok(())
    }

    #[test]
    fn test_rejects_gail_input() -> Result<()> {
        let disc = discriminator()?;
        let obs = Tensor::zeros((2, 3), DType::F32, &Device::Cpu)?;
        let act = Tensor::zeros((2, 1), DType::F32, &Device::Cpu)?;
        let input = DiscriminatorInput::Gail {
            obs: &obs,
            act: &act,
        };

        let err = disc.forward(&input).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ImitrlError>(),
            Some(&ImitrlError::UnsupportedInput {
                expected: "AIRL".to_string(),
                actual: "GAIL".to_string()
            })
        );

        Ok(())
    }
}
