//! GAIL discriminator.
use super::{Discriminator, DiscriminatorInput, GailDiscriminatorConfig};
use crate::{
    model::SubModel2,
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

/// Discriminator `D(s, a) = sigmoid(d([s, a]))`.
///
/// The network `d` takes states and action features and outputs one logit.
pub struct GailDiscriminator<D>
where
    D: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    D::Config: DeserializeOwned + Serialize,
{
    device: Device,
    varmap: VarMap,
    model: D,
    n_discrete_actions: Option<usize>,

    #[allow(dead_code)]
    opt_config: OptimizerConfig,
    opt: Optimizer,
}

impl<D> GailDiscriminator<D>
where
    D: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    D::Config: DeserializeOwned + Serialize,
{
    /// Constructs [`GailDiscriminator`].
    pub fn build(config: GailDiscriminatorConfig<D::Config>, device: Device) -> Result<Self> {
        let model_config = config.model_config.context("model_config is not set.")?;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let model = D::build(vb.pp("discriminator"), model_config)?;
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            model,
            n_discrete_actions: config.n_discrete_actions,
            opt_config: config.opt_config,
            opt,
        })
    }

    fn logits(&self, obs: &Tensor, act: &Tensor) -> Result<Tensor> {
        let obs = obs.to_device(&self.device)?;
        let act = action_features(act, self.n_discrete_actions)?.to_device(&self.device)?;
        let logits = self.model.forward(&obs, &act)?.flatten_all()?;
        trace!("GAIL discriminator logits: {:?}", logits.dims());
        Ok(logits)
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

impl<D> Discriminator for GailDiscriminator<D>
where
    D: SubModel2<Input1 = Tensor, Input2 = Tensor, Output = Tensor>,
    D::Config: DeserializeOwned + Serialize,
{
    fn forward(&self, input: &DiscriminatorInput) -> Result<Tensor> {
        match input {
            DiscriminatorInput::Gail { obs, act } => Ok(sigmoid(&self.logits(obs, act)?)?),
            _ => Err(input.unsupported(AdversarialAlgorithm::Gail).into()),
        }
    }

    /// `-ln(1 - D(s, a))`.
    fn predict_reward(&self, input: &DiscriminatorInput) -> Result<Tensor> {
        let prob = self.forward(input)?.detach();
        Ok(prob.affine(-1.0, 1.0)?.log()?.maximum(-100f64)?.neg()?)
    }

    fn backward_step(&mut self, loss: &Tensor) -> Result<()> {
        self.opt.backward_step(loss)
    }
}
