use super::{ActionType, ActorCriticModelConfig};
use crate::{
    dist::{ActionDistribution, Categorical, DiagGaussian},
    model::SubModel1,
    opt::{clip_grad_norm, grad_norm, Optimizer, OptimizerConfig},
    policy::{ActorCritic, StochasticPolicy},
    util::OutDim,
};
use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{init::Init, VarBuilder, VarMap};
use log::{info, trace};
use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;

/// Action distribution of [`ActorCriticModel`].
pub enum ActorCriticDist {
    /// For [`ActionType::Discrete`].
    Categorical(Categorical),

    /// For [`ActionType::Continuous`].
    DiagGaussian(DiagGaussian),
}

impl ActionDistribution for ActorCriticDist {
    fn log_prob(&self, act: &Tensor) -> Result<Tensor> {
        match self {
            Self::Categorical(d) => d.log_prob(act),
            Self::DiagGaussian(d) => d.log_prob(act),
        }
    }

    fn entropy(&self) -> Result<Tensor> {
        match self {
            Self::Categorical(d) => d.entropy(),
            Self::DiagGaussian(d) => d.entropy(),
        }
    }
}

/// Actor-critic agent owning its parameters and optimizer.
///
/// The network `P` outputs a policy head and a state value from a batch of
/// states. For continuous actions the model additionally owns a learnable
/// log standard deviation vector.
pub struct ActorCriticModel<P>
where
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    device: Device,
    varmap: VarMap,

    /// Policy and value network.
    policy_model: P,

    /// Log standard deviation of continuous actions.
    log_std: Option<Tensor>,

    action_type: ActionType,

    #[allow(dead_code)]
    opt_config: OptimizerConfig,
    opt: Optimizer,
}

impl<P> ActorCriticModel<P>
where
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Constructs [`ActorCriticModel`].
    pub fn build(config: ActorCriticModelConfig<P::Config>, device: Device) -> Result<Self> {
        let policy_model_config = config
            .policy_model_config
            .context("policy_model_config is not set.")?;
        let out_dim = policy_model_config.get_out_dim();
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);

        let policy_model = P::build(vb.pp("actor_critic"), policy_model_config)?;
        let log_std = match config.action_type {
            ActionType::Discrete => None,
            ActionType::Continuous => Some(vb.get_with_hints(
                out_dim as usize,
                "log_std",
                Init::Const(config.init_log_std),
            )?),
        };
        let opt = config.opt_config.build(varmap.all_vars())?;

        Ok(Self {
            device,
            varmap,
            policy_model,
            log_std,
            action_type: config.action_type,
            opt_config: config.opt_config,
            opt,
        })
    }

    /// Samples actions.
    ///
    /// If `train` is `true`, actions are drawn from the policy. Otherwise the
    /// most probable action (discrete) or the mean (continuous) is returned.
    pub fn sample(&self, obs: &Tensor, train: bool) -> Result<Tensor> {
        let (dist, _) = self.forward(obs)?;
        match dist {
            ActorCriticDist::Categorical(d) => {
                let scores = match train {
                    // Gumbel-max trick
                    true => {
                        let u = d.log_probs().rand_like(1e-10, 1.0)?;
                        (d.log_probs() + u.log()?.neg()?.log()?.neg()?)?
                    }
                    false => d.log_probs().clone(),
                };
                Ok(scores.argmax(D::Minus1)?.detach())
            }
            ActorCriticDist::DiagGaussian(d) => match train {
                true => d.sample(),
                false => Ok(d.mean().detach()),
            },
        }
    }

    /// Returns the action type.
    pub fn action_type(&self) -> &ActionType {
        &self.action_type
    }

    /// Returns the variables of the model.
    pub fn get_varmap(&self) -> &VarMap {
        &self.varmap
    }

    /// Saves the parameters.
    pub fn save<T: AsRef<Path>>(&self, path: T) -> Result<()> {
        self.varmap.save(&path)?;
        info!("Save actor-critic model to {:?}", path.as_ref());
        Ok(())
    }

    /// Loads the parameters.
    pub fn load<T: AsRef<Path>>(&mut self, path: T) -> Result<()> {
        self.varmap.load(&path)?;
        info!("Load actor-critic model from {:?}", path.as_ref());
        Ok(())
    }
}

impl<P> StochasticPolicy for ActorCriticModel<P>
where
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn logp(&self, obs: &Tensor, act: &Tensor) -> Result<Tensor> {
        let (dist, _) = self.forward(obs)?;
        dist.log_prob(act)
    }

    fn backward_step(&mut self, loss: &Tensor, max_grad_norm: Option<f64>) -> Result<f32> {
        let mut grads = loss.backward()?;
        let vars = self.varmap.all_vars();
        let norm = match max_grad_norm {
            Some(max_norm) => clip_grad_norm(&mut grads, &vars, max_norm)?,
            None => grad_norm(&grads, &vars)?,
        };
        self.opt.step(&grads)?;
        Ok(norm)
    }
}

impl<P> ActorCritic for ActorCriticModel<P>
where
    P: SubModel1<Input = Tensor, Output = (Tensor, Tensor)>,
    P::Config: DeserializeOwned + Serialize + OutDim + Clone,
{
    type Dist = ActorCriticDist;

    fn forward(&self, obs: &Tensor) -> Result<(Self::Dist, Tensor)> {
        let obs = obs.to_device(&self.device)?;
        let (head, value) = self.policy_model.forward(&obs)?;
        trace!("head.dims() = {:?}, value.dims() = {:?}", head.dims(), value.dims());

        let dist = match &self.log_std {
            None => ActorCriticDist::Categorical(Categorical::from_logits(&head)?),
            Some(log_std) => ActorCriticDist::DiagGaussian(DiagGaussian::new(head, log_std)?),
        };
        Ok((dist, value))
    }
}
