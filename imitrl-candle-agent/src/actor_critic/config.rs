//! Configuration of the actor-critic model.
use crate::{opt::OptimizerConfig, util::OutDim};
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Action type of the actor-critic model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub enum ActionType {
    /// Discrete action, the policy head outputs logits of a categorical distribution.
    Discrete,

    /// Continuous action, the policy head outputs the mean of a diagonal Gaussian
    /// with a learned state-independent log standard deviation.
    Continuous,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
/// Configuration of [`ActorCriticModel`](super::ActorCriticModel).
///
/// The type parameter `C` is the configuration of the network, which outputs
/// the policy head and the state value.
pub struct ActorCriticModelConfig<C>
where
    C: OutDim + Clone,
{
    pub policy_model_config: Option<C>,
    #[serde(default)]
    pub opt_config: OptimizerConfig,
    pub action_type: ActionType,
    /// Initial value of the log standard deviation for continuous actions.
    pub init_log_std: f64,
}

impl<C> Default for ActorCriticModelConfig<C>
where
    C: DeserializeOwned + Serialize + OutDim + Clone,
{
    fn default() -> Self {
        Self {
            policy_model_config: None,
            opt_config: OptimizerConfig::default(),
            action_type: ActionType::Discrete,
            init_log_std: 0.0,
        }
    }
}

impl<C> ActorCriticModelConfig<C>
where
    C: DeserializeOwned + Serialize + OutDim + Clone,
{
    /// Sets configurations for the network.
    pub fn policy_model_config(mut self, v: C) -> Self {
        self.policy_model_config = Some(v);
        self
    }

    /// Sets output dimension of the policy head.
    pub fn out_dim(mut self, v: i64) -> Self {
        if let Some(policy_model_config) = &mut self.policy_model_config {
            policy_model_config.set_out_dim(v);
        }
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets action type.
    pub fn action_type(mut self, v: ActionType) -> Self {
        self.action_type = v;
        self
    }

    /// Sets the initial log standard deviation.
    pub fn init_log_std(mut self, v: f64) -> Self {
        self.init_log_std = v;
        self
    }

    /// Constructs [`ActorCriticModelConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of actor-critic model from {:?}", path_);
        Ok(b)
    }

    /// Saves [`ActorCriticModelConfig`] as YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of actor-critic model into {:?}", path_);
        Ok(())
    }
}
