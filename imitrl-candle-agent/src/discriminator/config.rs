//! Configuration of discriminators.
use crate::opt::OptimizerConfig;
use anyhow::Result;
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

fn load_yaml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path_ = path.as_ref().to_owned();
    let file = File::open(path)?;
    let rdr = BufReader::new(file);
    let b = serde_yaml::from_reader(rdr)?;
    info!("Load config of discriminator from {:?}", path_);
    Ok(b)
}

fn save_yaml<T: Serialize>(config: &T, path: impl AsRef<Path>) -> Result<()> {
    let path_ = path.as_ref().to_owned();
    let mut file = File::create(path)?;
    file.write_all(serde_yaml::to_string(config)?.as_bytes())?;
    info!("Save config of discriminator into {:?}", path_);
    Ok(())
}

/// Configuration of [`GailDiscriminator`](super::GailDiscriminator).
///
/// `C` is the configuration of the network scoring concatenated
/// `(state, action)` features with a single logit.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GailDiscriminatorConfig<C> {
    pub model_config: Option<C>,
    #[serde(default)]
    pub opt_config: OptimizerConfig,
    /// Number of discrete actions, used for one-hot encoding of action indices.
    /// `None` for continuous actions.
    #[serde(default)]
    pub n_discrete_actions: Option<usize>,
}

impl<C> Default for GailDiscriminatorConfig<C> {
    fn default() -> Self {
        Self {
            model_config: None,
            opt_config: OptimizerConfig::default(),
            n_discrete_actions: None,
        }
    }
}

impl<C: DeserializeOwned + Serialize> GailDiscriminatorConfig<C> {
    /// Sets configuration of the network.
    pub fn model_config(mut self, v: C) -> Self {
        self.model_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the number of discrete actions.
    pub fn n_discrete_actions(mut self, v: usize) -> Self {
        self.n_discrete_actions = Some(v);
        self
    }

    /// Loads [`GailDiscriminatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`GailDiscriminatorConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}

/// Configuration of [`AirlDiscriminator`](super::AirlDiscriminator).
///
/// `G` configures the reward network on `(state, action)`, `H` the shaping
/// network on states. Both output a single unit.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AirlDiscriminatorConfig<G, H> {
    pub reward_model_config: Option<G>,
    pub shaping_model_config: Option<H>,
    #[serde(default)]
    pub opt_config: OptimizerConfig,
    /// Discount factor of the shaping term.
    pub discount: f64,
    #[serde(default)]
    pub n_discrete_actions: Option<usize>,
}

impl<G, H> Default for AirlDiscriminatorConfig<G, H> {
    fn default() -> Self {
        Self {
            reward_model_config: None,
            shaping_model_config: None,
            opt_config: OptimizerConfig::default(),
            discount: 0.99,
            n_discrete_actions: None,
        }
    }
}

impl<G, H> AirlDiscriminatorConfig<G, H>
where
    G: DeserializeOwned + Serialize,
    H: DeserializeOwned + Serialize,
{
    /// Sets configuration of the reward network.
    pub fn reward_model_config(mut self, v: G) -> Self {
        self.reward_model_config = Some(v);
        self
    }

    /// Sets configuration of the shaping network.
    pub fn shaping_model_config(mut self, v: H) -> Self {
        self.shaping_model_config = Some(v);
        self
    }

    /// Sets optimizer configuration.
    pub fn opt_config(mut self, v: OptimizerConfig) -> Self {
        self.opt_config = v;
        self
    }

    /// Sets the discount factor.
    pub fn discount(mut self, v: f64) -> Self {
        self.discount = v;
        self
    }

    /// Sets the number of discrete actions.
    pub fn n_discrete_actions(mut self, v: usize) -> Self {
        self.n_discrete_actions = Some(v);
        self
    }

    /// Loads [`AirlDiscriminatorConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        load_yaml(path)
    }

    /// Saves [`AirlDiscriminatorConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_yaml(self, path)
    }
}
