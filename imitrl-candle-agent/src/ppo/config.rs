//! Configuration of PPO.
use anyhow::Result;
use imitrl_core::error::ImitrlError;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Ppo`](super::Ppo).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PpoConfig {
    /// Clip threshold ε of the importance ratio.
    pub clip: f64,

    /// Weight of the value loss.
    pub value_loss_coef: f64,

    /// Weight of the entropy loss.
    pub entropy_loss_coef: f64,

    /// Threshold of the global gradient norm, no clipping if `None`.
    pub max_grad_norm: Option<f64>,

    /// Number of update epochs per rollout in [`Ppo::opt`](super::Ppo::opt).
    pub n_epochs: usize,
}

impl Default for PpoConfig {
    fn default() -> Self {
        Self {
            clip: 0.2,
            value_loss_coef: 1.0,
            entropy_loss_coef: 1.0,
            max_grad_norm: Some(1.0),
            n_epochs: 10,
        }
    }
}

impl PpoConfig {
    /// Sets the clip threshold.
    pub fn clip(mut self, v: f64) -> Self {
        self.clip = v;
        self
    }

    /// Sets the weight of the value loss.
    pub fn value_loss_coef(mut self, v: f64) -> Self {
        self.value_loss_coef = v;
        self
    }

    /// Sets the weight of the entropy loss.
    pub fn entropy_loss_coef(mut self, v: f64) -> Self {
        self.entropy_loss_coef = v;
        self
    }

    /// Sets the threshold of the global gradient norm.
    pub fn max_grad_norm(mut self, v: Option<f64>) -> Self {
        self.max_grad_norm = v;
        self
    }

    /// Sets the number of epochs.
    pub fn n_epochs(mut self, v: usize) -> Self {
        self.n_epochs = v;
        self
    }

    /// Checks the hyperparameters.
    pub fn validate(&self) -> Result<(), ImitrlError> {
        if !(self.clip >= 0.0) {
            return Err(ImitrlError::InvalidHyperparameter(format!(
                "clip = {}",
                self.clip
            )));
        }
        if let Some(v) = self.max_grad_norm {
            if !(v > 0.0) {
                return Err(ImitrlError::InvalidHyperparameter(format!(
                    "max_grad_norm = {}",
                    v
                )));
            }
        }
        Ok(())
    }

    /// Loads [`PpoConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of PPO from {:?}", path_);
        Ok(b)
    }

    /// Saves [`PpoConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of PPO into {:?}", path_);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_save_load() -> Result<()> {
        let dir = TempDir::new("ppo_config")?;
        let path = dir.path().join("ppo.yaml");
        let config = PpoConfig::default().clip(0.1).n_epochs(4).max_grad_norm(None);
        config.save(&path)?;

        assert_eq!(PpoConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(PpoConfig::default().validate().is_ok());
        assert!(PpoConfig::default().clip(-0.1).validate().is_err());
        assert!(PpoConfig::default().max_grad_norm(Some(0.0)).validate().is_err());
    }
}
