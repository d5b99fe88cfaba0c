//! Configuration of generalized advantage estimation.
use crate::error::ImitrlError;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Hyperparameters of generalized advantage estimation.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GaeConfig {
    /// Discount factor γ.
    pub discount: f32,

    /// Trace-decay λ.
    pub trace_decay: f32,

    /// If `true`, consumers standardize the advantages of a batch before use.
    #[serde(default)]
    pub normalize_advantages: bool,
}

impl Default for GaeConfig {
    fn default() -> Self {
        Self {
            discount: 0.99,
            trace_decay: 0.95,
            normalize_advantages: false,
        }
    }
}

impl GaeConfig {
    /// Sets the discount factor.
    pub fn discount(mut self, v: f32) -> Self {
        self.discount = v;
        self
    }

    /// Sets the trace-decay parameter.
    pub fn trace_decay(mut self, v: f32) -> Self {
        self.trace_decay = v;
        self
    }

    /// Enables standardization of advantages.
    pub fn normalize_advantages(mut self, v: bool) -> Self {
        self.normalize_advantages = v;
        self
    }

    /// Checks that both hyperparameters lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), ImitrlError> {
        if !(0.0..=1.0).contains(&self.discount) {
            return Err(ImitrlError::InvalidHyperparameter(format!(
                "discount = {}",
                self.discount
            )));
        }
        if !(0.0..=1.0).contains(&self.trace_decay) {
            return Err(ImitrlError::InvalidHyperparameter(format!(
                "trace_decay = {}",
                self.trace_decay
            )));
        }
        Ok(())
    }

    /// Loads [`GaeConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of GAE from {:?}", path_);
        Ok(b)
    }

    /// Saves [`GaeConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of GAE into {:?}", path_);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_save_load() -> Result<()> {
        let dir = TempDir::new("gae_config")?;
        let path = dir.path().join("gae.yaml");
        let config = GaeConfig::default().discount(0.9).trace_decay(1.0);
        config.save(&path)?;

        assert_eq!(GaeConfig::load(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_validate() {
        assert!(GaeConfig::default().validate().is_ok());
        assert!(GaeConfig::default().discount(1.5).validate().is_err());
        assert!(GaeConfig::default().trace_decay(-0.1).validate().is_err());
    }
}
