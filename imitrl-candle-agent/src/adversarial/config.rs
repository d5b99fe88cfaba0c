//! Configuration of adversarial imitation learning.
use anyhow::Result;
use imitrl_core::AdversarialAlgorithm;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`AdversarialImitation`](super::AdversarialImitation).
///
/// `algorithm` is written as `GAIL` or `AIRL` in YAML, other names are
/// rejected on loading.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct AdversarialConfig {
    pub algorithm: AdversarialAlgorithm,
    pub batch_size: usize,

    /// Seed of shuffling mini-batches.
    pub seed: u64,
}

impl Default for AdversarialConfig {
    fn default() -> Self {
        Self {
            algorithm: AdversarialAlgorithm::Gail,
            batch_size: 64,
            seed: 42,
        }
    }
}

impl AdversarialConfig {
    /// Sets the algorithm.
    pub fn algorithm(mut self, v: AdversarialAlgorithm) -> Self {
        self.algorithm = v;
        self
    }

    /// Sets batch size.
    pub fn batch_size(mut self, v: usize) -> Self {
        self.batch_size = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Loads [`AdversarialConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of adversarial imitation from {:?}", path_);
        Ok(b)
    }

    /// Saves [`AdversarialConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of adversarial imitation into {:?}", path_);
        Ok(())
    }
}
