//! Configuration of behavior cloning (BC).
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    default::Default,
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Bc`](super::Bc).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct BcConfig {
    pub batch_size: usize,

    /// Seed of shuffling mini-batches.
    pub seed: u64,
}

impl Default for BcConfig {
    fn default() -> Self {
        Self {
            batch_size: 64,
            seed: 42,
        }
    }
}

impl BcConfig {
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

    /// Loads [`BcConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of BC from {:?}", path_);
        Ok(b)
    }

    /// Saves [`BcConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of BC into {:?}", path_);
        Ok(())
    }
}
