//! Behavioral cloning (BC).
mod base;
mod config;

pub use base::Bc;
pub use config::BcConfig;
