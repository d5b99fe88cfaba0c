//! Transitions stored as tensors.
use anyhow::Result;
use candle_core::{Device, Tensor};
use imitrl_core::{check_index, error::ImitrlError, n_transitions, TransitionIndexer};
use log::trace;

/// A transition `(s_i, a_i, r_i, s_{i+1}, terminal_i)`.
#[derive(Clone, Debug)]
pub struct Transition {
    /// State `s_i`.
    pub obs: Tensor,
    /// Action `a_i`.
    pub act: Tensor,
    /// Reward `r_i`.
    pub reward: f32,
    /// Successor state `s_{i+1}`.
    pub next_obs: Tensor,
    /// `1` if the episode terminates at timestep `i`.
    pub is_terminated: i8,
}

/// A batch of transitions gathered from a [`TransitionDataset`].
///
/// The first dimension of every field is the batch dimension.
#[derive(Clone, Debug)]
pub struct TransitionBatch {
    /// States.
    pub obs: Tensor,
    /// Actions.
    pub act: Tensor,
    /// Rewards.
    pub reward: Vec<f32>,
    /// Successor states.
    pub next_obs: Tensor,
    /// Termination flags.
    pub is_terminated: Vec<i8>,
}

impl TransitionBatch {
    /// Number of transitions in the batch.
    pub fn len(&self) -> usize {
        self.reward.len()
    }

    /// Returns `true` for an empty batch.
    pub fn is_empty(&self) -> bool {
        self.reward.is_empty()
    }
}

/// A fixed-length buffer of `N` timesteps exposing `N - 1` transitions.
///
/// `obs` and `act` hold the timesteps along their first dimension.
/// Discrete actions are stored as integer indices of shape `(N,)`.
#[derive(Clone, Debug)]
pub struct TransitionDataset {
    obs: Tensor,
    act: Tensor,
    reward: Vec<f32>,
    is_terminated: Vec<i8>,
}

fn check_leading_dim(field: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(ImitrlError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        }
        .into());
    }
    Ok(())
}

impl TransitionDataset {
    /// Creates a dataset from per-timestep fields.
    ///
    /// Fails with [`ImitrlError::LengthMismatch`] if the fields do not have the
    /// same number of timesteps.
    pub fn new(obs: Tensor, act: Tensor, reward: Vec<f32>, is_terminated: Vec<i8>) -> Result<Self> {
        let n = obs.dim(0)?;
        check_leading_dim("act", n, act.dim(0)?)?;
        check_leading_dim("reward", n, reward.len())?;
        check_leading_dim("is_terminated", n, is_terminated.len())?;

        Ok(Self {
            obs: obs.contiguous()?,
            act: act.contiguous()?,
            reward,
            is_terminated,
        })
    }

    /// Number of stored timesteps.
    pub fn n_timesteps(&self) -> usize {
        self.reward.len()
    }

    /// Device on which the tensors reside.
    pub fn device(&self) -> &Device {
        self.obs.device()
    }

    /// Gathers the transitions at the given indices.
    pub fn sample(&self, ixs: &[usize]) -> Result<TransitionBatch> {
        let len = self.len();
        for ix in ixs.iter() {
            check_index(*ix, len)?;
        }

        let device = self.device();
        let ixs_: Vec<u32> = ixs.iter().map(|ix| *ix as u32).collect();
        let next_ixs: Vec<u32> = ixs.iter().map(|ix| *ix as u32 + 1).collect();
        let ixs_ = Tensor::from_vec(ixs_, (ixs.len(),), device)?;
        let next_ixs = Tensor::from_vec(next_ixs, (ixs.len(),), device)?;

        let batch = TransitionBatch {
            obs: self.obs.index_select(&ixs_, 0)?,
            act: self.act.index_select(&ixs_, 0)?,
            reward: ixs.iter().map(|ix| self.reward[*ix]).collect(),
            next_obs: self.obs.index_select(&next_ixs, 0)?,
            is_terminated: ixs.iter().map(|ix| self.is_terminated[*ix]).collect(),
        };
        trace!("Sampled transitions: obs {:?}", batch.obs.dims());

        Ok(batch)
    }
}

impl TransitionIndexer for TransitionDataset {
    type Item = Transition;

    fn len(&self) -> usize {
        n_transitions(self.n_timesteps())
    }

    fn get(&self, ix: usize) -> Result<Transition> {
        check_index(ix, self.len())?;
        Ok(Transition {
            obs: self.obs.get(ix)?,
            act: self.act.get(ix)?,
            reward: self.reward[ix],
            next_obs: self.obs.get(ix + 1)?,
            is_terminated: self.is_terminated[ix],
        })
    }
}
