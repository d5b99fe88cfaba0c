use super::GaeConfig;
use crate::error::ImitrlError;

/// Carried state of the backward recursion.
///
/// Starting from [`GaeState::default`] (all zeros) at the temporal end of the
/// data, [`GaeState::step`] is applied to each timestep in reverse order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GaeState {
    /// Discounted reward-to-go of the last processed timestep.
    pub reward_to_go: f32,

    /// Advantage estimate of the last processed timestep.
    pub advantage: f32,

    /// Value estimate of the last processed timestep, the bootstrap for the
    /// timestep before it.
    pub next_value: f32,
}

impl GaeState {
    /// Folds one timestep into the state.
    ///
    /// `is_terminated != 0` cuts off everything after this timestep.
    pub fn step(
        self,
        reward: f32,
        is_terminated: i8,
        value: f32,
        discount: f32,
        trace_decay: f32,
    ) -> Self {
        let not_done = if is_terminated != 0 { 0.0 } else { 1.0 };
        let reward_to_go = reward + not_done * discount * self.reward_to_go;
        let td_error = reward + not_done * discount * self.next_value - value;
        let advantage = td_error + not_done * discount * trace_decay * self.advantage;

        Self {
            reward_to_go,
            advantage,
            next_value: value,
        }
    }
}

/// Rewards-to-go and advantages of a trajectory, indexed like the trajectory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advantages {
    /// Discounted rewards-to-go.
    pub rewards_to_go: Vec<f32>,

    /// Generalized advantage estimates.
    pub advantages: Vec<f32>,
}

impl Advantages {
    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.advantages.len()
    }

    /// Returns `true` for an empty trajectory.
    pub fn is_empty(&self) -> bool {
        self.advantages.is_empty()
    }

    /// Returns the advantages standardized to zero mean and unit variance.
    pub fn normalized(&self) -> Vec<f32> {
        let n = self.advantages.len();
        if n == 0 {
            return vec![];
        }
        let mean = self.advantages.iter().sum::<f32>() / n as f32;
        let var = self
            .advantages
            .iter()
            .map(|a| (a - mean).powi(2))
            .sum::<f32>()
            / n as f32;
        let std = var.sqrt() + 1e-8;
        self.advantages.iter().map(|a| (a - mean) / std).collect()
    }
}

fn check_len(field: &str, expected: usize, actual: usize) -> Result<(), ImitrlError> {
    if expected != actual {
        return Err(ImitrlError::LengthMismatch {
            field: field.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

/// Computes rewards-to-go and generalized advantage estimates.
///
/// The inputs are time-ordered per-timestep fields of one or more
/// concatenated trajectories; episode boundaries are marked by
/// `is_terminated`. The recursion is seeded with zeros after the last
/// timestep.
pub fn compute_advantages(
    rewards: &[f32],
    is_terminated: &[i8],
    values: &[f32],
    config: &GaeConfig,
) -> Result<Advantages, ImitrlError> {
    config.validate()?;
    check_len("is_terminated", rewards.len(), is_terminated.len())?;
    check_len("values", rewards.len(), values.len())?;

    let n = rewards.len();
    let mut rewards_to_go = vec![0f32; n];
    let mut advantages = vec![0f32; n];

    (0..n).rev().fold(GaeState::default(), |state, t| {
        let state = state.step(
            rewards[t],
            is_terminated[t],
            values[t],
            config.discount,
            config.trace_decay,
        );
        rewards_to_go[t] = state.reward_to_go;
        advantages[t] = state.advantage;
        state
    });

    Ok(Advantages {
        rewards_to_go,
        advantages,
    })
}
