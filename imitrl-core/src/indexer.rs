//! Indexed access to transitions of a trajectory buffer.
use crate::error::ImitrlError;
use anyhow::Result;

/// Exposes `(state, action, reward, next_state, terminal)` tuples by index.
///
/// An implementation wraps a buffer of `N` stored timesteps. Each item needs
/// the state of its successor, so the number of items is `N - 1`.
pub trait TransitionIndexer {
    /// A transition.
    type Item;

    /// Number of transitions, one less than the number of stored timesteps.
    fn len(&self) -> usize;

    /// Returns the `ix`-th transition.
    ///
    /// Fails with [`ImitrlError::IndexOutOfRange`] if `ix >= self.len()`.
    fn get(&self, ix: usize) -> Result<Self::Item>;

    /// Returns `true` if there is no transition.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns the number of transitions for `n_timesteps` stored timesteps.
pub fn n_transitions(n_timesteps: usize) -> usize {
    n_timesteps.saturating_sub(1)
}

/// Checks an index against the number of transitions.
pub fn check_index(ix: usize, len: usize) -> Result<(), ImitrlError> {
    if ix >= len {
        return Err(ImitrlError::IndexOutOfRange { index: ix, len });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    struct ScalarBuffer {
        states: Vec<f32>,
        rewards: Vec<f32>,
        is_terminated: Vec<i8>,
    }

    impl TransitionIndexer for ScalarBuffer {
        type Item = (f32, f32, f32, i8);

        fn len(&self) -> usize {
            n_transitions(self.states.len())
        }

        fn get(&self, ix: usize) -> Result<Self::Item> {
            check_index(ix, self.len())?;
            Ok((
                self.states[ix],
                self.rewards[ix],
                self.states[ix + 1],
                self.is_terminated[ix],
            ))
        }
    }

    #[test]
    fn test_len_and_successor() {
        let buffer = ScalarBuffer {
            states: vec![0.0, 1.0, 2.0],
            rewards: vec![0.5, 0.25, 0.0],
            is_terminated: vec![0, 1, 0],
        };

        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.get(1).unwrap(), (1.0, 0.25, 2.0, 1));
        let err = buffer.get(2).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ImitrlError>(),
            Some(&ImitrlError::IndexOutOfRange { index: 2, len: 2 })
        );
    }

    #[test]
    fn test_empty_buffer() {
        assert_eq!(n_transitions(0), 0);
        assert_eq!(n_transitions(1), 0);
    }
}
