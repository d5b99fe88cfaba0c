//! Shuffled mini-batch sampling.
use crate::error::ImitrlError;
use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};

/// Cuts shuffled index permutations into equally sized mini-batches.
///
/// Incomplete final mini-batches are dropped.
pub struct MiniBatchSampler {
    rng: SmallRng,
}

impl MiniBatchSampler {
    /// Creates a sampler with a seeded random number generator.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Returns `len / batch_size` mini-batches of a random permutation of `0..len`.
    pub fn shuffled_batches(
        &mut self,
        len: usize,
        batch_size: usize,
    ) -> Result<Vec<Vec<usize>>, ImitrlError> {
        if batch_size == 0 {
            return Err(ImitrlError::InvalidBatchSize(batch_size));
        }
        let mut ixs: Vec<usize> = (0..len).collect();
        ixs.shuffle(&mut self.rng);

        Ok(ixs
            .chunks_exact(batch_size)
            .map(|chunk| chunk.to_vec())
            .collect())
    }

    /// Pairs mini-batches of two independently shuffled streams.
    ///
    /// The number of pairs is limited by the shorter stream.
    pub fn paired_batches(
        &mut self,
        len1: usize,
        len2: usize,
        batch_size: usize,
    ) -> Result<Vec<(Vec<usize>, Vec<usize>)>, ImitrlError> {
        let batches1 = self.shuffled_batches(len1, batch_size)?;
        let batches2 = self.shuffled_batches(len2, batch_size)?;
        Ok(batches1.into_iter().zip(batches2).collect())
    }
}
