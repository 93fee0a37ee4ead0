use std::fmt::Debug;

use rand::seq::SliceRandom;

/// Defines how to iterate over the indices of a dataset for one epoch.
pub trait Sampler: Debug {
    /// The index order for a dataset of `dataset_len` items.
    fn indices(&self, dataset_len: usize) -> Vec<usize>;
}

/// Yields indices sequentially, always in the same order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequentialSampler;

impl SequentialSampler {
    pub fn new() -> Self {
        SequentialSampler
    }
}

impl Sampler for SequentialSampler {
    fn indices(&self, dataset_len: usize) -> Vec<usize> {
        (0..dataset_len).collect()
    }
}

/// Yields every index once, in a fresh random permutation per epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSampler;

impl RandomSampler {
    pub fn new() -> Self {
        RandomSampler
    }
}

impl Sampler for RandomSampler {
    fn indices(&self, dataset_len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..dataset_len).collect();
        indices.shuffle(&mut rand::thread_rng());
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_sampler_counts_up() {
        let sampler = SequentialSampler::new();
        assert_eq!(sampler.indices(4), vec![0, 1, 2, 3]);
        assert!(sampler.indices(0).is_empty());
    }

    #[test]
    fn random_sampler_is_a_permutation() {
        let sampler = RandomSampler::new();
        let mut indices = sampler.indices(50);
        indices.sort_unstable();
        assert_eq!(indices, (0..50).collect::<Vec<_>>());
    }
}
