//! Seeded train/validation splitting of parallel input/target collections.

use crate::error::AppError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Default fraction of samples held out for validation.
pub const DEFAULT_TEST_SIZE: f64 = 0.2;

/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// Two disjoint partitions of a parallel (input, target) collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSplit<I, T> {
    pub inputs_train: Vec<I>,
    pub inputs_val: Vec<I>,
    pub targets_train: Vec<T>,
    pub targets_val: Vec<T>,
}

/// Number of validation samples for `n` samples at the given ratio.
///
/// Halves round away from zero (`f64::round`), so `ratio = 0.5, n = 1` yields 1.
pub fn validation_len(n: usize, ratio: f64) -> usize {
    ((ratio * n as f64).round() as usize).min(n)
}

/// Shuffle indices once with `seed`, take the first `round(ratio * n)` as
/// validation and the rest as training. The same permutation is applied to
/// inputs and targets, so pairs stay aligned.
pub fn split<I: Clone, T: Clone>(
    inputs: &[I],
    targets: &[T],
    ratio: f64,
    seed: u64,
) -> Result<DatasetSplit<I, T>, AppError> {
    if inputs.len() != targets.len() {
        return Err(AppError::MismatchedLengths {
            inputs: inputs.len(),
            targets: targets.len(),
        });
    }
    if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
        return Err(AppError::Validation(format!(
            "split ratio must be within [0, 1], got {}",
            ratio
        )));
    }

    let mut indices: Vec<usize> = (0..inputs.len()).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let n_val = validation_len(inputs.len(), ratio);
    let (val_idx, train_idx) = indices.split_at(n_val);

    let pick_inputs = |idx: &[usize]| idx.iter().map(|&i| inputs[i].clone()).collect::<Vec<_>>();
    let pick_targets = |idx: &[usize]| idx.iter().map(|&i| targets[i].clone()).collect::<Vec<_>>();

    Ok(DatasetSplit {
        inputs_train: pick_inputs(train_idx),
        inputs_val: pick_inputs(val_idx),
        targets_train: pick_targets(train_idx),
        targets_val: pick_targets(val_idx),
    })
}

/// [`split`] with the default ratio and seed.
pub fn split_data<I: Clone, T: Clone>(
    inputs: &[I],
    targets: &[T],
) -> Result<DatasetSplit<I, T>, AppError> {
    split(inputs, targets, DEFAULT_TEST_SIZE, DEFAULT_SEED)
}
