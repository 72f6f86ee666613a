//! Frontier selection: the unfinalized vertex with the smallest distance
//!
//! Both variants compare with `<=`, so among equal distances the highest
//! index wins. Unreached vertices (`f32::INFINITY`) still qualify, which lets
//! the greedy loop keep its fixed `N - 1` iteration count on graphs that are
//! not fully reachable.

use rayon::prelude::*;
use std::sync::{Mutex, PoisonError};

/// Linear scan for the closest unfinalized vertex
///
/// Returns `fallback` when every vertex is finalized.
///
/// # Example
///
/// ```
/// use degree_sssp::algorithms::min_unfinalized;
///
/// let distances = [0.0, 0.4, 0.1, 0.1];
/// let finalized = [true, false, false, false];
/// assert_eq!(min_unfinalized(&distances, &finalized, 0), 3);
/// ```
#[must_use]
pub fn min_unfinalized(distances: &[f32], finalized: &[bool], fallback: usize) -> usize {
    scan(distances, finalized).map_or(fallback, |(_, v)| v)
}

fn scan(distances: &[f32], finalized: &[bool]) -> Option<(f32, usize)> {
    let mut best: Option<(f32, usize)> = None;
    for (v, (&d, &done)) in distances.iter().zip(finalized).enumerate() {
        if done {
            continue;
        }
        if best.map_or(true, |(min, _)| d <= min) {
            best = Some((d, v));
        }
    }
    best
}

/// Parallel reduction for the closest unfinalized vertex
///
/// The vertex range is split into chunks of at least `min_chunk_len`; every
/// worker scans its chunk and folds the local winner into one shared best
/// under a mutex. The merge keeps the `<=` rule (higher index wins a tie), so
/// the result matches [`min_unfinalized`] even though chunks finish in any
/// order.
///
/// Runs on the current rayon pool; call it inside `ThreadPool::install` to
/// pick the worker team.
#[must_use]
pub fn min_unfinalized_parallel(
    distances: &[f32],
    finalized: &[bool],
    fallback: usize,
    min_chunk_len: usize,
) -> usize {
    let n = distances.len().min(finalized.len());
    if n == 0 {
        return fallback;
    }
    let chunk_len = n
        .div_ceil(rayon::current_num_threads())
        .max(min_chunk_len)
        .max(1);

    let best: Mutex<Option<(f32, usize)>> = Mutex::new(None);

    distances[..n]
        .par_chunks(chunk_len)
        .zip(finalized[..n].par_chunks(chunk_len))
        .enumerate()
        .for_each(|(chunk, (d, f))| {
            let Some((local_min, local_idx)) = scan(d, f) else {
                return;
            };
            let candidate = (local_min, chunk * chunk_len + local_idx);

            let mut shared = best.lock().unwrap_or_else(PoisonError::into_inner);
            let replace = match *shared {
                None => true,
                Some((min, idx)) => {
                    candidate.0 < min || (candidate.0 <= min && candidate.1 > idx)
                }
            };
            if replace {
                *shared = Some(candidate);
            }
        });

    best.into_inner()
        .unwrap_or_else(PoisonError::into_inner)
        .map_or(fallback, |(_, v)| v)
}
