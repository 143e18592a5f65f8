//! Batch resolution of independent scenarios.
//!
//! Each scenario is an exact computation with no shared state, so a batch maps one scenario
//! per Rayon task. [resolve_batch_chunked] splits a batch with [batch_ranges] and reports
//! progress after every chunk.

use rayon::prelude::*;

use crate::combat::BattleOdds;
use crate::data::scenario::Scenario;
use crate::error::Result;
use crate::parallel::pool::WorkerPool;

/// Contiguous `[start, end)` chunks covering `0..len`, at most `chunks` of them. Earlier
/// chunks absorb the remainder, so sizes differ by at most one.
///
/// # Example
/// ```
/// # use attrition::parallel::batch_ranges;
/// assert_eq!(batch_ranges(7, 3), vec![(0, 3), (3, 5), (5, 7)]);
/// ```
pub fn batch_ranges(len: usize, chunks: usize) -> Vec<(usize, usize)> {
    let chunks = chunks.min(len);
    if chunks == 0 {
        return Vec::new();
    }
    let (size, extra) = (len / chunks, len % chunks);
    (0..chunks)
        .scan(0, |start, chunk| {
            let end = *start + size + usize::from(chunk < extra);
            let range = (*start, end);
            *start = end;
            Some(range)
        })
        .collect()
}

/// Resolve every scenario on the global Rayon pool. Results keep the input order; a failing
/// scenario does not stop the others.
pub fn resolve_batch(scenarios: &[Scenario]) -> Vec<Result<BattleOdds>> {
    tracing::debug!(scenarios = scenarios.len(), "resolving batch");
    scenarios.par_iter().map(Scenario::resolve).collect()
}

/// Sequential counterpart of [resolve_batch].
pub fn resolve_batch_sequential(scenarios: &[Scenario]) -> Vec<Result<BattleOdds>> {
    scenarios.iter().map(Scenario::resolve).collect()
}

/// Resolve a batch inside `pool`, so the worker count can be pinned.
pub fn resolve_batch_in(pool: &WorkerPool, scenarios: &[Scenario]) -> Vec<Result<BattleOdds>> {
    pool.install(|| resolve_batch(scenarios))
}

/// Resolve a batch inside `pool` one chunk at a time. Each chunk runs in parallel;
/// `on_chunk` sees every finished chunk with its position in `scenarios`, and progress is
/// logged after each one. Results keep the input order.
pub fn resolve_batch_chunked<F>(
    pool: &WorkerPool,
    scenarios: &[Scenario],
    chunks: usize,
    mut on_chunk: F,
) -> Vec<Result<BattleOdds>>
where
    F: FnMut(usize, &[Result<BattleOdds>]),
{
    let mut results = Vec::with_capacity(scenarios.len());
    for (start, end) in batch_ranges(scenarios.len(), chunks) {
        let chunk = resolve_batch_in(pool, &scenarios[start..end]);
        on_chunk(start, &chunk);
        results.extend(chunk);
        tracing::info!(done = end, total = scenarios.len(), "batch progress");
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::force::Force;
    use crate::data::unit::UnitType;

    fn sizes(ranges: &[(usize, usize)]) -> Vec<usize> {
        ranges.iter().map(|(start, end)| end - start).collect()
    }

    #[test]
    fn ranges_tile_the_batch_without_gaps() {
        let ranges = batch_ranges(10, 4);
        assert_eq!(ranges.first().map(|r| r.0), Some(0));
        assert_eq!(ranges.last().map(|r| r.1), Some(10));
        assert!(ranges.windows(2).all(|pair| pair[0].1 == pair[1].0));
        assert_eq!(sizes(&ranges), vec![3, 3, 2, 2]);
    }

    #[test]
    fn never_more_chunks_than_scenarios() {
        assert_eq!(sizes(&batch_ranges(2, 8)), vec![1, 1]);
        assert!(batch_ranges(0, 3).is_empty());
        assert!(batch_ranges(5, 0).is_empty());
    }

    #[test]
    fn empty_batch_resolves_to_nothing() {
        assert!(resolve_batch(&[]).is_empty());
    }

    #[test]
    fn chunked_batch_reports_every_chunk_in_order() {
        let scenarios: Vec<Scenario> = (1..=5)
            .map(|k| {
                Scenario::new(
                    Force::empty().with(UnitType::Infantry, k),
                    Force::empty().with(UnitType::Infantry, 1),
                )
            })
            .collect();

        let mut seen = Vec::new();
        let pool = WorkerPool::with_workers(2);
        let chunked = resolve_batch_chunked(&pool, &scenarios, 2, |start, chunk| {
            seen.push((start, chunk.len()));
        });
        assert_eq!(seen, vec![(0, 3), (3, 2)]);

        let whole = resolve_batch_sequential(&scenarios);
        assert_eq!(chunked.len(), whole.len());
        for (a, b) in chunked.iter().zip(&whole) {
            assert_eq!(a.as_ref().unwrap(), b.as_ref().unwrap());
        }
    }
}
