//! Partitioned parallel map.
//!
//! Rows are cut into contiguous partitions. Each partition builds its own resource
//! once (a tokenizer-backed splitter, a parser handle) and then transforms its rows
//! with it. Partitions run concurrently on the rayon pool and share nothing mutable.

use rayon::prelude::*;
use tracing::debug;

use crate::error::Result;

/// Split `rows` into at most `n` contiguous, non-empty partitions of near-equal size.
///
/// Earlier partitions take the remainder, so sizes differ by at most one.
#[must_use]
pub fn partition_rows<T>(rows: Vec<T>, n: usize) -> Vec<Vec<T>> {
    if rows.is_empty() {
        return Vec::new();
    }
    let n = n.clamp(1, rows.len());
    let base = rows.len() / n;
    let extra = rows.len() % n;

    let mut iter = rows.into_iter();
    (0..n)
        .map(|i| {
            let size = base + usize::from(i < extra);
            iter.by_ref().take(size).collect()
        })
        .collect()
}

/// Apply `f` to every row, building the per-partition resource with `init` first.
///
/// `init` receives the partition index. Output rows keep input order. The first
/// error from `init` or `f` aborts the map.
pub fn map_partitions<T, R, U, I, F>(rows: Vec<T>, n: usize, init: I, f: F) -> Result<Vec<U>>
where
    T: Send,
    U: Send,
    I: Fn(usize) -> Result<R> + Sync,
    F: Fn(&R, T) -> Result<Vec<U>> + Sync,
{
    let partitions = partition_rows(rows, n);
    let per_partition: Vec<Vec<U>> = partitions
        .into_par_iter()
        .enumerate()
        .map(|(idx, part)| {
            let rows_in = part.len();
            let resource = init(idx)?;
            let mut out = Vec::with_capacity(rows_in);
            for row in part {
                out.extend(f(&resource, row)?);
            }
            debug!(partition = idx, rows_in, rows_out = out.len(), "partition done");
            Ok(out)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(per_partition.into_iter().flatten().collect())
}
