/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Deterministic extraction of the best and worst ranked nodes.
//!
//! Both selectors order by score and break ties by original id, but in
//! opposite directions: ascending ids for [`top_k`], descending ids for
//! [`bottom_k`]. The asymmetry is intentional, so that on a plateau of equal
//! scores the two selections do not mirror each other. The resulting order is
//! total (ids are unique), hence the output is reproducible no matter how the
//! score vector was produced, and independent of any annotation attached
//! later.

use crate::ids::IdMap;
use std::cmp::Ordering;

/// Returns the dense indices of the `min(k, N)` highest-scored nodes.
///
/// Ordered by score descending, ties broken by original id ascending.
///
/// # Examples
/// ```
/// use wikirank::ids::IdMap;
/// use wikirank::rank::select::{bottom_k, top_k};
///
/// let ids = IdMap::from_ids([10, 20, 30]);
/// let scores = [0.2, 0.5, 0.3];
/// assert_eq!(top_k(&scores, &ids, 2), vec![1, 2]);
/// assert_eq!(bottom_k(&scores, &ids, 2), vec![0, 2]);
/// ```
pub fn top_k(scores: &[f64], ids: &IdMap, k: usize) -> Vec<usize> {
    select(scores.len(), k, |&a, &b| {
        scores[b]
            .total_cmp(&scores[a])
            .then_with(|| ids.original(a).cmp(&ids.original(b)))
    })
}

/// Returns the dense indices of the `min(k, N)` lowest-scored nodes.
///
/// Ordered by score ascending, ties broken by original id descending.
pub fn bottom_k(scores: &[f64], ids: &IdMap, k: usize) -> Vec<usize> {
    select(scores.len(), k, |&a, &b| {
        scores[a]
            .total_cmp(&scores[b])
            .then_with(|| ids.original(b).cmp(&ids.original(a)))
    })
}

fn select<F: FnMut(&usize, &usize) -> Ordering>(n: usize, k: usize, cmp: F) -> Vec<usize> {
    let mut indices = (0..n).collect::<Vec<_>>();
    select_prefix(&mut indices, k, cmp);
    indices
}

/// Partially sorts `indices` so that its first `min(k, len)` entries are the
/// smallest under `cmp`, in order, and truncates the rest.
pub(crate) fn select_prefix<F: FnMut(&usize, &usize) -> Ordering>(
    indices: &mut Vec<usize>,
    k: usize,
    mut cmp: F,
) {
    let k = k.min(indices.len());
    if k == 0 {
        indices.clear();
        return;
    }
    if k < indices.len() {
        indices.select_nth_unstable_by(k - 1, &mut cmp);
        indices.truncate(k);
    }
    indices.sort_unstable_by(&mut cmp);
}
