/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Comparison of rank snapshots and degree/rank anomaly detection.
//!
//! The analysis compares the vector after iteration 1 with the final vector
//! to find the nodes whose rank moved the most in relative terms, and crosses
//! final ranks with in-degrees to surface structural anomalies: nodes with
//! many incoming links but little rank (underperformers) and nodes whose rank
//! is out of proportion to their incoming links (overperformers).
//!
//! Every quotient is floored by [`EPSILON`] to avoid division by zero, and
//! every list is made a total order by an ascending-original-id tie-break.

use crate::ids::IdMap;
use crate::rank::select::select_prefix;
use std::cmp::Ordering;

/// Floor applied to every denominator.
pub const EPSILON: f64 = 1E-15;

/// Length of the increase/decrease and under/overperformer lists.
pub const CHANGE_LIST_LEN: usize = 25;

/// Length of the most-linked list.
pub const MOST_LINKED_LEN: usize = 100;

/// How one node's rank moved between the two snapshots.
#[derive(Debug, Clone, Copy)]
pub struct ScoreChange {
    /// Dense index of the node.
    pub node: usize,
    /// `final / max(first, EPSILON)`.
    pub ratio: f64,
    /// `final - first`.
    pub change: f64,
    pub first_score: f64,
    pub final_score: f64,
}

/// A node scored by the `indegree / max(score, EPSILON)` quotient.
#[derive(Debug, Clone, Copy)]
pub struct DegreeRatio {
    /// Dense index of the node.
    pub node: usize,
    pub indegree_ratio: f64,
    pub indegree: u32,
    pub final_score: f64,
}

/// A node listed by raw in-degree.
#[derive(Debug, Clone, Copy)]
pub struct MostLinked {
    /// Dense index of the node.
    pub node: usize,
    pub indegree: u32,
    pub score: f64,
}

/// The full change analysis between two snapshots of the rank vector.
#[derive(Debug, Clone)]
pub struct ChangeAnalysis {
    /// Top [`CHANGE_LIST_LEN`] nodes by ratio descending.
    pub increases: Vec<ScoreChange>,
    /// Top [`CHANGE_LIST_LEN`] nodes by ratio ascending.
    pub decreases: Vec<ScoreChange>,
    /// Top [`CHANGE_LIST_LEN`] nodes by in-degree ratio descending.
    pub underperformers: Vec<DegreeRatio>,
    /// Bottom [`CHANGE_LIST_LEN`] nodes by in-degree ratio ascending,
    /// restricted to nodes with at least one incoming link.
    pub overperformers: Vec<DegreeRatio>,
    /// Top [`MOST_LINKED_LEN`] nodes by raw in-degree.
    pub most_linked: Vec<MostLinked>,
}

/// Compares the iteration-1 snapshot `first` with the final snapshot `last`
/// and crosses the latter with the in-degree vector.
///
/// Nodes with zero in-degree are excluded from the overperformer list only:
/// with no incoming links at all they would trivially dominate it.
pub fn analyze(first: &[f64], last: &[f64], indeg: &[u32], ids: &IdMap) -> ChangeAnalysis {
    let n = ids.len();
    assert_eq!(first.len(), n);
    assert_eq!(last.len(), n);
    assert_eq!(indeg.len(), n);

    let ratios = (0..n)
        .map(|node| last[node] / first[node].max(EPSILON))
        .collect::<Vec<_>>();
    let score_change = |&node: &usize| ScoreChange {
        node,
        ratio: ratios[node],
        change: last[node] - first[node],
        first_score: first[node],
        final_score: last[node],
    };

    let mut increases = (0..n).collect::<Vec<_>>();
    select_prefix(&mut increases, CHANGE_LIST_LEN, |&a, &b| {
        by_key_desc(&ratios, ids, a, b)
    });

    let mut decreases = (0..n).collect::<Vec<_>>();
    select_prefix(&mut decreases, CHANGE_LIST_LEN, |&a, &b| {
        by_key_asc(&ratios, ids, a, b)
    });

    let indegree_ratios = (0..n)
        .map(|node| indeg[node] as f64 / last[node].max(EPSILON))
        .collect::<Vec<_>>();
    let degree_ratio = |&node: &usize| DegreeRatio {
        node,
        indegree_ratio: indegree_ratios[node],
        indegree: indeg[node],
        final_score: last[node],
    };

    let mut underperformers = (0..n).collect::<Vec<_>>();
    select_prefix(&mut underperformers, CHANGE_LIST_LEN, |&a, &b| {
        by_key_desc(&indegree_ratios, ids, a, b)
    });

    // Zero-in-degree nodes are filtered out on this side only
    let mut overperformers = (0..n).filter(|&node| indeg[node] >= 1).collect::<Vec<_>>();
    select_prefix(&mut overperformers, CHANGE_LIST_LEN, |&a, &b| {
        by_key_asc(&indegree_ratios, ids, a, b)
    });

    let mut most_linked = (0..n).collect::<Vec<_>>();
    select_prefix(&mut most_linked, MOST_LINKED_LEN, |&a, &b| {
        indeg[b]
            .cmp(&indeg[a])
            .then_with(|| ids.original(a).cmp(&ids.original(b)))
    });

    ChangeAnalysis {
        increases: increases.iter().map(score_change).collect(),
        decreases: decreases.iter().map(score_change).collect(),
        underperformers: underperformers.iter().map(degree_ratio).collect(),
        overperformers: overperformers.iter().map(degree_ratio).collect(),
        most_linked: most_linked
            .iter()
            .map(|&node| MostLinked {
                node,
                indegree: indeg[node],
                score: last[node],
            })
            .collect(),
    }
}

fn by_key_desc(keys: &[f64], ids: &IdMap, a: usize, b: usize) -> Ordering {
    keys[b]
        .total_cmp(&keys[a])
        .then_with(|| ids.original(a).cmp(&ids.original(b)))
}

fn by_key_asc(keys: &[f64], ids: &IdMap, a: usize, b: usize) -> Ordering {
    keys[a]
        .total_cmp(&keys[b])
        .then_with(|| ids.original(a).cmp(&ids.original(b)))
}
