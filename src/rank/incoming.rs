/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Single-target investigation of incoming links.
//!
//! A reverse variant of the streaming pass: one full scan collects every
//! non-self-loop arc pointing at a given node, together with the current
//! score of its source. The total incoming contribution, the sum of
//! `score / outdegree` over the collected arcs, is exactly the amount the
//! target would receive from these links (before damping) in a power
//! iteration run from the given score vector.

use crate::arcs::ArcFile;
use crate::degrees::ArcStats;
use crate::ids::IdMap;
use crate::GraphError;
use anyhow::Result;
use dsi_progress_logger::ProgressLog;
use kahan::KahanSum;

/// One arc into the investigated node.
#[derive(Debug, Clone, Copy)]
pub struct IncomingLink {
    /// Original id of the source node.
    pub id: u64,
    /// Current score of the source node.
    pub score: f64,
}

/// The result of an incoming-link investigation.
#[derive(Debug, Clone)]
pub struct Investigation {
    /// Original id of the target node.
    pub target: u64,
    /// Current score of the target node.
    pub score: f64,
    /// In-degree of the target node.
    pub indegree: u32,
    /// The collected arcs, by source score descending (ties by source id
    /// ascending). A source linking the target more than once appears once
    /// per arc.
    pub incoming: Vec<IncomingLink>,
    /// Sum of `score / outdegree` over the collected arcs.
    pub contribution: f64,
}

/// Scans the arc file for all arcs pointing at `target` and reports their
/// sources' current scores.
///
/// Fails with [`GraphError::NodeNotFound`] if `target` is not in the id map.
pub fn investigate(
    arcs: &ArcFile,
    ids: &IdMap,
    outdeg: &[u32],
    indeg: &[u32],
    rank: &[f64],
    target: u64,
    pl: &mut impl ProgressLog,
) -> Result<Investigation> {
    let Some(target_dense) = ids.dense(target) else {
        return Err(GraphError::NodeNotFound(target).into());
    };

    let mut sources = Vec::new();
    let mut stats = ArcStats::default();
    let mut iter = arcs.arcs()?;

    pl.item_name("arc");
    pl.expected_updates(None);
    pl.start(format!("Collecting arcs into node {target}..."));
    for arc in &mut iter {
        let (source, to) = arc?;
        pl.light_update();
        if source == to {
            stats.self_loops += 1;
            continue;
        }
        if ids.dense(to) != Some(target_dense) {
            continue;
        }
        let Some(source) = ids.dense(source) else {
            stats.unresolved += 1;
            continue;
        };
        sources.push(source);
        stats.valid += 1;
    }
    pl.done();

    sources.sort_unstable_by(|&a, &b| {
        rank[b]
            .total_cmp(&rank[a])
            .then_with(|| ids.original(a).cmp(&ids.original(b)))
    });

    let mut contribution = KahanSum::<f64>::new();
    for &source in &sources {
        if outdeg[source] > 0 {
            contribution += rank[source] / outdeg[source] as f64;
        }
    }

    log::info!(
        "Found {} arcs into node {target} (score {:e}, in-degree {})",
        sources.len(),
        rank[target_dense],
        indeg[target_dense]
    );

    Ok(Investigation {
        target,
        score: rank[target_dense],
        indegree: indeg[target_dense],
        incoming: sources
            .into_iter()
            .map(|source| IncomingLink {
                id: ids.original(source),
                score: rank[source],
            })
            .collect(),
        contribution: contribution.sum(),
    })
}
