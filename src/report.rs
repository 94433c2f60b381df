/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Report records and their JSON serialization.
//!
//! Every run emits self-contained JSON reports: one per iteration (including
//! the initial uniform state), degree distributions, the change analysis,
//! run metadata, a best-effort title map, and optionally an investigation.
//! The records here fix the field sets and the numeric semantics; the
//! serialization syntax is whatever `serde_json` produces.
//!
//! All scores in these records are probability mass, copied from the rank
//! vector at the moment the record is built and never rewritten afterwards;
//! title annotation happens in separate, purely additive records.

use crate::degrees;
use crate::ids::IdMap;
use crate::rank::changes::ChangeAnalysis;
use crate::rank::incoming::Investigation;
use crate::rank::select;
use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Graph-level counts repeated in several reports.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct DatasetStats {
    pub total_nodes: usize,
    pub total_arcs: u64,
}

/// One row of a ranked list.
#[derive(Debug, Clone, Serialize)]
pub struct RankedEntry {
    /// 1-based rank; bottom lists are numbered from the tail of the full
    /// ranking.
    pub rank: usize,
    /// Original node id.
    pub id: u64,
    /// Probability mass.
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indegree: Option<u32>,
}

/// The per-iteration report.
#[derive(Debug, Clone, Serialize)]
pub struct IterationReport {
    pub iteration: usize,
    pub l1_distance: f64,
    pub dataset_stats: DatasetStats,
    pub top_results: Vec<RankedEntry>,
    pub bottom_results: Vec<RankedEntry>,
}

impl IterationReport {
    /// Builds the report for one iteration from the current score vector.
    pub fn new(
        iteration: usize,
        l1_distance: f64,
        dataset_stats: DatasetStats,
        scores: &[f64],
        ids: &IdMap,
        indeg: &[u32],
        num_results: usize,
    ) -> Self {
        let n = scores.len();
        let bottom = select::bottom_k(scores, ids, num_results);
        Self {
            iteration,
            l1_distance,
            dataset_stats,
            top_results: select::top_k(scores, ids, num_results)
                .into_iter()
                .enumerate()
                .map(|(i, node)| RankedEntry {
                    rank: i + 1,
                    id: ids.original(node),
                    score: scores[node],
                    indegree: Some(indeg[node]),
                })
                .collect(),
            bottom_results: bottom
                .iter()
                .enumerate()
                .map(|(i, &node)| RankedEntry {
                    rank: n - bottom.len() + i + 1,
                    id: ids.original(node),
                    score: scores[node],
                    indegree: None,
                })
                .collect(),
        }
    }

    /// The node ids this report mentions, for title lookup.
    pub fn referenced_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.top_results
            .iter()
            .chain(self.bottom_results.iter())
            .map(|entry| entry.id)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DegreeBucket {
    pub degree: u32,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DegreeStats {
    pub total_nodes: usize,
    pub total_arcs: u64,
    pub avg_in_degree: f64,
    pub avg_out_degree: f64,
    pub max_in_degree: u32,
    pub max_out_degree: u32,
}

/// The degree-distribution report.
#[derive(Debug, Clone, Serialize)]
pub struct DegreeReport {
    pub in_degree_distribution: Vec<DegreeBucket>,
    pub out_degree_distribution: Vec<DegreeBucket>,
    pub stats: DegreeStats,
}

impl DegreeReport {
    pub fn new(outdeg: &[u32], indeg: &[u32], total_arcs: u64) -> Self {
        let total_nodes = outdeg.len();
        // In- and out-degrees average to the same value: every valid arc is
        // counted once on each side.
        let avg_degree = if total_nodes == 0 {
            0.0
        } else {
            total_arcs as f64 / total_nodes as f64
        };
        let buckets = |degrees: &[u32]| {
            degrees::distribution(degrees)
                .into_iter()
                .map(|(degree, count)| DegreeBucket { degree, count })
                .collect()
        };
        Self {
            in_degree_distribution: buckets(indeg),
            out_degree_distribution: buckets(outdeg),
            stats: DegreeStats {
                total_nodes,
                total_arcs,
                avg_in_degree: avg_degree,
                avg_out_degree: avg_degree,
                max_in_degree: indeg.iter().copied().max().unwrap_or(0),
                max_out_degree: outdeg.iter().copied().max().unwrap_or(0),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AnalysisHeader {
    pub from_iteration: usize,
    pub to_iteration: usize,
    pub total_nodes: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEntry {
    pub rank: usize,
    pub id: u64,
    pub ratio: f64,
    pub change: f64,
    pub first_score: f64,
    pub final_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DegreeRatioEntry {
    pub rank: usize,
    pub id: u64,
    pub indegree_ratio: f64,
    pub indegree: u32,
    pub final_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MostLinkedEntry {
    pub id: u64,
    pub indegree: u32,
    pub score: f64,
}

/// The change-analysis report.
#[derive(Debug, Clone, Serialize)]
pub struct ChangesReport {
    pub analysis: AnalysisHeader,
    pub biggest_increases: Vec<ChangeEntry>,
    pub biggest_decreases: Vec<ChangeEntry>,
    pub underperformers: Vec<DegreeRatioEntry>,
    pub overperformers: Vec<DegreeRatioEntry>,
    pub top_by_indegree: Vec<MostLinkedEntry>,
}

impl ChangesReport {
    pub fn new(analysis: &ChangeAnalysis, ids: &IdMap, to_iteration: usize) -> Self {
        let changes = |entries: &[crate::rank::changes::ScoreChange]| {
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| ChangeEntry {
                    rank: i + 1,
                    id: ids.original(entry.node),
                    ratio: entry.ratio,
                    change: entry.change,
                    first_score: entry.first_score,
                    final_score: entry.final_score,
                })
                .collect()
        };
        let ratios = |entries: &[crate::rank::changes::DegreeRatio]| {
            entries
                .iter()
                .enumerate()
                .map(|(i, entry)| DegreeRatioEntry {
                    rank: i + 1,
                    id: ids.original(entry.node),
                    indegree_ratio: entry.indegree_ratio,
                    indegree: entry.indegree,
                    final_score: entry.final_score,
                })
                .collect()
        };
        Self {
            analysis: AnalysisHeader {
                from_iteration: 1,
                to_iteration,
                total_nodes: ids.len(),
            },
            biggest_increases: changes(&analysis.increases),
            biggest_decreases: changes(&analysis.decreases),
            underperformers: ratios(&analysis.underperformers),
            overperformers: ratios(&analysis.overperformers),
            top_by_indegree: analysis
                .most_linked
                .iter()
                .map(|entry| MostLinkedEntry {
                    id: ids.original(entry.node),
                    indegree: entry.indegree,
                    score: entry.score,
                })
                .collect(),
        }
    }

    /// The node ids this report mentions, for title lookup.
    pub fn referenced_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.biggest_increases
            .iter()
            .chain(self.biggest_decreases.iter())
            .map(|entry| entry.id)
            .chain(
                self.underperformers
                    .iter()
                    .chain(self.overperformers.iter())
                    .map(|entry| entry.id),
            )
            .chain(self.top_by_indegree.iter().map(|entry| entry.id))
    }
}

/// The run metadata report.
#[derive(Debug, Clone, Serialize)]
pub struct Metadata {
    pub dataset: String,
    pub total_nodes: usize,
    pub total_arcs: u64,
    pub iterations: usize,
    pub alpha: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetInfo {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub score: f64,
    pub indegree: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncomingEntry {
    pub id: u64,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct InvestigationSummary {
    pub total_incoming: usize,
    pub total_contribution: f64,
}

/// The incoming-link investigation report.
#[derive(Debug, Clone, Serialize)]
pub struct InvestigationReport {
    pub target: TargetInfo,
    pub incoming_links: Vec<IncomingEntry>,
    pub summary: InvestigationSummary,
}

impl InvestigationReport {
    /// Builds the report, annotating it with whatever titles are available.
    pub fn new(investigation: &Investigation, titles: &BTreeMap<u64, String>) -> Self {
        Self {
            target: TargetInfo {
                id: investigation.target,
                title: titles.get(&investigation.target).cloned(),
                score: investigation.score,
                indegree: investigation.indegree,
            },
            incoming_links: investigation
                .incoming
                .iter()
                .map(|link| IncomingEntry {
                    id: link.id,
                    score: link.score,
                    title: titles.get(&link.id).cloned(),
                })
                .collect(),
            summary: InvestigationSummary {
                total_incoming: investigation.incoming.len(),
                total_contribution: investigation.contribution,
            },
        }
    }
}

/// The path of the report for a given iteration.
pub fn iteration_path(dir: &Path, iteration: usize) -> PathBuf {
    dir.join(format!("pagerank_iter_{iteration:02}.json"))
}

/// The path of the investigation report for a given target.
pub fn investigation_path(dir: &Path, target: u64) -> PathBuf {
    dir.join(format!("investigate_{target}.json"))
}

/// Serializes a report to a JSON file.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(
        File::create(path)
            .with_context(|| format!("Cannot create the report file {}", path.display()))?,
    );
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Cannot serialize {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    log::info!("Report saved to {}", path.display());
    Ok(())
}
