/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Streaming power-iteration PageRank.
//!
//! This implementation never builds an adjacency structure: every iteration
//! is one sequential pass over the arc file, scattering rank from sources to
//! targets into an accumulator vector. Memory is bounded by the number of
//! nodes, not by the number of arcs.
//!
//! # The formula
//!
//! Let *n* be the number of nodes, α the damping factor, **x** the current
//! rank vector and *d*(*u*) the out-degree of *u* (self-loops excluded). One
//! iteration computes
//!
//! > *x′ᵥ* = α ∑_(*u* → *v*) *xᵤ* / *d*(*u*)  +  ( α ∑_(dangling *u*) *xᵤ*  +  (1 − α) ) / *n*
//!
//! where the first sum ranges over the non-self-loop arcs into *v*. The
//! second term spreads both the teleportation mass (1 − α) and the rank held
//! by dangling nodes uniformly over all nodes. Uniform redistribution is a
//! modeling choice of this tool; it is not the degree-weighted variant found
//! elsewhere.
//!
//! Since the arc scan only adds nonnegative contributions on top of the
//! uniform share, after any iteration every entry is at least (1 − α) / *n*,
//! and the vector remains stochastic up to floating-point rounding.
//!
//! # Iteration count
//!
//! The engine runs a caller-chosen fixed number of iterations. The ℓ₁
//! distance between successive vectors is recorded for every iteration and
//! reported, but it is never used as a stopping rule: with a handful of
//! passes over a very large file, a fixed count is the simpler contract.
//!
//! # Failure
//!
//! An I/O error in the middle of a pass aborts the iteration. The partial
//! accumulator is discarded and the previous rank vector stays in place, so a
//! failed run never exposes a half-updated state.

use crate::arcs::ArcFile;
use crate::degrees::ArcStats;
use crate::ids::IdMap;
use crate::GraphError;
use anyhow::Result;
use dsi_progress_logger::ProgressLog;
use kahan::KahanSum;

/// Streaming PageRank over an arc file.
///
/// The struct is configured via setters and advanced one pass at a time via
/// [`iterate`](Self::iterate) (or in bulk via [`run`](Self::run)); the
/// current vector is available through [`rank`](Self::rank) at any point.
///
/// # Examples
///
/// ```no_run
/// use dsi_progress_logger::no_logging;
/// use wikirank::arcs::ArcFile;
/// use wikirank::degrees;
/// use wikirank::ids::IdMap;
/// use wikirank::rank::pagerank::PageRank;
///
/// # fn main() -> anyhow::Result<()> {
/// let arcs = ArcFile::new("enwiki.wikilink_graph.2003-03-01.csv");
/// let ids = IdMap::build(&arcs, no_logging![])?;
/// let (outdeg, _) = degrees::outdegrees(&arcs, &ids, no_logging![])?;
///
/// let mut pr = PageRank::new(&arcs, &ids, &outdeg)?;
/// pr.alpha(0.9);
/// pr.run(3, no_logging![])?;
///
/// assert!((pr.rank().iter().sum::<f64>() - 1.0).abs() < 1E-9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PageRank<'a> {
    arcs: &'a ArcFile,
    ids: &'a IdMap,
    outdeg: &'a [u32],
    alpha: f64,

    rank: Box<[f64]>,
    accum: Box<[f64]>,
    first: Option<Box<[f64]>>,
    l1_distances: Vec<f64>,
    iteration: usize,
}

impl<'a> PageRank<'a> {
    /// The default damping factor.
    pub const DEFAULT_ALPHA: f64 = 0.9;

    /// Creates a new computation with the rank vector initialized uniformly
    /// to 1/*n*.
    ///
    /// Fails with [`GraphError::EmptyGraph`] if the id map is empty.
    ///
    /// # Panics
    ///
    /// Panics if the out-degree vector does not match the id map.
    pub fn new(arcs: &'a ArcFile, ids: &'a IdMap, outdeg: &'a [u32]) -> Result<Self> {
        let n = ids.len();
        if n == 0 {
            return Err(GraphError::EmptyGraph.into());
        }
        assert_eq!(
            outdeg.len(),
            n,
            "Out-degree vector length ({}) does not match the number of nodes ({n})",
            outdeg.len()
        );
        Ok(Self {
            arcs,
            ids,
            outdeg,
            alpha: Self::DEFAULT_ALPHA,
            rank: vec![1.0 / n as f64; n].into_boxed_slice(),
            accum: vec![0.0; n].into_boxed_slice(),
            first: None,
            l1_distances: vec![0.0],
            iteration: 0,
        })
    }

    /// Sets the damping factor α.
    ///
    /// # Panics
    ///
    /// Panics if `alpha` is not in the open interval (0 . . 1).
    pub fn alpha(&mut self, alpha: f64) -> &mut Self {
        assert!(
            alpha > 0.0 && alpha < 1.0,
            "The damping factor must be in (0 . . 1), got {alpha}"
        );
        self.alpha = alpha;
        self
    }

    /// Returns the rank vector, indexed by dense index.
    ///
    /// Before the first call to [`iterate`](Self::iterate) this is the
    /// uniform vector.
    pub fn rank(&self) -> &[f64] {
        &self.rank
    }

    /// Returns the snapshot of the rank vector taken after iteration 1, if
    /// at least one iteration has completed.
    pub fn first_iteration(&self) -> Option<&[f64]> {
        self.first.as_deref()
    }

    /// The number of completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// The ℓ₁ distances recorded so far; entry 0 is defined as 0 (no prior
    /// state), entry *k* is the distance between the vectors before and
    /// after iteration *k*.
    pub fn l1_distances(&self) -> &[f64] {
        &self.l1_distances
    }

    /// Performs one power iteration with a full scan of the arc file and
    /// returns its ℓ₁ distance.
    pub fn iterate(&mut self, pl: &mut impl ProgressLog) -> Result<f64> {
        let n = self.ids.len();
        let mut stats = ArcStats::default();
        self.accum.fill(0.0);

        let mut iter = self.arcs.arcs()?;
        pl.item_name("arc");
        pl.expected_updates(None);
        pl.start(format!("Iteration {}...", self.iteration + 1));
        for arc in &mut iter {
            let (source, target) = arc?;
            pl.light_update();
            if source == target {
                stats.self_loops += 1;
                continue;
            }
            let (Some(source), Some(target)) = (self.ids.dense(source), self.ids.dense(target))
            else {
                stats.unresolved += 1;
                continue;
            };
            // A resolved source always has positive out-degree when the file
            // is unchanged between scans; the guard protects the division.
            let outdeg = self.outdeg[source];
            if outdeg > 0 {
                self.accum[target] += self.alpha * self.rank[source] / outdeg as f64;
                stats.valid += 1;
            }
        }
        pl.done();

        let mut dangling_sum = KahanSum::<f64>::new();
        let mut dangling_count = 0usize;
        for (node, &outdeg) in self.outdeg.iter().enumerate() {
            if outdeg == 0 {
                dangling_sum += self.rank[node];
                dangling_count += 1;
            }
        }
        let dangling_mass = dangling_sum.sum();

        // Teleportation and dangling mass, both spread uniformly
        let uniform_share = (self.alpha * dangling_mass + (1.0 - self.alpha)) / n as f64;
        for value in self.accum.iter_mut() {
            *value += uniform_share;
        }

        let mut l1_distance = KahanSum::<f64>::new();
        for (new, old) in self.accum.iter().zip(self.rank.iter()) {
            l1_distance += (new - old).abs();
        }
        let l1_distance = l1_distance.sum();

        // The scan completed, so the new vector may replace the old one
        std::mem::swap(&mut self.rank, &mut self.accum);
        self.iteration += 1;
        self.l1_distances.push(l1_distance);
        if self.iteration == 1 {
            self.first = Some(self.rank.clone());
        }

        log::info!(
            "Iteration {}: {} rank transfers, dangling mass {:e} from {} nodes, L1 distance {:e}",
            self.iteration,
            stats.valid,
            dangling_mass,
            dangling_count,
            l1_distance
        );
        Ok(l1_distance)
    }

    /// Performs the given number of iterations.
    pub fn run(&mut self, iterations: usize, pl: &mut impl ProgressLog) -> Result<()> {
        log::info!(
            "Computing PageRank (alpha={}, iterations={iterations}) over {} nodes",
            self.alpha,
            self.ids.len()
        );
        for _ in 0..iterations {
            self.iterate(pl)?;
        }
        Ok(())
    }
}
