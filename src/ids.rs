/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Compaction of arbitrary node ids into a dense index space.
//!
//! External node ids are drawn from an unbounded space, so all vectors of the
//! computation are indexed by a dense index in `[0..N)` instead. The mapping
//! is a bijection: dense indices are assigned in ascending order of the
//! original id, which makes the mapping reproducible across runs on the same
//! input, regardless of scan order.

use crate::arcs::ArcFile;
use anyhow::Result;
use dsi_progress_logger::ProgressLog;
use std::collections::{HashMap, HashSet};

/// A bijection between original node ids and dense indices in `[0..N)`.
///
/// The forward direction is a hash lookup; the reverse direction is a plain
/// array access.
#[derive(Debug, Clone)]
pub struct IdMap {
    to_dense: HashMap<u64, usize>,
    to_original: Box<[u64]>,
}

impl IdMap {
    /// Builds the map with one full scan of the arc file.
    ///
    /// Both endpoints of every parsed row are collected, including rows that
    /// are self-loops: discovery is id-level, not arc-level. Malformed rows
    /// are skipped by the scan itself.
    pub fn build(arcs: &ArcFile, pl: &mut impl ProgressLog) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut iter = arcs.arcs()?;

        pl.item_name("arc");
        pl.expected_updates(None);
        pl.start(format!("Discovering node ids in {}...", arcs.path.display()));
        for arc in &mut iter {
            let (source, target) = arc?;
            seen.insert(source);
            seen.insert(target);
            pl.light_update();
        }
        pl.done();

        let stats = iter.stats();
        log::info!(
            "Found {} distinct node ids in {} arcs ({} malformed rows skipped)",
            seen.len(),
            stats.arcs,
            stats.skipped()
        );

        Ok(Self::from_ids(seen))
    }

    /// Builds the map from a set of ids already in memory.
    ///
    /// Duplicates are merged; dense indices follow ascending id order, as in
    /// [`build`](Self::build).
    ///
    /// # Examples
    /// ```
    /// use wikirank::ids::IdMap;
    ///
    /// let ids = IdMap::from_ids([30, 10, 20, 10]);
    /// assert_eq!(ids.len(), 3);
    /// assert_eq!(ids.dense(10), Some(0));
    /// assert_eq!(ids.dense(30), Some(2));
    /// assert_eq!(ids.original(2), 30);
    /// assert_eq!(ids.dense(40), None);
    /// ```
    pub fn from_ids(ids: impl IntoIterator<Item = u64>) -> Self {
        let mut to_original = ids.into_iter().collect::<Vec<_>>();
        to_original.sort_unstable();
        to_original.dedup();
        let mut to_dense = HashMap::with_capacity(to_original.len());
        for (dense, &original) in to_original.iter().enumerate() {
            to_dense.insert(original, dense);
        }
        Self {
            to_dense,
            to_original: to_original.into_boxed_slice(),
        }
    }

    /// The number of distinct node ids.
    pub fn len(&self) -> usize {
        self.to_original.len()
    }

    pub fn is_empty(&self) -> bool {
        self.to_original.is_empty()
    }

    /// Resolves an original id to its dense index.
    pub fn dense(&self, original: u64) -> Option<usize> {
        self.to_dense.get(&original).copied()
    }

    /// Returns the original id of a dense index.
    ///
    /// # Panics
    ///
    /// Panics if `dense` is not in `[0..N)`.
    pub fn original(&self, dense: usize) -> u64 {
        self.to_original[dense]
    }

    /// The original ids in dense-index order.
    pub fn originals(&self) -> &[u64] {
        &self.to_original
    }
}
