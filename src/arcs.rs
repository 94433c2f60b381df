/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Sequential access to a tab-separated arc file.
//!
//! The arc file is the only representation of the graph: every pass of the
//! computation re-reads it from the beginning through [`ArcFile::arcs`],
//! which yields `(source, target)` id pairs. Rows that cannot be parsed
//! (too few columns, or id columns that are not unsigned integers) are
//! skipped and counted, never fatal; I/O errors, on the contrary, abort the
//! scan and must abort the whole run.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Lines};
use std::path::PathBuf;

/// A tab-separated arc file together with its record layout.
///
/// The defaults match the WikiLinkGraphs CSV format: one header line and
/// records `[page_id_from, page_title_from, page_id_to, page_title_to]`.
/// All fields are public so that a command-line layer can map its options
/// directly onto them.
#[derive(Debug, Clone)]
pub struct ArcFile {
    /// The path of the (decompressed) arc file.
    pub path: PathBuf,
    /// The column separator.
    pub separator: char,
    /// How many lines to skip at the start of the file.
    pub lines_to_skip: usize,
    /// The index of the column containing the source node id.
    pub source_column: usize,
    /// The index of the column containing the target node id.
    pub target_column: usize,
    /// The index of the column containing the source node label.
    pub source_label_column: usize,
    /// The index of the column containing the target node label.
    pub target_label_column: usize,
}

impl ArcFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            separator: '\t',
            lines_to_skip: 1,
            source_column: 0,
            target_column: 2,
            source_label_column: 1,
            target_label_column: 3,
        }
    }

    /// The minimum number of columns a row must have to be considered
    /// well formed.
    pub fn min_fields(&self) -> usize {
        self.source_column
            .max(self.target_column)
            .max(self.source_label_column)
            .max(self.target_label_column)
            + 1
    }

    /// Opens the file and positions the reader after the skipped lines.
    ///
    /// This is the shared entry point of all scans; it fails with context if
    /// the file cannot be opened.
    pub fn reader(&self) -> Result<BufReader<File>> {
        let file = File::open(&self.path)
            .with_context(|| format!("Cannot open the arc file {}", self.path.display()))?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        for _ in 0..self.lines_to_skip {
            line.clear();
            if reader
                .read_line(&mut line)
                .with_context(|| format!("Cannot read {}", self.path.display()))?
                == 0
            {
                break;
            }
        }
        Ok(reader)
    }

    /// Starts a full scan of the file, yielding parsed arcs.
    pub fn arcs(&self) -> Result<Arcs> {
        Ok(Arcs {
            lines: self.reader()?.lines(),
            separator: self.separator,
            min_fields: self.min_fields(),
            source_column: self.source_column,
            target_column: self.target_column,
            stats: ScanStats::default(),
        })
    }
}

/// Counters accumulated by a single scan of the arc file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    /// Rows successfully parsed into an arc.
    pub arcs: u64,
    /// Rows with fewer columns than [`ArcFile::min_fields`].
    pub short_rows: u64,
    /// Rows whose id columns did not parse as unsigned integers.
    pub bad_ids: u64,
}

impl ScanStats {
    /// Total number of rows skipped by this scan.
    pub fn skipped(&self) -> u64 {
        self.short_rows + self.bad_ids
    }
}

/// Iterator over the `(source, target)` pairs of one scan.
///
/// Malformed rows are consumed silently (see [`Arcs::stats`]); self-loops are
/// *not* filtered here, since id discovery is id-level and every other
/// consumer applies its own per-arc policy.
pub struct Arcs {
    lines: Lines<BufReader<File>>,
    separator: char,
    min_fields: usize,
    source_column: usize,
    target_column: usize,
    stats: ScanStats,
}

impl Arcs {
    /// The counters accumulated so far (complete once the iterator is
    /// exhausted).
    pub fn stats(&self) -> ScanStats {
        self.stats
    }
}

impl Iterator for Arcs {
    type Item = io::Result<(u64, u64)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e)),
            };
            let fields = line.split(self.separator).collect::<Vec<_>>();
            if fields.len() < self.min_fields {
                self.stats.short_rows += 1;
                continue;
            }
            let (Ok(source), Ok(target)) = (
                fields[self.source_column].parse::<u64>(),
                fields[self.target_column].parse::<u64>(),
            ) else {
                self.stats.bad_ids += 1;
                continue;
            };
            self.stats.arcs += 1;
            return Some(Ok((source, target)));
        }
    }
}
