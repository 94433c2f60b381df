/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Best-effort resolution of node ids to display titles.
//!
//! Titles live in the label columns of the arc file and are needed only for
//! the handful of ids mentioned by the reports, so they are gathered by a
//! dedicated scan that stops as soon as every wanted id has been seen. The
//! pass is strictly additive: it runs after all numeric reports are final
//! and never touches a score.

use crate::arcs::ArcFile;
use anyhow::Result;
use dsi_progress_logger::ProgressLog;
use std::collections::{BTreeMap, HashSet};
use std::io::BufRead;

/// Scans the arc file for the display titles of the wanted ids.
///
/// The first occurrence of an id in either endpoint column wins; underscores
/// in titles are replaced by spaces. Ids that never occur are simply absent
/// from the result.
pub fn lookup(
    arcs: &ArcFile,
    wanted: &HashSet<u64>,
    pl: &mut impl ProgressLog,
) -> Result<BTreeMap<u64, String>> {
    let mut titles = BTreeMap::new();
    if wanted.is_empty() {
        return Ok(titles);
    }

    let columns = [
        (arcs.source_column, arcs.source_label_column),
        (arcs.target_column, arcs.target_label_column),
    ];
    let min_fields = arcs.min_fields();

    pl.item_name("row");
    pl.expected_updates(None);
    pl.start(format!("Looking up titles for {} node ids...", wanted.len()));
    for line in arcs.reader()?.lines() {
        let line = line?;
        pl.light_update();
        let fields = line.split(arcs.separator).collect::<Vec<_>>();
        if fields.len() < min_fields {
            continue;
        }
        for (id_column, label_column) in columns {
            let Ok(id) = fields[id_column].parse::<u64>() else {
                continue;
            };
            if wanted.contains(&id) && !titles.contains_key(&id) {
                titles.insert(id, fields[label_column].replace('_', " "));
            }
        }
        if titles.len() == wanted.len() {
            break;
        }
    }
    pl.done();

    log::info!("Found titles for {}/{} node ids", titles.len(), wanted.len());
    Ok(titles)
}
