/*
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::Result;
use dsi_progress_logger::no_logging;
use std::io::Write;
use tempfile::NamedTempFile;
use wikirank::arcs::ArcFile;
use wikirank::degrees;
use wikirank::ids::IdMap;
use wikirank::rank::incoming;
use wikirank::rank::pagerank::PageRank;
use wikirank::GraphError;

/// Writes a WikiLinkGraphs-style file (header plus one row per arc) and
/// returns it together with its [`ArcFile`] view.
fn write_arcs(arcs: &[(u64, u64)]) -> (NamedTempFile, ArcFile) {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "page_id_from\tpage_title_from\tpage_id_to\tpage_title_to"
    )
    .unwrap();
    for (source, target) in arcs {
        writeln!(file, "{source}\tPage_{source}\t{target}\tPage_{target}").unwrap();
    }
    file.flush().unwrap();
    let arc_file = ArcFile::new(file.path());
    (file, arc_file)
}

fn setup(arcs: &[(u64, u64)]) -> (NamedTempFile, ArcFile, IdMap, Box<[u32]>, Box<[u32]>) {
    let (file, arc_file) = write_arcs(arcs);
    let ids = IdMap::build(&arc_file, no_logging![]).unwrap();
    let (outdeg, _) = degrees::outdegrees(&arc_file, &ids, no_logging![]).unwrap();
    let (indeg, _) = degrees::indegrees(&arc_file, &ids, no_logging![]).unwrap();
    (file, arc_file, ids, outdeg, indeg)
}

/// On a directed 3-cycle the uniform vector is a fixed point: every node
/// receives exactly alpha / 3 plus the teleportation share (1 - alpha) / 3.
#[test]
fn test_cycle_fixed_point() -> Result<()> {
    let (_file, arcs, ids, outdeg, _) = setup(&[(1, 2), (2, 3), (3, 1)]);
    let mut pr = PageRank::new(&arcs, &ids, &outdeg)?;
    pr.alpha(0.85);
    let l1_distance = pr.iterate(no_logging![])?;

    for &score in pr.rank() {
        assert!(
            (score - 1.0 / 3.0).abs() < 1E-12,
            "expected 1/3, got {score}"
        );
    }
    assert!(l1_distance < 1E-12);
    Ok(())
}

/// The worked two-node example: arc 1 -> 2, node 2 dangling, alpha = 0.9.
/// Node 1 keeps only redistributed mass and teleportation (0.225 + 0.05);
/// node 2 additionally receives the full damped transfer (0.45).
#[test]
fn test_dangling_redistribution() -> Result<()> {
    let (_file, arcs, ids, outdeg, _) = setup(&[(1, 2)]);
    let mut pr = PageRank::new(&arcs, &ids, &outdeg)?;
    pr.alpha(0.9);
    pr.iterate(no_logging![])?;

    let rank = pr.rank();
    assert!((rank[0] - 0.275).abs() < 1E-12, "node 1: {}", rank[0]);
    assert!((rank[1] - 0.725).abs() < 1E-12, "node 2: {}", rank[1]);
    assert!((rank.iter().sum::<f64>() - 1.0).abs() < 1E-12);
    Ok(())
}

/// The vector stays stochastic across iterations and every entry is at least
/// the teleportation floor (1 - alpha) / n, on a graph with a self-loop and
/// two dangling nodes (one of which only has a self-loop).
#[test]
fn test_stochastic_with_teleport_floor() -> Result<()> {
    let (_file, arcs, ids, outdeg, _) = setup(&[(1, 2), (2, 3), (3, 1), (3, 4), (5, 5)]);
    let n = ids.len();
    assert_eq!(n, 5);
    let alpha = 0.9;
    let mut pr = PageRank::new(&arcs, &ids, &outdeg)?;
    pr.alpha(alpha);

    for _ in 0..3 {
        pr.iterate(no_logging![])?;
        let sum = pr.rank().iter().sum::<f64>();
        assert!((sum - 1.0).abs() < 1E-9, "sum = {sum}");
        let floor = (1.0 - alpha) / n as f64;
        for &score in pr.rank() {
            assert!(score >= floor * (1.0 - 1E-12), "{score} < {floor}");
        }
    }
    assert_eq!(pr.iteration(), 3);
    // Entry 0 of the series is the defined zero for the initial state
    assert_eq!(pr.l1_distances().len(), 4);
    assert_eq!(pr.l1_distances()[0], 0.0);
    Ok(())
}

/// Self-loops affect neither degrees nor rank transfer: the same graph with
/// and without a self-loop produces bit-identical results.
#[test]
fn test_self_loops_are_inert() -> Result<()> {
    let (_file_a, arcs_a, ids_a, outdeg_a, _) = setup(&[(1, 1), (1, 2)]);
    let (_file_b, arcs_b, ids_b, outdeg_b, _) = setup(&[(1, 2)]);
    assert_eq!(ids_a.len(), ids_b.len());
    assert_eq!(outdeg_a, outdeg_b);
    assert_eq!(outdeg_a[ids_a.dense(1).unwrap()], 1);

    let mut pr_a = PageRank::new(&arcs_a, &ids_a, &outdeg_a)?;
    let mut pr_b = PageRank::new(&arcs_b, &ids_b, &outdeg_b)?;
    pr_a.iterate(no_logging![])?;
    pr_b.iterate(no_logging![])?;
    assert_eq!(pr_a.rank(), pr_b.rank());
    Ok(())
}

/// Two runs over the same file produce bit-identical vectors.
#[test]
fn test_deterministic_runs() -> Result<()> {
    let (_file, arcs, ids, outdeg, _) = setup(&[(1, 2), (2, 3), (3, 1), (3, 4), (4, 1)]);
    let mut pr_a = PageRank::new(&arcs, &ids, &outdeg)?;
    let mut pr_b = PageRank::new(&arcs, &ids, &outdeg)?;
    pr_a.run(2, no_logging![])?;
    pr_b.run(2, no_logging![])?;
    assert_eq!(pr_a.rank(), pr_b.rank());
    assert_eq!(pr_a.l1_distances(), pr_b.l1_distances());
    Ok(())
}

/// The iteration-1 snapshot is taken once and never overwritten by later
/// iterations.
#[test]
fn test_first_iteration_snapshot() -> Result<()> {
    let (_file, arcs, ids, outdeg, _) = setup(&[(1, 2), (2, 3), (3, 1), (3, 4)]);
    let mut pr = PageRank::new(&arcs, &ids, &outdeg)?;
    assert!(pr.first_iteration().is_none());

    pr.iterate(no_logging![])?;
    let snapshot = pr.rank().to_vec();
    pr.iterate(no_logging![])?;
    pr.iterate(no_logging![])?;

    assert_eq!(pr.first_iteration().unwrap(), snapshot.as_slice());
    assert_ne!(pr.rank(), snapshot.as_slice());
    Ok(())
}

/// The investigation's total contribution, computed on the scores the engine
/// held before one more iteration, predicts exactly the link-derived part of
/// the target's next score.
#[test]
fn test_investigation_contribution() -> Result<()> {
    let (_file, arcs, ids, outdeg, indeg) = setup(&[(1, 3), (2, 3), (2, 4), (4, 3)]);
    let n = ids.len();
    let alpha = 0.9;
    let mut pr = PageRank::new(&arcs, &ids, &outdeg)?;
    pr.alpha(alpha);
    pr.iterate(no_logging![])?;

    let investigation =
        incoming::investigate(&arcs, &ids, &outdeg, &indeg, pr.rank(), 3, no_logging![])?;
    assert_eq!(investigation.incoming.len(), 3);
    assert_eq!(investigation.indegree, 3);
    // Sources sorted by score descending
    for pair in investigation.incoming.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }

    pr.iterate(no_logging![])?;
    // Node 3 is the only dangling node, so the uniform share of the second
    // iteration can be reconstructed from the iteration-1 snapshot
    let first = pr.first_iteration().unwrap();
    let dangling_mass = first[ids.dense(3).unwrap()];
    let uniform_share = (alpha * dangling_mass + (1.0 - alpha)) / n as f64;
    let expected = alpha * investigation.contribution + uniform_share;
    let actual = pr.rank()[ids.dense(3).unwrap()];
    assert!(
        (actual - expected).abs() < 1E-12,
        "expected {expected}, got {actual}"
    );
    Ok(())
}

/// Investigating an id that never appeared in the file is a typed error.
#[test]
fn test_investigate_not_found() {
    let (_file, arcs, ids, outdeg, indeg) = setup(&[(1, 2)]);
    let rank = [0.5, 0.5];
    let err = incoming::investigate(&arcs, &ids, &outdeg, &indeg, &rank, 99, no_logging![])
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GraphError>(),
        Some(GraphError::NodeNotFound(99))
    ));
}

/// A file with no parsable rows has no nodes, and the engine refuses to run.
#[test]
fn test_empty_graph() {
    let (_file, arcs) = write_arcs(&[]);
    let ids = IdMap::build(&arcs, no_logging![]).unwrap();
    assert!(ids.is_empty());
    let outdeg: [u32; 0] = [];
    let err = PageRank::new(&arcs, &ids, &outdeg).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GraphError>(),
        Some(GraphError::EmptyGraph)
    ));
}

/// A missing file fails up front, not mid-iteration.
#[test]
fn test_missing_file_is_fatal() {
    let arcs = ArcFile::new("/nonexistent/wikirank-test.csv");
    assert!(IdMap::build(&arcs, no_logging![]).is_err());
}
