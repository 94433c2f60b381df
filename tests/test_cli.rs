/*
 * SPDX-FileCopyrightText: 2025 Tommaso Fontana
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "cli")]

use anyhow::Result;
use serde_json::Value;
use std::io::Write;
use std::path::Path;
use tempfile::Builder;
use wikirank::cli::main as cli_main;

fn read_json(path: impl AsRef<Path>) -> Result<Value> {
    Ok(serde_json::from_reader(std::fs::File::open(path)?)?)
}

/// Runs the full `rank` pipeline on the worked two-node dangling example and
/// checks every emitted report.
#[test]
fn test_rank_end_to_end() -> Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let tmp_dir = Builder::new().prefix("wikirank_cli_").tempdir()?;
    let src = tmp_dir.path().join("graph.csv");
    let mut file = std::fs::File::create(&src)?;
    writeln!(file, "page_id_from\tpage_title_from\tpage_id_to\tpage_title_to")?;
    writeln!(file, "1\tFirst_Page\t2\tSecond_Page")?;
    drop(file);
    let out_dir = tmp_dir.path().join("reports");

    cli_main(vec![
        "wikirank".to_string(),
        "rank".to_string(),
        src.display().to_string(),
        "--iterations".to_string(),
        "1".to_string(),
        "--output-dir".to_string(),
        out_dir.display().to_string(),
        "--investigate".to_string(),
        "2".to_string(),
    ])?;

    // Iteration 0: the uniform state, with the asymmetric tie-break
    let initial = read_json(out_dir.join("pagerank_iter_00.json"))?;
    assert_eq!(initial["iteration"], 0);
    assert_eq!(initial["l1_distance"], 0.0);
    assert_eq!(initial["dataset_stats"]["total_nodes"], 2);
    assert_eq!(initial["dataset_stats"]["total_arcs"], 1);
    assert_eq!(initial["top_results"][0]["id"], 1);
    assert_eq!(initial["top_results"][0]["score"], 0.5);
    assert_eq!(initial["top_results"][0]["rank"], 1);
    assert_eq!(initial["bottom_results"][0]["id"], 2);

    // Iteration 1: the worked example's scores
    let final_report = read_json(out_dir.join("pagerank_iter_01.json"))?;
    assert_eq!(final_report["iteration"], 1);
    let l1_distance = final_report["l1_distance"].as_f64().unwrap();
    assert!((l1_distance - 0.45).abs() < 1E-12);
    assert_eq!(final_report["top_results"][0]["id"], 2);
    let top_score = final_report["top_results"][0]["score"].as_f64().unwrap();
    assert!((top_score - 0.725).abs() < 1E-12);
    assert_eq!(final_report["top_results"][0]["indegree"], 1);
    assert_eq!(final_report["top_results"][1]["id"], 1);
    let bottom_score = final_report["bottom_results"][0]["score"].as_f64().unwrap();
    assert!((bottom_score - 0.275).abs() < 1E-12);

    let degrees = read_json(out_dir.join("degree_distributions.json"))?;
    assert_eq!(degrees["stats"]["total_nodes"], 2);
    assert_eq!(degrees["stats"]["total_arcs"], 1);
    assert_eq!(degrees["stats"]["max_out_degree"], 1);
    assert_eq!(degrees["out_degree_distribution"][0]["degree"], 0);
    assert_eq!(degrees["out_degree_distribution"][0]["count"], 1);
    assert_eq!(degrees["out_degree_distribution"][1]["degree"], 1);

    // With a single iteration the two snapshots coincide: all ratios are 1
    let changes = read_json(out_dir.join("biggest_changes.json"))?;
    assert_eq!(changes["analysis"]["from_iteration"], 1);
    assert_eq!(changes["analysis"]["to_iteration"], 1);
    assert_eq!(changes["biggest_increases"][0]["ratio"], 1.0);
    assert_eq!(changes["biggest_increases"].as_array().unwrap().len(), 2);
    // Node 1 has no incoming links, so only node 2 can overperform
    let overperformers = changes["overperformers"].as_array().unwrap();
    assert_eq!(overperformers.len(), 1);
    assert_eq!(overperformers[0]["id"], 2);
    assert_eq!(changes["top_by_indegree"][0]["id"], 2);

    let metadata = read_json(out_dir.join("metadata.json"))?;
    assert_eq!(metadata["dataset"], "graph.csv");
    assert_eq!(metadata["iterations"], 1);
    assert_eq!(metadata["alpha"], 0.9);

    let titles = read_json(out_dir.join("titles.json"))?;
    assert_eq!(titles["1"], "First Page");
    assert_eq!(titles["2"], "Second Page");

    let investigation = read_json(out_dir.join("investigate_2.json"))?;
    assert_eq!(investigation["target"]["id"], 2);
    assert_eq!(investigation["target"]["title"], "Second Page");
    assert_eq!(investigation["target"]["indegree"], 1);
    assert_eq!(investigation["incoming_links"][0]["id"], 1);
    assert_eq!(investigation["incoming_links"][0]["title"], "First Page");
    assert_eq!(investigation["summary"]["total_incoming"], 1);
    let contribution = investigation["summary"]["total_contribution"]
        .as_f64()
        .unwrap();
    assert!((contribution - 0.275).abs() < 1E-12);

    Ok(())
}

/// An unknown investigation target is reported but does not fail the run.
#[test]
fn test_investigate_unknown_target_keeps_reports() -> Result<()> {
    let tmp_dir = Builder::new().prefix("wikirank_cli_").tempdir()?;
    let src = tmp_dir.path().join("graph.csv");
    let mut file = std::fs::File::create(&src)?;
    writeln!(file, "page_id_from\tpage_title_from\tpage_id_to\tpage_title_to")?;
    writeln!(file, "1\tFirst_Page\t2\tSecond_Page")?;
    drop(file);
    let out_dir = tmp_dir.path().join("reports");

    cli_main(vec![
        "wikirank".to_string(),
        "rank".to_string(),
        src.display().to_string(),
        "--iterations".to_string(),
        "1".to_string(),
        "--output-dir".to_string(),
        out_dir.display().to_string(),
        "--investigate".to_string(),
        "99".to_string(),
    ])?;

    assert!(out_dir.join("pagerank_iter_01.json").exists());
    assert!(out_dir.join("metadata.json").exists());
    assert!(!out_dir.join("investigate_99.json").exists());
    Ok(())
}

/// The `degrees` command emits the distribution report without ranking.
#[test]
fn test_degrees_command() -> Result<()> {
    let tmp_dir = Builder::new().prefix("wikirank_cli_").tempdir()?;
    let src = tmp_dir.path().join("graph.csv");
    let mut file = std::fs::File::create(&src)?;
    writeln!(file, "page_id_from\tpage_title_from\tpage_id_to\tpage_title_to")?;
    writeln!(file, "1\tA\t2\tB")?;
    writeln!(file, "3\tC\t2\tB")?;
    writeln!(file, "2\tB\t2\tB")?;
    drop(file);
    let out_dir = tmp_dir.path().join("reports");

    cli_main(vec![
        "wikirank".to_string(),
        "degrees".to_string(),
        src.display().to_string(),
        "--output-dir".to_string(),
        out_dir.display().to_string(),
    ])?;

    let degrees = read_json(out_dir.join("degree_distributions.json"))?;
    assert_eq!(degrees["stats"]["total_nodes"], 3);
    // The self-loop on node 2 is not an arc
    assert_eq!(degrees["stats"]["total_arcs"], 2);
    assert_eq!(degrees["stats"]["max_in_degree"], 2);
    assert!(!out_dir.join("pagerank_iter_00.json").exists());
    Ok(())
}
