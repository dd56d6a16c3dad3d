mod common;

use common::RunFixture;
use hdplot::core::columns;
use hdplot::engine::config::{ExtractConfig, ExtractConfigBuilder};
use hdplot::engine::error::EngineError;
use hdplot::engine::progress::{Progress, ProgressReporter};
use hdplot::workflows::extract;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::tempdir;

fn config(fraction: f64) -> ExtractConfig {
    ExtractConfigBuilder::new()
        .min_cluster_size(fraction)
        .build()
        .unwrap()
}

fn key(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn population_equal_to_threshold_is_excluded() {
    let dir = tempdir().unwrap();
    let run = RunFixture::new(dir.path().join("dock"), 10)
        .cluster("file.nam_clust1", 2)
        .cluster("file.nam_clust2", 3)
        .write();

    let stats = extract::run(&[run.root()], &config(0.2), &ProgressReporter::new()).unwrap();
    let table = stats.get(&key(run.root())).unwrap().unwrap();
    assert_eq!(table.clusters(), vec!["file.nam_clust2"]);
    assert_eq!(table.len(), 3);
}

#[test]
fn missing_run_directory_has_no_key_and_does_not_abort_others() {
    let dir = tempdir().unwrap();
    let good = RunFixture::new(dir.path().join("good"), 10)
        .cluster("file.nam_clust1", 5)
        .write();
    let missing = dir.path().join("missing");

    let skipped = Mutex::new(Vec::new());
    let reporter = ProgressReporter::with_callback(Box::new(|event| {
        if let Progress::RunSkipped { water_dir } = event {
            skipped.lock().unwrap().push(water_dir);
        }
    }));
    let paths = vec![missing.clone(), good.root().to_path_buf()];
    let stats = extract::run(&paths, &config(0.1), &reporter).unwrap();
    drop(reporter);

    assert!(!stats.contains_key(&key(&missing)));
    assert!(stats.contains_key(&key(good.root())));
    assert_eq!(stats.len(), 1);
    assert_eq!(
        skipped.into_inner().unwrap(),
        vec![missing.join("structures").join("it1").join("water")]
    );
}

#[test]
fn haddock_score_is_the_weighted_sum_of_each_row() {
    let dir = tempdir().unwrap();
    let run = RunFixture::new(dir.path().join("dock"), 10)
        .cluster("file.nam_clust1", 4)
        .write();

    let stats = extract::run(&[run.root()], &config(0.1), &ProgressReporter::new()).unwrap();
    let table = stats.get(&key(run.root())).unwrap().unwrap();

    for (record, pose) in table.records().iter().zip(run.poses("file.nam_clust1")) {
        assert_eq!(record.structure, pose.name);
        assert_eq!(table.value(record, columns::EDESOLV), Some(pose.edesolv));
        assert_eq!(record.haddock_score, pose.expected_score());

        let recomputed = table.value(record, columns::EVDW).unwrap()
            + 0.2 * table.value(record, columns::EELEC).unwrap()
            + table.value(record, columns::EDESOLV).unwrap()
            + 0.1 * table.value(record, columns::EAIR).unwrap();
        assert!((record.haddock_score - recomputed).abs() < 1e-9);
    }
}

#[test]
fn repeated_extraction_is_identical() {
    let dir = tempdir().unwrap();
    let a = RunFixture::new(dir.path().join("a"), 20)
        .cluster("file.nam_clust1", 6)
        .cluster("file.nam_clust2", 4)
        .write();
    let b = RunFixture::new(dir.path().join("b"), 20)
        .cluster("file.nam_clust1", 8)
        .write();
    let paths = [a.root(), b.root()];

    let first = extract::run(&paths, &config(0.1), &ProgressReporter::new()).unwrap();
    let second = extract::run(&paths, &config(0.1), &ProgressReporter::new()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.keys().collect::<Vec<_>>(), vec![key(a.root()), key(b.root())]);
}

#[test]
fn output_starts_with_cluster_and_never_contains_dropped_columns() {
    let dir = tempdir().unwrap();
    let run = RunFixture::new(dir.path().join("dock"), 10)
        .cluster("file.nam_clust1", 3)
        .write();

    let stats = extract::run(&[run.root()], &config(0.1), &ProgressReporter::new()).unwrap();
    let table = stats.get(&key(run.root())).unwrap().unwrap();
    let cols = table.columns();

    assert_eq!(cols[0], "cluster");
    assert_eq!(cols[1], "#Structure");
    assert_eq!(cols.last(), Some(&"HADDOCK_score"));
    for dropped in common::DROPPED {
        assert!(!cols.contains(&dropped), "{dropped} must be dropped");
    }
    for required in ["Evdw", "Eelec", "BSA", "Edesolv", "Eair"] {
        assert!(cols.contains(&required));
    }
}

#[test]
fn structure_missing_from_desolvation_table_fails_the_whole_call() {
    let dir = tempdir().unwrap();
    let good = RunFixture::new(dir.path().join("good"), 10)
        .cluster("file.nam_clust1", 3)
        .write();
    let bad = RunFixture::new(dir.path().join("bad"), 10)
        .cluster("file.nam_clust1", 3)
        .write();
    let desolv = bad.water().join("file.nam_clust1_Edesolv");
    fs::write(&desolv, "#struc Edesolv\nsomething_else.pdb 1.0\n").unwrap();

    let err = extract::run(&[good.root(), bad.root()], &config(0.1), &ProgressReporter::new())
        .unwrap_err();
    assert!(matches!(
        err,
        EngineError::AmbiguousJoin { ref path, matches: 0, .. } if path == &desolv
    ));
}

#[test]
fn unfiltered_clusters_still_need_member_lists() {
    let dir = tempdir().unwrap();
    let run = RunFixture::new(dir.path().join("dock"), 10)
        .cluster("file.nam_clust1", 5)
        .listed_only("file.nam_clust9", 1)
        .write();
    fs::remove_file(run.water().join("file.nam_clust9")).unwrap();

    let err = extract::run(&[run.root()], &config(0.1), &ProgressReporter::new()).unwrap_err();
    assert!(matches!(err, EngineError::FileAccess { .. }));
}

#[test]
fn filtered_out_clusters_need_no_statistics_files() {
    let dir = tempdir().unwrap();
    let run = RunFixture::new(dir.path().join("dock"), 10)
        .cluster("file.nam_clust1", 5)
        .listed_only("file.nam_clust2", 1)
        .write();

    let stats = extract::run(&[run.root()], &config(0.1), &ProgressReporter::new()).unwrap();
    let table = stats.get(&key(run.root())).unwrap().unwrap();
    assert_eq!(table.clusters(), vec!["file.nam_clust1"]);
}

#[test]
fn colliding_keys_keep_the_last_value_at_the_first_position() {
    let dir = tempdir().unwrap();
    let dotted = RunFixture::new(dir.path().join("run.a"), 10)
        .cluster("file.nam_clust1", 2)
        .write();
    let other = RunFixture::new(dir.path().join("other"), 10)
        .cluster("file.nam_clust1", 5)
        .write();
    let semicolon = RunFixture::new(dir.path().join("run;a"), 10)
        .cluster("file.nam_clust1", 4)
        .write();

    let paths: Vec<PathBuf> = [&dotted, &other, &semicolon]
        .iter()
        .map(|r| r.root().to_path_buf())
        .collect();
    let stats = extract::run(&paths, &config(0.1), &ProgressReporter::new()).unwrap();

    let dotted_key = key(dotted.root());
    assert_eq!(stats.len(), 2);
    assert_eq!(
        stats.keys().collect::<Vec<_>>(),
        vec![dotted_key.clone(), key(other.root())]
    );
    assert_eq!(stats.get(&dotted_key).unwrap().unwrap().len(), 4);
}

#[test]
fn run_without_retained_cluster_maps_to_none() {
    let dir = tempdir().unwrap();
    let run = RunFixture::new(dir.path().join("dock"), 100)
        .cluster("file.nam_clust1", 5)
        .write();

    let stats = extract::run(&[run.root()], &config(0.1), &ProgressReporter::new()).unwrap();
    assert_eq!(stats.get(&key(run.root())), Some(None));
}
