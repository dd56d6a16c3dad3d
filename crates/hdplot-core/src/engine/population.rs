use super::error::EngineError;
use crate::core::io::membership;
use crate::core::models::cluster::{Cluster, population_threshold};
use crate::core::models::run::DockingRun;
use tracing::debug;

/// Reads every cluster listed for `run` together with its population.
///
/// All member lists are read before any filtering, so a missing member list fails the
/// run even when its cluster would have been dropped.
pub fn load_clusters(run: &DockingRun) -> Result<Vec<Cluster>, EngineError> {
    let list_path = run.cluster_list_path();
    let ids = membership::read_cluster_ids_from_path(&list_path)
        .map_err(|e| EngineError::file_access(&list_path, e))?;

    ids.into_iter()
        .map(|id| {
            let member_path = run.member_list_path(&id);
            let population = membership::count_members_from_path(&member_path)
                .map_err(|e| EngineError::file_access(&member_path, e))?;
            Ok(Cluster::new(id, population))
        })
        .collect()
}

/// Keeps the clusters whose population strictly exceeds `model_count * min_cluster_size`.
pub fn retain_populated(
    clusters: Vec<Cluster>,
    model_count: usize,
    min_cluster_size: f64,
) -> Vec<Cluster> {
    let threshold = population_threshold(model_count, min_cluster_size);
    clusters
        .into_iter()
        .filter(|cluster| {
            let keep = cluster.is_retained(model_count, min_cluster_size);
            if !keep {
                debug!(
                    cluster = %cluster.id,
                    population = cluster.population,
                    threshold,
                    "Cluster below population threshold."
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::run::water_dir;
    use std::fs;
    use tempfile::tempdir;

    fn write_members(dir: &std::path::Path, id: &str, n: usize) {
        let lines: String = (0..n).map(|i| format!("model_{i}.pdb\n")).collect();
        fs::write(dir.join(id), lines).unwrap();
    }

    #[test]
    fn clusters_follow_membership_list_order() {
        let root = tempdir().unwrap();
        let water = water_dir(root.path());
        fs::create_dir_all(&water).unwrap();
        fs::write(water.join("cluster_rmsd.txt"), "#id rmsd\nc2 1.0\nc1 0.5\n").unwrap();
        write_members(&water, "c1", 4);
        write_members(&water, "c2", 7);

        let run = DockingRun::open(root.path(), ".pdb").unwrap();
        let clusters = load_clusters(&run).unwrap();
        assert_eq!(clusters, vec![Cluster::new("c2", 7), Cluster::new("c1", 4)]);
    }

    #[test]
    fn missing_member_list_is_file_access_error() {
        let root = tempdir().unwrap();
        let water = water_dir(root.path());
        fs::create_dir_all(&water).unwrap();
        fs::write(water.join("cluster_rmsd.txt"), "c1\n").unwrap();

        let run = DockingRun::open(root.path(), ".pdb").unwrap();
        let err = load_clusters(&run).unwrap_err();
        assert!(matches!(err, EngineError::FileAccess { ref path, .. } if path == &water.join("c1")));
    }

    #[test]
    fn missing_cluster_list_is_file_access_error() {
        let root = tempdir().unwrap();
        fs::create_dir_all(water_dir(root.path())).unwrap();

        let run = DockingRun::open(root.path(), ".pdb").unwrap();
        assert!(matches!(
            load_clusters(&run),
            Err(EngineError::FileAccess { .. })
        ));
    }

    #[test]
    fn retain_uses_strict_threshold() {
        let clusters = vec![
            Cluster::new("c1", 2),
            Cluster::new("c2", 3),
            Cluster::new("c3", 1),
        ];
        let kept = retain_populated(clusters, 10, 0.2);
        assert_eq!(kept, vec![Cluster::new("c2", 3)]);
    }
}
