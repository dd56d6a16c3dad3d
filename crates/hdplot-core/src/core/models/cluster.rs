/// Prefix HADDOCK puts in front of the cluster number in cluster file names.
pub const CLUSTER_FILE_PREFIX: &str = "file.nam_clust";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cluster {
    pub id: String,
    pub population: usize,
}

impl Cluster {
    pub fn new(id: impl Into<String>, population: usize) -> Self {
        Self {
            id: id.into(),
            population,
        }
    }

    /// A cluster is kept only if its population strictly exceeds
    /// `model_count * min_cluster_size`.
    pub fn is_retained(&self, model_count: usize, min_cluster_size: f64) -> bool {
        self.population as f64 > population_threshold(model_count, min_cluster_size)
    }

    pub fn short_name(&self) -> String {
        short_cluster_name(&self.id)
    }
}

pub fn population_threshold(model_count: usize, min_cluster_size: f64) -> f64 {
    model_count as f64 * min_cluster_size
}

/// Strips the HADDOCK file prefix, turning `file.nam_clust3` into `3`.
pub fn short_cluster_name(id: &str) -> String {
    id.replace(CLUSTER_FILE_PREFIX, "")
}
