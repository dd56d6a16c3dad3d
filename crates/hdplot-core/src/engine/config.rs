use thiserror::Error;

pub const DEFAULT_MIN_CLUSTER_SIZE: f64 = 0.1;
pub const DEFAULT_POSE_EXTENSION: &str = ".pdb";

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Minimum cluster size must be a fraction in [0, 1], got {0}")]
    InvalidFraction(f64),
    #[error("Pose file extension must not be empty")]
    EmptyPoseExtension,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractConfig {
    /// Fraction of the model count a cluster population has to exceed.
    pub min_cluster_size: f64,
    /// File-name suffix of the pose files counted as models.
    pub pose_extension: String,
    /// Process independent docking roots on the rayon pool.
    pub parallel: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            pose_extension: DEFAULT_POSE_EXTENSION.to_string(),
            parallel: true,
        }
    }
}

#[derive(Default)]
pub struct ExtractConfigBuilder {
    min_cluster_size: Option<f64>,
    pose_extension: Option<String>,
    parallel: Option<bool>,
}

impl ExtractConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_cluster_size(mut self, fraction: f64) -> Self {
        self.min_cluster_size = Some(fraction);
        self
    }
    pub fn pose_extension(mut self, extension: impl Into<String>) -> Self {
        self.pose_extension = Some(extension.into());
        self
    }
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    pub fn build(self) -> Result<ExtractConfig, ConfigError> {
        let defaults = ExtractConfig::default();

        let min_cluster_size = self.min_cluster_size.unwrap_or(defaults.min_cluster_size);
        if !(0.0..=1.0).contains(&min_cluster_size) {
            return Err(ConfigError::InvalidFraction(min_cluster_size));
        }

        let pose_extension = self.pose_extension.unwrap_or(defaults.pose_extension);
        if pose_extension.is_empty() {
            return Err(ConfigError::EmptyPoseExtension);
        }

        Ok(ExtractConfig {
            min_cluster_size,
            pose_extension,
            parallel: self.parallel.unwrap_or(defaults.parallel),
        })
    }
}
