use crate::engine::error::EngineError;
use std::fs;
use std::path::{Path, PathBuf};

const WATER_SUBDIR: [&str; 3] = ["structures", "it1", "water"];
const CLUSTER_LIST_FILE: &str = "cluster_rmsd.txt";
const STAT_SUFFIX: &str = ".stat";
const DESOLVATION_SUFFIX: &str = "_Edesolv";

/// One HADDOCK docking root and the location of its water-refinement results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockingRun {
    root: PathBuf,
    water_dir: PathBuf,
    model_count: usize,
}

impl DockingRun {
    /// Resolves the water-refinement directory of `root` and counts its pose files.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MissingRunDirectory`] if the water directory does not
    /// exist and [`EngineError::FileAccess`] if it cannot be listed.
    pub fn open(root: &Path, pose_extension: &str) -> Result<Self, EngineError> {
        let water_dir = water_dir(root);
        if !water_dir.is_dir() {
            return Err(EngineError::MissingRunDirectory { path: water_dir });
        }
        let model_count = count_models(&water_dir, pose_extension)?;

        Ok(Self {
            root: root.to_path_buf(),
            water_dir,
            model_count,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn water_dir(&self) -> &Path {
        &self.water_dir
    }

    pub fn model_count(&self) -> usize {
        self.model_count
    }

    /// Key under which this run's table is stored in the result mapping.
    pub fn key(&self) -> String {
        sanitize_key(&self.root)
    }

    pub fn cluster_list_path(&self) -> PathBuf {
        self.water_dir.join(CLUSTER_LIST_FILE)
    }

    pub fn member_list_path(&self, cluster_id: &str) -> PathBuf {
        self.water_dir.join(cluster_id)
    }

    pub fn stat_path(&self, cluster_id: &str) -> PathBuf {
        self.water_dir.join(format!("{}{}", cluster_id, STAT_SUFFIX))
    }

    pub fn desolvation_path(&self, cluster_id: &str) -> PathBuf {
        self.water_dir
            .join(format!("{}{}", cluster_id, DESOLVATION_SUFFIX))
    }
}

pub fn water_dir(root: &Path) -> PathBuf {
    WATER_SUBDIR.iter().fold(root.to_path_buf(), |p, seg| p.join(seg))
}

/// Turns a docking root into a result key that is safe to use inside file names.
pub fn sanitize_key(root: &Path) -> String {
    root.to_string_lossy().replace(';', ".")
}

/// Counts the regular files directly inside `dir` whose name ends with `extension`.
pub fn count_models(dir: &Path, extension: &str) -> Result<usize, EngineError> {
    let entries = fs::read_dir(dir).map_err(|e| EngineError::file_access(dir, e))?;

    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(|e| EngineError::file_access(dir, e))?;
        let path = entry.path();
        if path.is_file() && entry.file_name().to_string_lossy().ends_with(extension) {
            count += 1;
        }
    }
    Ok(count)
}
