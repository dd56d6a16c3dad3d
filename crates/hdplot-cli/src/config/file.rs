use crate::error::{CliError, Result};
use directories::ProjectDirs;
use hdplot::core::render::figure::ImageFormat;
use hdplot::core::render::style::LegendPosition;
use hdplot::workflows::plot::{ClusterSelection, PlotType};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileExtractionConfig {
    pub min_cluster_size: Option<f64>,
    pub pose_extension: Option<String>,
    pub parallel: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePlotConfig {
    #[serde(rename = "type")]
    pub plot_type: Option<PlotType>,
    pub modus: Option<ClusterSelection>,
    pub include_haddock_score: Option<bool>,
    pub plot_single: Option<bool>,
    pub show_n: Option<bool>,
    pub figsize: Option<[f64; 2]>,
    pub legend_labels: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileOutputConfig {
    pub filename: Option<PathBuf>,
    pub format: Option<ImageFormat>,
    pub dpi: Option<u32>,
}

/// Colors stay strings here; they are parsed while merging.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileStyleConfig {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub palette: Option<String>,
    pub point_size: Option<f64>,
    pub point_alpha: Option<f64>,
    pub jitter: Option<bool>,
    pub dodge: Option<bool>,
    pub box_color: Option<String>,
    pub notch: Option<bool>,
    pub show_fliers: Option<bool>,
    pub legend_position: Option<LegendPosition>,
    pub legend_frame: Option<bool>,
    pub jitter_seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub extraction: Option<FileExtractionConfig>,
    pub plot: Option<FilePlotConfig>,
    pub output: Option<FileOutputConfig>,
    pub style: Option<FileStyleConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads `explicit`, or the user configuration file when it exists, or nothing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match user_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => {
                debug!("No configuration file found, using built-in defaults.");
                Ok(Self::default())
            }
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("edu", "caltech", "hdplot").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_is_parsed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r##"
            [extraction]
            min-cluster-size = 0.05
            pose-extension = ".pdb"
            parallel = false

            [plot]
            type = "multi"
            modus = "all"
            include-haddock-score = true
            show-n = false
            figsize = [8.0, 4.0]
            legend-labels = ["apo", "holo"]

            [output]
            filename = "figures/comparison"
            format = "svg"
            dpi = 300

            [style]
            font-family = "DejaVu Sans"
            palette = "dark"
            box-color = "#eeeeee"
            legend-position = "lower-right"
            jitter-seed = 42
            "##,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let extraction = config.extraction.unwrap();
        assert_eq!(extraction.min_cluster_size, Some(0.05));
        assert_eq!(extraction.parallel, Some(false));

        let plot = config.plot.unwrap();
        assert_eq!(plot.plot_type, Some(PlotType::Multi));
        assert_eq!(plot.modus, Some(ClusterSelection::All));
        assert_eq!(plot.figsize, Some([8.0, 4.0]));
        assert_eq!(plot.plot_single, None);

        let output = config.output.unwrap();
        assert_eq!(output.format, Some(ImageFormat::Svg));
        assert_eq!(output.dpi, Some(300));

        let style = config.style.unwrap();
        assert_eq!(style.legend_position, Some(LegendPosition::LowerRight));
        assert_eq!(style.box_color.as_deref(), Some("#eeeeee"));
        assert_eq!(style.jitter_seed, Some(42));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[plot]\nlegend-columns = 2\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn unknown_plot_type_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[plot]\ntype = \"double\"\n").unwrap();
        assert!(FileConfig::from_file(&path).is_err());
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = tempdir().unwrap();
        let result = FileConfig::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
