use hdplot::core::render::figure::ImageFormat;
use hdplot::core::render::style::StyleConfig;
use hdplot::engine::config::{DEFAULT_MIN_CLUSTER_SIZE, DEFAULT_POSE_EXTENSION};
use hdplot::workflows::plot::{ClusterSelection, DEFAULT_DPI, DEFAULT_FILENAME, PlotType};
use std::path::PathBuf;

pub struct DefaultsConfig {
    pub min_cluster_size: f64,
    pub pose_extension: String,
    pub parallel: bool,
    pub plot_type: PlotType,
    pub modus: ClusterSelection,
    pub include_haddock_score: bool,
    pub plot_single: bool,
    pub show_n: bool,
    pub filename: PathBuf,
    pub format: ImageFormat,
    pub dpi: u32,
    pub style: StyleConfig,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
            pose_extension: DEFAULT_POSE_EXTENSION.to_string(),
            parallel: true,
            plot_type: PlotType::Single,
            modus: ClusterSelection::Top,
            include_haddock_score: false,
            plot_single: false,
            show_n: true,
            filename: PathBuf::from(DEFAULT_FILENAME),
            format: ImageFormat::Png,
            dpi: DEFAULT_DPI,
            style: StyleConfig::default(),
        }
    }
}
