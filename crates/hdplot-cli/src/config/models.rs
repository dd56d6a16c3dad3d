use hdplot::engine::config::ExtractConfig;
use hdplot::workflows::plot::PlotOptions;
use std::path::PathBuf;

pub struct ExtractAppConfig {
    pub paths: Vec<PathBuf>,
    pub extract: ExtractConfig,
    /// CSV destination; standard output when `None`.
    pub output: Option<PathBuf>,
}

pub struct PlotAppConfig {
    pub paths: Vec<PathBuf>,
    pub extract: ExtractConfig,
    pub options: PlotOptions,
}
