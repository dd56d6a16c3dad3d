use crate::utils::parser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "hdplot CLI - Extract cluster statistics from HADDOCK docking runs and plot their energetics.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel extraction.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract the statistics of every sufficiently populated cluster into one CSV table.
    Extract(ExtractArgs),
    /// Extract cluster statistics and draw box-and-strip plots of their energetics.
    Plot(PlotArgs),
    /// Download and unpack a packed docking run.
    Fetch(FetchArgs),
}

/// Inputs shared by every command that runs an extraction.
#[derive(Args, Debug, Clone)]
pub struct ExtractionArgs {
    /// Root directories of HADDOCK docking runs.
    #[arg(required = true, num_args = 1.., value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Fraction of the model count a cluster population has to exceed to be kept.
    #[arg(short = 'm', long, value_name = "FRACTION")]
    pub min_cluster_size: Option<f64>,

    /// Path to a configuration file in TOML format.
    /// Defaults to `config.toml` in the user configuration directory, if present.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S extraction.min-cluster-size=0.2
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `extract` subcommand.
#[derive(Args, Debug)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub extraction: ExtractionArgs,

    /// Write the table to this CSV file instead of standard output.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `plot` subcommand.
#[derive(Args, Debug)]
pub struct PlotArgs {
    #[command(flatten)]
    pub extraction: ExtractionArgs,

    /// One figure per docking run (`single`) or one comparison figure (`multi`).
    #[arg(long = "type", value_name = "single|multi")]
    pub plot_type: Option<String>,

    /// Clusters shown per run in a comparison figure.
    #[arg(long, value_name = "top|all")]
    pub modus: Option<String>,

    /// Add the HADDOCK score to the energetics panel.
    #[arg(long)]
    pub include_haddock_score: bool,

    /// Draw every cluster in its own panel row.
    #[arg(long)]
    pub plot_single: bool,

    /// Leave the structure count out of the legend labels.
    #[arg(long)]
    pub no_n: bool,

    /// Replace the generated legend labels, one per plotted group.
    #[arg(long = "legend-label", value_name = "LABEL")]
    pub legend_labels: Vec<String>,

    /// Output file name without extension.
    #[arg(short, long, value_name = "FILENAME")]
    pub output: Option<PathBuf>,

    /// Image format of the written figures.
    #[arg(long, value_name = "png|svg")]
    pub format: Option<String>,

    /// Resolution in dots per inch.
    #[arg(long, value_name = "N")]
    pub dpi: Option<u32>,

    /// Figure size in inches.
    #[arg(long, value_name = "W,H", value_parser = parser::parse_figsize)]
    pub figsize: Option<(f64, f64)>,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Location of the archive; `.tgz` is appended unless the URL already names an archive.
    #[arg(required = true, value_name = "URL")]
    pub url: String,

    /// Directory the archive is unpacked into.
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub dest: PathBuf,

    /// Keep the downloaded archive after unpacking it.
    #[arg(long)]
    pub keep_archive: bool,
}
