use crate::cli::PlotArgs;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use hdplot::core::render::chart::PlottersRenderer;
use hdplot::engine::progress::ProgressReporter;
use hdplot::workflows;
use tracing::{info, warn};

pub async fn run(args: PlotArgs) -> Result<()> {
    let app = builder::build_plot_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let renderer = PlottersRenderer::new();

    println!("Extracting cluster statistics from {} run(s)...", app.paths.len());
    let written = tokio::task::block_in_place(|| {
        let stats = workflows::extract::run(&app.paths, &app.extract, &reporter)?;
        info!("Extraction finished with {} run(s); rendering figures.", stats.len());
        workflows::plot::run(&stats, &app.options, &renderer, &reporter)
    })?;

    if written.is_empty() {
        warn!("Plotting finished without writing a figure.");
        println!("Warning: no docking run had a cluster to plot.");
    } else {
        for path in &written {
            println!("✓ Figure written to: {}", path.display());
        }
    }
    Ok(())
}
