use crate::cli::ExtractArgs;
use crate::config::builder;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use hdplot::core::columns;
use hdplot::core::models::collection::ClusterStats;
use hdplot::engine::progress::ProgressReporter;
use hdplot::workflows;
use std::fs::File;
use std::io::{self, Write};
use tracing::info;

const DOCKING_COLUMN: &str = "docking";

pub async fn run(args: ExtractArgs) -> Result<()> {
    let app = builder::build_extract_config(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the core extraction workflow...");
    let stats = tokio::task::block_in_place(|| {
        workflows::extract::run(&app.paths, &app.extract, &reporter)
    })?;

    match &app.output {
        Some(path) => {
            let rows = write_csv(&stats, File::create(path)?)?;
            for line in summary_lines(&stats) {
                println!("{}", line);
            }
            println!("✓ {} row(s) written to: {}", rows, path.display());
        }
        None => {
            for line in summary_lines(&stats) {
                eprintln!("{}", line);
            }
            let stdout = io::stdout();
            write_csv(&stats, stdout.lock())?;
        }
    }
    Ok(())
}

/// Column order of the combined table: `docking`, then every table column in first-seen order.
fn header(stats: &ClusterStats) -> Vec<String> {
    let mut header = vec![DOCKING_COLUMN.to_string()];
    for (_, table) in stats.iter() {
        let Some(table) = table else { continue };
        for column in table.columns() {
            if !header.iter().any(|c| c == column) {
                header.push(column.to_string());
            }
        }
    }
    header
}

/// Writes every extracted record as one CSV row; returns the number of rows.
///
/// Runs without a retained cluster contribute no rows. Columns a table lacks are left empty.
pub fn write_csv<W: Write>(stats: &ClusterStats, writer: W) -> Result<usize> {
    let header = header(stats);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&header)?;

    let mut rows = 0;
    for (key, table) in stats.iter() {
        let Some(table) = table else { continue };
        for record in table.records() {
            let fields = header.iter().map(|column| match column.as_str() {
                DOCKING_COLUMN => key.to_string(),
                columns::CLUSTER => record.cluster.clone(),
                columns::STRUCTURE => record.structure.clone(),
                other => table
                    .value(record, other)
                    .filter(|v| !v.is_nan())
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
            });
            csv_writer.write_record(fields)?;
            rows += 1;
        }
    }
    csv_writer.flush()?;
    Ok(rows)
}

pub fn summary_lines(stats: &ClusterStats) -> Vec<String> {
    let mut lines: Vec<String> = stats
        .iter()
        .map(|(key, table)| match table {
            Some(table) => format!(
                "{}: {} cluster(s), {} structure(s)",
                key,
                table.clusters().len(),
                table.len()
            ),
            None => format!("{}: no cluster passed the filter", key),
        })
        .collect();
    lines.extend(
        stats
            .skipped()
            .iter()
            .map(|s| format!("{}: skipped, {} does not exist", s.root.display(), s.water_dir.display())),
    );
    lines
}
