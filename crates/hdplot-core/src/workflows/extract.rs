use crate::core::models::collection::{ClusterStats, SkippedRun};
use crate::core::models::run::DockingRun;
use crate::core::models::table::ResultTable;
use crate::engine::assembly::assemble_cluster;
use crate::engine::config::{ConfigError, ExtractConfig};
use crate::engine::error::EngineError;
use crate::engine::population::{load_clusters, retain_populated};
use crate::engine::progress::{Progress, ProgressReporter};
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// What happened to one docking root.
#[derive(Debug, Clone, PartialEq)]
enum RunOutcome {
    Skipped(SkippedRun),
    Extracted {
        key: String,
        table: Option<ResultTable>,
    },
}

/// Extracts the retained-cluster statistics of every docking root in `paths`.
///
/// Roots are processed independently and their results are stored in input order under
/// the sanitized root path. A root without a water-refinement directory is reported and
/// left out; any other failure aborts the whole call and no partial result is returned.
#[instrument(skip_all, name = "extract_workflow")]
pub fn run<I, P>(
    paths: I,
    config: &ExtractConfig,
    reporter: &ProgressReporter,
) -> Result<ClusterStats, EngineError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path> + Sync,
{
    validate(config)?;
    let paths: Vec<P> = paths.into_iter().collect();

    reporter.report(Progress::PhaseStart { name: "Extraction" });
    reporter.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });
    info!(
        runs = paths.len(),
        min_cluster_size = config.min_cluster_size,
        parallel = config.parallel,
        "Starting cluster extraction."
    );

    let outcomes: Vec<RunOutcome> = if config.parallel {
        let results: Vec<Result<RunOutcome, EngineError>> = paths
            .par_iter()
            .map(|path| extract_run(path.as_ref(), config, reporter))
            .collect();
        results.into_iter().collect::<Result<_, _>>()?
    } else {
        paths
            .iter()
            .map(|path| extract_run(path.as_ref(), config, reporter))
            .collect::<Result<_, _>>()?
    };

    reporter.report(Progress::TaskFinish);

    let mut stats = ClusterStats::new();
    for outcome in outcomes {
        match outcome {
            RunOutcome::Skipped(skipped) => stats.record_skip(skipped),
            RunOutcome::Extracted { key, table } => {
                if stats.insert(key.clone(), table).is_some() {
                    warn!(key = %key, "Two docking roots map to the same key; keeping the later one.");
                }
            }
        }
    }

    info!(
        runs = stats.len(),
        skipped = stats.skipped().len(),
        "Cluster extraction finished."
    );
    reporter.report(Progress::PhaseFinish);
    Ok(stats)
}

fn validate(config: &ExtractConfig) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&config.min_cluster_size) {
        return Err(ConfigError::InvalidFraction(config.min_cluster_size));
    }
    if config.pose_extension.is_empty() {
        return Err(ConfigError::EmptyPoseExtension);
    }
    Ok(())
}

fn extract_run(
    root: &Path,
    config: &ExtractConfig,
    reporter: &ProgressReporter,
) -> Result<RunOutcome, EngineError> {
    let outcome = match DockingRun::open(root, &config.pose_extension) {
        Ok(run) => extract_clusters(&run, config, reporter)?,
        Err(EngineError::MissingRunDirectory { path }) => {
            warn!("The directory {} does not exist.", path.display());
            reporter.report(Progress::RunSkipped {
                water_dir: path.clone(),
            });
            RunOutcome::Skipped(SkippedRun {
                root: root.to_path_buf(),
                water_dir: path,
            })
        }
        Err(e) => return Err(e),
    };

    reporter.report(Progress::TaskIncrement);
    Ok(outcome)
}

fn extract_clusters(
    run: &DockingRun,
    config: &ExtractConfig,
    reporter: &ProgressReporter,
) -> Result<RunOutcome, EngineError> {
    let clusters = load_clusters(run)?;
    let listed = clusters.len();
    let retained = retain_populated(clusters, run.model_count(), config.min_cluster_size);
    debug!(
        root = %run.root().display(),
        models = run.model_count(),
        listed,
        retained = retained.len(),
        "Applied population filter."
    );

    let mut table: Option<ResultTable> = None;
    for cluster in &retained {
        let cluster_table = assemble_cluster(run, cluster)?;
        match table.as_mut() {
            Some(existing) => existing.append(cluster_table),
            None => table = Some(cluster_table),
        }
    }

    let key = run.key();
    reporter.report(Progress::RunExtracted {
        key: key.clone(),
        clusters: retained.len(),
        structures: table.as_ref().map_or(0, ResultTable::len),
    });
    if table.is_none() {
        info!(key = %key, "No cluster passed the population filter.");
    }

    Ok(RunOutcome::Extracted { key, table })
}
