use crate::core::columns;
use crate::core::models::cluster::short_cluster_name;
use crate::core::models::collection::ClusterStats;
use crate::core::models::table::ResultTable;
use crate::core::render::ChartRenderer;
use crate::core::render::figure::{Category, Figure, ImageFormat, LegendEntry, Panel, PanelRow, Series};
use crate::core::render::style::StyleConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, instrument, warn};

pub const DEFAULT_FILENAME: &str = "image";
pub const DEFAULT_DPI: u32 = 100;

const ENERGETICS_LABEL: &str = "Energetics [a.u.]";
const SURFACE_LABEL: &str = "Buried Surface Area [Å]";
const PANEL_WIDTH_INCHES: f64 = 3.5;
const PANEL_HEIGHT_INCHES: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotType {
    /// One figure per docking run.
    #[default]
    Single,
    /// One figure comparing all docking runs.
    Multi,
}

impl FromStr for PlotType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            _ => Err(EngineError::InvalidMode {
                kind: "plot type",
                value: s.to_string(),
                allowed: "single, multi",
            }),
        }
    }
}

impl fmt::Display for PlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Single => "single",
            Self::Multi => "multi",
        })
    }
}

/// Which clusters of each run a comparison figure shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClusterSelection {
    /// The cluster with the most structures.
    #[default]
    Top,
    All,
}

impl FromStr for ClusterSelection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "all" => Ok(Self::All),
            _ => Err(EngineError::InvalidMode {
                kind: "modus",
                value: s.to_string(),
                allowed: "top, all",
            }),
        }
    }
}

impl fmt::Display for ClusterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Top => "top",
            Self::All => "all",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    pub plot_type: PlotType,
    /// Only used by [`PlotType::Multi`].
    pub selection: ClusterSelection,
    pub include_haddock_score: bool,
    /// Only used by [`PlotType::Single`]: one panel row per cluster.
    pub plot_single: bool,
    /// Width and height in inches; derived from the group count when `None`.
    pub figsize: Option<(f64, f64)>,
    pub legend_labels: Option<Vec<String>>,
    pub show_n: bool,
    /// Output path without extension.
    pub filename: PathBuf,
    pub format: ImageFormat,
    pub dpi: u32,
    pub style: StyleConfig,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            plot_type: PlotType::Single,
            selection: ClusterSelection::Top,
            include_haddock_score: false,
            plot_single: false,
            figsize: None,
            legend_labels: None,
            show_n: true,
            filename: PathBuf::from(DEFAULT_FILENAME),
            format: ImageFormat::Png,
            dpi: DEFAULT_DPI,
            style: StyleConfig::default(),
        }
    }
}

/// Plotted columns and the tick labels of the energetics panel.
pub fn value_columns(include_haddock_score: bool) -> (Vec<&'static str>, Vec<&'static str>) {
    if include_haddock_score {
        (
            vec![
                columns::EVDW,
                columns::EELEC,
                columns::BSA,
                columns::EDESOLV,
                columns::HADDOCK_SCORE,
            ],
            vec!["VdW", "ES", "DS", "HS"],
        )
    } else {
        (
            vec![columns::EVDW, columns::EELEC, columns::BSA, columns::EDESOLV],
            vec!["VdW", "ES", "DS"],
        )
    }
}

/// One value of the long-form table.
#[derive(Debug, Clone, PartialEq)]
pub struct MeltedRow<'a> {
    pub docking: Option<&'a str>,
    pub cluster: &'a str,
    pub structure: &'a str,
    pub variable: &'static str,
    pub value: f64,
}

/// Turns `table` into one row per (record, variable), variables varying slowest.
pub fn melt<'a>(
    docking: Option<&'a str>,
    table: &'a ResultTable,
    variables: &[&'static str],
) -> Result<Vec<MeltedRow<'a>>, EngineError> {
    let mut rows = Vec::with_capacity(table.len() * variables.len());
    for &variable in variables {
        if table.numeric_column(variable).is_none() {
            return Err(EngineError::MissingColumn {
                column: variable.to_string(),
            });
        }
        for record in table.records() {
            rows.push(MeltedRow {
                docking,
                cluster: &record.cluster,
                structure: &record.structure,
                variable,
                value: table.value(record, variable).unwrap_or(f64::NAN),
            });
        }
    }
    Ok(rows)
}

/// The cluster with the most records; ties go to the one seen first.
pub fn select_top_cluster(table: &ResultTable) -> Option<&str> {
    table
        .cluster_sizes()
        .into_iter()
        .fold(None::<(&str, usize)>, |best, (id, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((id, n)),
        })
        .map(|(id, _)| id)
}

/// A plotted hue: one cluster, optionally tied to its docking run.
#[derive(Debug, Clone)]
struct Group<'a> {
    docking: Option<&'a str>,
    cluster: &'a str,
    size: usize,
}

impl Group<'_> {
    fn label(&self) -> String {
        let cluster = short_cluster_name(self.cluster);
        match self.docking {
            Some(docking) => {
                let name = docking.rsplit('/').next().unwrap_or(docking);
                format!("{}: Cluster {}", name, cluster)
            }
            None => format!("Cluster {}", cluster),
        }
    }

    fn matches(&self, row: &MeltedRow<'_>) -> bool {
        row.cluster == self.cluster && row.docking == self.docking
    }
}

fn n_suffix(n: usize) -> String {
    format!(" (n = {})", n)
}

/// Generated group labels, replaced by `user` when it has one label per group.
fn legend_labels(groups: &[Group<'_>], user: Option<&[String]>, show_n: bool) -> Vec<String> {
    let base: Vec<String> = match user {
        Some(user) if user.len() == groups.len() => {
            for (group, label) in groups.iter().zip(user) {
                info!("Replacing {} with {}", group.label(), label);
            }
            user.to_vec()
        }
        Some(user) => {
            warn!(
                provided = user.len(),
                "Provided legend labels have the wrong length. Expecting {} entries!",
                groups.len()
            );
            groups.iter().map(Group::label).collect()
        }
        None => groups.iter().map(Group::label).collect(),
    };

    base.into_iter()
        .zip(groups)
        .map(|(label, group)| {
            if show_n {
                label + &n_suffix(group.size)
            } else {
                label
            }
        })
        .collect()
}

fn build_row(
    rows: &[MeltedRow<'_>],
    groups: &[(usize, &Group<'_>)],
    variables: &[&'static str],
    ticks: &[&'static str],
    legend: Vec<LegendEntry>,
) -> PanelRow {
    let category = |variable: &'static str, tick: &str| Category {
        variable: variable.to_string(),
        tick: tick.to_string(),
        series: groups
            .iter()
            .map(|(idx, group)| {
                let values = rows
                    .iter()
                    .filter(|r| r.variable == variable && group.matches(r))
                    .map(|r| r.value)
                    .collect();
                Series::new(*idx, values)
            })
            .collect(),
    };

    let energetics = variables
        .iter()
        .filter(|v| **v != columns::BSA)
        .zip(ticks)
        .map(|(v, t)| category(*v, *t))
        .collect();

    PanelRow {
        energetics: Panel {
            y_label: ENERGETICS_LABEL.to_string(),
            categories: energetics,
        },
        surface: Panel {
            y_label: SURFACE_LABEL.to_string(),
            categories: vec![category(columns::BSA, columns::BSA)],
        },
        legend,
    }
}

/// `<filename>.<ext>`, or for a per-run figure `<run key>_<file name>.<ext>` inside the
/// directory of `filename`.
fn output_path(options: &PlotOptions, run_key: Option<&str>) -> PathBuf {
    let ext = options.format.extension();
    let Some(key) = run_key else {
        return PathBuf::from(format!("{}.{}", options.filename.to_string_lossy(), ext));
    };
    let name = options
        .filename
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    let file = format!("{}_{}.{}", key.trim_end_matches('/'), name, ext);
    match options.filename.parent() {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    }
}

/// Builds the figures for `stats` without drawing anything.
///
/// Runs without a retained cluster are skipped with a warning.
pub fn plan_figures(stats: &ClusterStats, options: &PlotOptions) -> Result<Vec<Figure>, EngineError> {
    let (variables, ticks) = value_columns(options.include_haddock_score);
    match options.plot_type {
        PlotType::Single => plan_single(stats, options, &variables, &ticks),
        PlotType::Multi => plan_multi(stats, options, &variables, &ticks)
            .map(|figure| figure.into_iter().collect()),
    }
}

fn plan_single(
    stats: &ClusterStats,
    options: &PlotOptions,
    variables: &[&'static str],
    ticks: &[&'static str],
) -> Result<Vec<Figure>, EngineError> {
    let mut figures = Vec::new();

    for (key, table) in stats.iter() {
        let Some(table) = table.filter(|t| !t.is_empty()) else {
            warn!(key = %key, "No cluster passed the filter; skipping figure.");
            continue;
        };

        let rows = melt(None, table, variables)?;
        let groups: Vec<Group<'_>> = table
            .cluster_sizes()
            .into_iter()
            .map(|(cluster, size)| Group {
                docking: None,
                cluster,
                size,
            })
            .collect();
        let labels = legend_labels(&groups, options.legend_labels.as_deref(), options.show_n);
        let indexed: Vec<(usize, &Group<'_>)> = groups.iter().enumerate().collect();

        let (panel_rows, default_size) = if options.plot_single {
            let panel_rows = indexed
                .iter()
                .zip(&labels)
                .map(|(&(g, group), label)| {
                    let legend = vec![LegendEntry {
                        group: g,
                        label: label.clone(),
                    }];
                    build_row(&rows, &[(g, group)], variables, ticks, legend)
                })
                .collect();
            let size = (PANEL_WIDTH_INCHES, PANEL_HEIGHT_INCHES * groups.len() as f64);
            (panel_rows, size)
        } else {
            let legend = labels
                .iter()
                .enumerate()
                .map(|(group, label)| LegendEntry {
                    group,
                    label: label.clone(),
                })
                .collect();
            let row = build_row(&rows, &indexed, variables, ticks, legend);
            let size = (PANEL_WIDTH_INCHES * groups.len() as f64, PANEL_HEIGHT_INCHES);
            (vec![row], size)
        };

        figures.push(Figure {
            output: output_path(options, Some(key)),
            format: options.format,
            size_inches: options.figsize.unwrap_or(default_size),
            dpi: options.dpi,
            group_count: groups.len(),
            rows: panel_rows,
        });
    }

    Ok(figures)
}

fn plan_multi(
    stats: &ClusterStats,
    options: &PlotOptions,
    variables: &[&'static str],
    ticks: &[&'static str],
) -> Result<Option<Figure>, EngineError> {
    let mut rows = Vec::new();
    let mut groups: Vec<Group<'_>> = Vec::new();

    for (key, table) in stats.iter() {
        let Some(table) = table.filter(|t| !t.is_empty()) else {
            warn!(key = %key, "No cluster passed the filter; leaving the run out of the comparison.");
            continue;
        };

        let sizes = table.cluster_sizes();
        let selected: Vec<(&str, usize)> = match options.selection {
            ClusterSelection::All => sizes,
            ClusterSelection::Top => {
                let top = select_top_cluster(table);
                sizes.into_iter().filter(|(id, _)| Some(*id) == top).collect()
            }
        };

        rows.extend(
            melt(Some(key), table, variables)?
                .into_iter()
                .filter(|r| selected.iter().any(|(id, _)| *id == r.cluster)),
        );
        groups.extend(selected.into_iter().map(|(cluster, size)| Group {
            docking: Some(key),
            cluster,
            size,
        }));
    }

    if groups.is_empty() {
        warn!("No docking run has a retained cluster; nothing to plot.");
        return Ok(None);
    }

    let labels = legend_labels(&groups, options.legend_labels.as_deref(), options.show_n);
    let legend = labels
        .into_iter()
        .enumerate()
        .map(|(group, label)| LegendEntry { group, label })
        .collect();
    let indexed: Vec<(usize, &Group<'_>)> = groups.iter().enumerate().collect();
    let row = build_row(&rows, &indexed, variables, ticks, legend);

    Ok(Some(Figure {
        output: output_path(options, None),
        format: options.format,
        size_inches: options
            .figsize
            .unwrap_or((PANEL_WIDTH_INCHES * groups.len() as f64, PANEL_HEIGHT_INCHES)),
        dpi: options.dpi,
        group_count: groups.len(),
        rows: vec![row],
    }))
}

/// Plans and renders the figures for `stats`, returning the written paths.
#[instrument(skip_all, name = "plot_workflow", fields(plot_type = %options.plot_type))]
pub fn run(
    stats: &ClusterStats,
    options: &PlotOptions,
    renderer: &dyn ChartRenderer,
    reporter: &ProgressReporter,
) -> Result<Vec<PathBuf>, EngineError> {
    reporter.report(Progress::PhaseStart { name: "Plotting" });

    let figures = plan_figures(stats, options)?;
    let one_cluster_per_row = options.plot_type == PlotType::Single && options.plot_single;
    let style = options.style.resolved(one_cluster_per_row);

    reporter.report(Progress::TaskStart {
        total_steps: figures.len() as u64,
    });
    let mut written = Vec::with_capacity(figures.len());
    for figure in &figures {
        renderer.render(figure, &style)?;
        info!(path = %figure.output.display(), "Figure written.");
        reporter.report(Progress::FigureWritten {
            path: figure.output.clone(),
        });
        reporter.report(Progress::TaskIncrement);
        written.push(figure.output.clone());
    }
    reporter.report(Progress::TaskFinish);

    reporter.report(Progress::PhaseFinish);
    Ok(written)
}
