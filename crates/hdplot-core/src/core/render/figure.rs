use crate::core::stats::BoxStats;
use crate::engine::error::EngineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    #[default]
    Png,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ImageFormat {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ImageFormat::Png),
            "svg" => Ok(ImageFormat::Svg),
            _ => Err(EngineError::InvalidMode {
                kind: "image format",
                value: s.to_string(),
                allowed: "png, svg",
            }),
        }
    }
}

/// Values of one group for one variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Index into the figure-wide group list; selects the palette color.
    pub group: usize,
    pub values: Vec<f64>,
    pub stats: Option<BoxStats>,
}

impl Series {
    pub fn new(group: usize, values: Vec<f64>) -> Self {
        let stats = BoxStats::from_values(&values);
        Self {
            group,
            values,
            stats,
        }
    }
}

/// One x-axis position of a panel: a variable with one series per group.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub variable: String,
    pub tick: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub y_label: String,
    pub categories: Vec<Category>,
}

impl Panel {
    /// Finite value range over every series of the panel.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.categories
            .iter()
            .flat_map(|c| c.series.iter())
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    pub fn group_count(&self) -> usize {
        self.categories
            .iter()
            .map(|c| c.series.len())
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub group: usize,
    pub label: String,
}

/// Energetics panel on the left, buried surface area on the right, sharing one legend.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    pub energetics: Panel,
    pub surface: Panel,
    pub legend: Vec<LegendEntry>,
}

/// Everything a [`ChartRenderer`](super::ChartRenderer) needs to write one image file.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub output: PathBuf,
    pub format: ImageFormat,
    pub size_inches: (f64, f64),
    pub dpi: u32,
    /// Total number of groups; the palette is sampled with this many colors.
    pub group_count: usize,
    pub rows: Vec<PanelRow>,
}

impl Figure {
    pub fn pixel_size(&self) -> (u32, u32) {
        let to_px = |inches: f64| (inches * self.dpi as f64).round().max(1.0) as u32;
        (to_px(self.size_inches.0), to_px(self.size_inches.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(values: &[&[f64]]) -> Panel {
        Panel {
            y_label: "Energetics [a.u.]".into(),
            categories: vec![Category {
                variable: "Evdw".into(),
                tick: "VdW".into(),
                series: values
                    .iter()
                    .enumerate()
                    .map(|(g, v)| Series::new(g, v.to_vec()))
                    .collect(),
            }],
        }
    }

    #[test]
    fn format_parsing_is_case_insensitive() {
        assert_eq!("PNG".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert_eq!("svg".parse::<ImageFormat>().unwrap(), ImageFormat::Svg);
        assert!(matches!(
            "pdf".parse::<ImageFormat>(),
            Err(EngineError::InvalidMode { kind: "image format", .. })
        ));
        assert_eq!(ImageFormat::Svg.to_string(), "svg");
    }

    #[test]
    fn pixel_size_scales_with_dpi() {
        let figure = Figure {
            output: PathBuf::from("image.png"),
            format: ImageFormat::Png,
            size_inches: (7.0, 5.0),
            dpi: 100,
            group_count: 2,
            rows: Vec::new(),
        };
        assert_eq!(figure.pixel_size(), (700, 500));
    }

    #[test]
    fn value_range_skips_non_finite_values() {
        let p = panel(&[&[1.0, f64::NAN], &[-3.0, 2.5]]);
        assert_eq!(p.value_range(), Some((-3.0, 2.5)));
        assert_eq!(p.group_count(), 2);
        assert_eq!(panel(&[&[f64::NAN]]).value_range(), None);
    }

    #[test]
    fn series_computes_box_stats() {
        let series = Series::new(0, vec![1.0, 2.0, 3.0]);
        assert_eq!(series.stats.map(|s| s.median), Some(2.0));
        assert!(Series::new(0, Vec::new()).stats.is_none());
    }
}
