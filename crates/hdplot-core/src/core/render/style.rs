use crate::engine::error::EngineError;
use plotters::style::{BLACK, Color, HSLColor, RGBColor, WHITE};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

const HSL_START_HUE: f64 = 0.01;
const HSL_SATURATION: f64 = 0.9;
const HSL_LIGHTNESS: f64 = 0.65;

/// Colors assigned to the plotted groups, in group order.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Palette {
    /// Evenly spaced HSL hues at fixed saturation and lightness. Not perceptually uniform
    /// like HUSL, which is still accepted as a name for it.
    #[default]
    Hsl,
    /// Every group black.
    Dark,
    /// Explicit colors, cycled when there are more groups than colors.
    Colors(Vec<RGBColor>),
}

impl Palette {
    pub fn colors(&self, n: usize) -> Vec<RGBColor> {
        match self {
            Palette::Hsl => (0..n)
                .map(|i| {
                    let hue = (HSL_START_HUE + i as f64 / n as f64).fract();
                    let (r, g, b) = HSLColor(hue, HSL_SATURATION, HSL_LIGHTNESS)
                        .to_backend_color()
                        .rgb;
                    RGBColor(r, g, b)
                })
                .collect(),
            Palette::Dark => vec![BLACK; n],
            Palette::Colors(colors) if colors.is_empty() => vec![BLACK; n],
            Palette::Colors(colors) => colors.iter().cycle().take(n).copied().collect(),
        }
    }
}

impl FromStr for Palette {
    type Err = EngineError;

    /// Accepts `hsl` (or `husl`), `dark` (or `dark:k`) and comma-separated color lists.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hsl" | "husl" => Ok(Palette::Hsl),
            "dark" | "dark:k" => Ok(Palette::Dark),
            _ => s
                .split(',')
                .map(parse_color)
                .collect::<Result<Vec<_>, _>>()
                .map(Palette::Colors),
        }
    }
}

/// Parses `#rrggbb`, `rrggbb`, or the single-letter names `w` and `k`.
pub fn parse_color(s: &str) -> Result<RGBColor, EngineError> {
    let s = s.trim();
    let invalid = || EngineError::InvalidMode {
        kind: "color",
        value: s.to_string(),
        allowed: "#rrggbb, w, white, k, black",
    };
    match s.to_ascii_lowercase().as_str() {
        "w" | "white" => return Ok(WHITE),
        "k" | "black" => return Ok(BLACK),
        _ => {}
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    #[default]
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl FromStr for LegendPosition {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "-").as_str() {
            "upper-left" => Ok(Self::UpperLeft),
            "upper-right" => Ok(Self::UpperRight),
            "lower-left" => Ok(Self::LowerLeft),
            "lower-right" => Ok(Self::LowerRight),
            _ => Err(EngineError::InvalidMode {
                kind: "legend position",
                value: s.to_string(),
                allowed: "upper-left, upper-right, lower-left, lower-right",
            }),
        }
    }
}

/// Appearance of a rendered figure.
///
/// Passed explicitly to the renderer; nothing here is process-wide state.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleConfig {
    pub font_family: String,
    pub font_size: f64,
    /// `None` picks [`Palette::Hsl`], or [`Palette::Dark`] for one-cluster-per-row figures.
    pub palette: Option<Palette>,
    /// Marker diameter in points.
    pub point_size: f64,
    pub point_alpha: f64,
    pub jitter: bool,
    pub dodge: bool,
    pub box_color: RGBColor,
    pub notch: bool,
    pub show_fliers: bool,
    pub legend_position: LegendPosition,
    pub legend_frame: bool,
    /// Seed of the strip-plot jitter, so repeated renders are identical.
    pub jitter_seed: u64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            font_size: 12.0,
            palette: None,
            point_size: 4.0,
            point_alpha: 0.25,
            jitter: true,
            dodge: true,
            box_color: WHITE,
            notch: true,
            show_fliers: false,
            legend_position: LegendPosition::UpperLeft,
            legend_frame: false,
            jitter_seed: 0,
        }
    }
}

impl StyleConfig {
    /// Copy of this style with the palette fixed for the given figure kind.
    pub fn resolved(&self, one_cluster_per_row: bool) -> Self {
        let palette = self.palette.clone().unwrap_or(if one_cluster_per_row {
            Palette::Dark
        } else {
            Palette::Hsl
        });
        Self {
            palette: Some(palette),
            ..self.clone()
        }
    }

    pub fn palette(&self) -> Palette {
        self.palette.clone().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsl_palette_has_distinct_colors() {
        let colors = Palette::Hsl.colors(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn dark_palette_is_black() {
        assert_eq!(Palette::Dark.colors(3), vec![BLACK; 3]);
    }

    #[test]
    fn explicit_colors_cycle() {
        let palette: Palette = "#ff0000,00ff00".parse().unwrap();
        assert_eq!(
            palette.colors(3),
            vec![RGBColor(255, 0, 0), RGBColor(0, 255, 0), RGBColor(255, 0, 0)]
        );
    }

    #[test]
    fn palette_names_are_case_insensitive() {
        assert_eq!("HUSL".parse::<Palette>().unwrap(), Palette::Hsl);
        assert_eq!("hsl".parse::<Palette>().unwrap(), Palette::Hsl);
        assert_eq!("dark:k".parse::<Palette>().unwrap(), Palette::Dark);
    }

    #[test]
    fn invalid_color_is_rejected() {
        assert!(matches!(
            parse_color("#12345"),
            Err(EngineError::InvalidMode { kind: "color", .. })
        ));
        assert!(parse_color("zzzzzz").is_err());
        assert_eq!(parse_color("w").unwrap(), WHITE);
        assert_eq!(parse_color(" #0A0b0C ").unwrap(), RGBColor(10, 11, 12));
    }

    #[test]
    fn legend_position_parses_spaces_and_dashes() {
        assert_eq!(
            "upper left".parse::<LegendPosition>().unwrap(),
            LegendPosition::UpperLeft
        );
        assert_eq!(
            "Lower-Right".parse::<LegendPosition>().unwrap(),
            LegendPosition::LowerRight
        );
        assert!("center".parse::<LegendPosition>().is_err());
    }

    #[test]
    fn resolved_palette_depends_on_layout() {
        let style = StyleConfig::default();
        assert_eq!(style.resolved(true).palette, Some(Palette::Dark));
        assert_eq!(style.resolved(false).palette, Some(Palette::Hsl));

        let custom = StyleConfig {
            palette: Some(Palette::Colors(vec![WHITE])),
            ..StyleConfig::default()
        };
        assert_eq!(custom.resolved(true).palette, Some(Palette::Colors(vec![WHITE])));
    }

    #[test]
    fn default_style_matches_box_and_strip_defaults() {
        let style = StyleConfig::default();
        assert!(style.notch);
        assert!(!style.show_fliers);
        assert_eq!(style.box_color, WHITE);
        assert_eq!(style.point_size, 4.0);
        assert_eq!(style.point_alpha, 0.25);
        assert!(style.jitter && style.dodge);
        assert!(!style.legend_frame);
    }
}
