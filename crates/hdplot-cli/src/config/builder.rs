use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileExtractionConfig, FileStyleConfig};
use super::models::{ExtractAppConfig, PlotAppConfig};
use crate::cli::{ExtractArgs, ExtractionArgs, PlotArgs};
use crate::error::{CliError, Result};
use crate::utils::parser::{self, ParseError};
use hdplot::core::render::style::{Palette, StyleConfig, parse_color};
use hdplot::engine::config::{ExtractConfig, ExtractConfigBuilder};
use hdplot::workflows::plot::PlotOptions;
use std::path::PathBuf;

pub fn build_extract_config(args: &ExtractArgs) -> Result<ExtractAppConfig> {
    let file_config = FileConfig::load(args.extraction.config.as_deref())?;
    merge_extract_config(args, file_config)
}

pub fn build_plot_config(args: &PlotArgs) -> Result<PlotAppConfig> {
    let file_config = FileConfig::load(args.extraction.config.as_deref())?;
    merge_plot_config(args, file_config)
}

pub fn merge_extract_config(args: &ExtractArgs, file_config: FileConfig) -> Result<ExtractAppConfig> {
    let mut file_config = apply_set_values(file_config, &args.extraction.set_values)?;
    let extract = merge_extraction(&args.extraction, file_config.extraction.take())?;

    Ok(ExtractAppConfig {
        paths: args.extraction.paths.clone(),
        extract,
        output: args.output.clone(),
    })
}

pub fn merge_plot_config(args: &PlotArgs, file_config: FileConfig) -> Result<PlotAppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = apply_set_values(file_config, &args.extraction.set_values)?;

    let extract = merge_extraction(&args.extraction, file_config.extraction.take())?;

    let plot_file = file_config.plot.take().unwrap_or_default();
    let output_file = file_config.output.take().unwrap_or_default();
    let style_file = file_config.style.take().unwrap_or_default();

    let plot_type = match &args.plot_type {
        Some(s) => s.parse()?,
        None => plot_file.plot_type.unwrap_or(defaults.plot_type),
    };
    let selection = match &args.modus {
        Some(s) => s.parse()?,
        None => plot_file.modus.unwrap_or(defaults.modus),
    };
    let format = match &args.format {
        Some(s) => s.parse()?,
        None => output_file.format.unwrap_or(defaults.format),
    };

    let include_haddock_score = args.include_haddock_score
        || plot_file
            .include_haddock_score
            .unwrap_or(defaults.include_haddock_score);
    let plot_single = args.plot_single || plot_file.plot_single.unwrap_or(defaults.plot_single);
    let show_n = !args.no_n && plot_file.show_n.unwrap_or(defaults.show_n);

    let legend_labels = if args.legend_labels.is_empty() {
        plot_file.legend_labels
    } else {
        Some(args.legend_labels.clone())
    };

    let figsize = args
        .figsize
        .or(plot_file.figsize.map(|[w, h]| (w, h)));
    if let Some((w, h)) = figsize {
        if !(w > 0.0 && h > 0.0) {
            return Err(CliError::Config(format!(
                "Figure size must be positive, got {}x{}",
                w, h
            )));
        }
    }

    let dpi = args.dpi.or(output_file.dpi).unwrap_or(defaults.dpi);
    if dpi == 0 {
        return Err(CliError::Config("`dpi` must be at least 1".to_string()));
    }

    let filename = args
        .output
        .clone()
        .or(output_file.filename)
        .unwrap_or(defaults.filename);

    let style = merge_style(style_file, defaults.style)?;

    Ok(PlotAppConfig {
        paths: args.extraction.paths.clone(),
        extract,
        options: PlotOptions {
            plot_type,
            selection,
            include_haddock_score,
            plot_single,
            figsize,
            legend_labels,
            show_n,
            filename,
            format,
            dpi,
            style,
        },
    })
}

fn merge_extraction(
    args: &ExtractionArgs,
    file_val: Option<FileExtractionConfig>,
) -> Result<ExtractConfig> {
    let defaults = DefaultsConfig::default();
    let file_val = file_val.unwrap_or_default();

    ExtractConfigBuilder::new()
        .min_cluster_size(
            args.min_cluster_size
                .or(file_val.min_cluster_size)
                .unwrap_or(defaults.min_cluster_size),
        )
        .pose_extension(file_val.pose_extension.unwrap_or(defaults.pose_extension))
        .parallel(file_val.parallel.unwrap_or(defaults.parallel))
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

fn merge_style(file_val: FileStyleConfig, defaults: StyleConfig) -> Result<StyleConfig> {
    let palette = file_val
        .palette
        .as_deref()
        .map(|s| s.parse::<Palette>())
        .transpose()?
        .or(defaults.palette);
    let box_color = file_val
        .box_color
        .as_deref()
        .map(parse_color)
        .transpose()?
        .unwrap_or(defaults.box_color);

    let point_alpha = file_val.point_alpha.unwrap_or(defaults.point_alpha);
    if !(0.0..=1.0).contains(&point_alpha) {
        return Err(CliError::Config(format!(
            "`point-alpha` must be in [0, 1], got {}",
            point_alpha
        )));
    }

    Ok(StyleConfig {
        font_family: file_val.font_family.unwrap_or(defaults.font_family),
        font_size: file_val.font_size.unwrap_or(defaults.font_size),
        palette,
        point_size: file_val.point_size.unwrap_or(defaults.point_size),
        point_alpha,
        jitter: file_val.jitter.unwrap_or(defaults.jitter),
        dodge: file_val.dodge.unwrap_or(defaults.dodge),
        box_color,
        notch: file_val.notch.unwrap_or(defaults.notch),
        show_fliers: file_val.show_fliers.unwrap_or(defaults.show_fliers),
        legend_position: file_val.legend_position.unwrap_or(defaults.legend_position),
        legend_frame: file_val.legend_frame.unwrap_or(defaults.legend_frame),
        jitter_seed: file_val.jitter_seed.unwrap_or(defaults.jitter_seed),
    })
}

fn invalid(e: ParseError) -> CliError {
    CliError::Config(e.to_string())
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = parser::parse_key_value(kv_pair).map_err(invalid)?;

        match key {
            "extraction.min-cluster-size" => {
                config
                    .extraction
                    .get_or_insert_with(Default::default)
                    .min_cluster_size = Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "extraction.pose-extension" => {
                config
                    .extraction
                    .get_or_insert_with(Default::default)
                    .pose_extension = Some(value.to_string());
            }
            "extraction.parallel" => {
                config.extraction.get_or_insert_with(Default::default).parallel =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "plot.type" => {
                config.plot.get_or_insert_with(Default::default).plot_type = Some(value.parse()?);
            }
            "plot.modus" => {
                config.plot.get_or_insert_with(Default::default).modus = Some(value.parse()?);
            }
            "plot.include-haddock-score" => {
                config
                    .plot
                    .get_or_insert_with(Default::default)
                    .include_haddock_score = Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "plot.plot-single" => {
                config.plot.get_or_insert_with(Default::default).plot_single =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "plot.show-n" => {
                config.plot.get_or_insert_with(Default::default).show_n =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "plot.figsize" => {
                let (w, h) = parser::parse_figsize(value).map_err(invalid)?;
                config.plot.get_or_insert_with(Default::default).figsize = Some([w, h]);
            }
            "plot.legend-labels" => {
                config.plot.get_or_insert_with(Default::default).legend_labels =
                    Some(value.split(',').map(|s| s.trim().to_string()).collect());
            }
            "output.filename" => {
                config.output.get_or_insert_with(Default::default).filename =
                    Some(PathBuf::from(value));
            }
            "output.format" => {
                config.output.get_or_insert_with(Default::default).format = Some(value.parse()?);
            }
            "output.dpi" => {
                config.output.get_or_insert_with(Default::default).dpi =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.font-family" => {
                config.style.get_or_insert_with(Default::default).font_family =
                    Some(value.to_string());
            }
            "style.font-size" => {
                config.style.get_or_insert_with(Default::default).font_size =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.palette" => {
                config.style.get_or_insert_with(Default::default).palette = Some(value.to_string());
            }
            "style.point-size" => {
                config.style.get_or_insert_with(Default::default).point_size =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.point-alpha" => {
                config.style.get_or_insert_with(Default::default).point_alpha =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.box-color" => {
                config.style.get_or_insert_with(Default::default).box_color =
                    Some(value.to_string());
            }
            "style.notch" => {
                config.style.get_or_insert_with(Default::default).notch =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.show-fliers" => {
                config.style.get_or_insert_with(Default::default).show_fliers =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.legend-position" => {
                config.style.get_or_insert_with(Default::default).legend_position =
                    Some(value.parse()?);
            }
            "style.legend-frame" => {
                config.style.get_or_insert_with(Default::default).legend_frame =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.jitter" => {
                config.style.get_or_insert_with(Default::default).jitter =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.dodge" => {
                config.style.get_or_insert_with(Default::default).dodge =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            "style.jitter-seed" => {
                config.style.get_or_insert_with(Default::default).jitter_seed =
                    Some(parser::parse_value(key, value).map_err(invalid)?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
