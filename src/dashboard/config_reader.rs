use crate::args::Args;
use crate::dashboard::gate::DEFAULT_SECRET;
use crate::dashboard::*;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_WORKBOOK: &str = "dados.xlsx";
pub const DEFAULT_CHART_WIDTH: u32 = 900;
pub const DEFAULT_RADAR_HEIGHT: u32 = 600;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "workbookPath")]
    pub workbook_path: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "accessSecret")]
    pub access_secret: Option<String>,
    pub axes: Option<Vec<String>>,
    #[serde(rename = "exportPng")]
    pub export_png: Option<bool>,
    #[serde(rename = "exportPdf")]
    pub export_pdf: Option<bool>,
    #[serde(rename = "chartWidth")]
    pub chart_width: Option<u32>,
    #[serde(rename = "radarHeight")]
    pub radar_height: Option<u32>,
}

/// The settings of a run, once the arguments and the configuration file are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub workbook: PathBuf,
    pub output_dir: PathBuf,
    pub secret: String,
    pub password: Option<String>,
    pub axes: Vec<String>,
    pub list_only: bool,
    pub export_png: bool,
    pub export_pdf: bool,
    pub chart_width: u32,
    pub radar_height: u32,
    pub json_out: Option<String>,
    pub reference: Option<String>,
}

impl Settings {
    /// Command line values take precedence over the configuration file.
    /// Relative paths of the configuration file are relative to its directory.
    pub fn resolve(args: &Args, config: Option<(&str, &DashboardConfig)>) -> Settings {
        let empty = DashboardConfig::default();
        let (config_dir, cfg) = match config {
            Some((p, c)) => (Path::new(p).parent(), c),
            None => (None, &empty),
        };
        let from_config = |s: &String| -> PathBuf {
            match config_dir {
                Some(dir) if Path::new(s).is_relative() => dir.join(s),
                _ => PathBuf::from(s),
            }
        };

        let workbook = match (&args.input, &cfg.workbook_path) {
            (Some(p), _) => PathBuf::from(p),
            (None, Some(p)) => from_config(p),
            (None, None) => PathBuf::from(DEFAULT_WORKBOOK),
        };
        let output_dir = match (&args.out_dir, &cfg.output_directory) {
            (Some(p), _) => PathBuf::from(p),
            (None, Some(p)) => from_config(p),
            (None, None) => PathBuf::from("."),
        };
        let axes = if args.axis.is_empty() {
            cfg.axes.clone().unwrap_or_default()
        } else {
            args.axis.clone()
        };

        Settings {
            workbook,
            output_dir,
            secret: cfg
                .access_secret
                .clone()
                .unwrap_or_else(|| DEFAULT_SECRET.to_string()),
            password: args.password.clone(),
            axes,
            list_only: args.list,
            export_png: !args.no_png && cfg.export_png.unwrap_or(true),
            export_pdf: !args.no_pdf && cfg.export_pdf.unwrap_or(true),
            chart_width: cfg.chart_width.unwrap_or(DEFAULT_CHART_WIDTH),
            radar_height: cfg.radar_height.unwrap_or(DEFAULT_RADAR_HEIGHT),
            json_out: args.out.clone(),
            reference: args.reference.clone(),
        }
    }
}

pub fn read_config(path: &str) -> DashResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: DashboardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_reference(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
