use clap::Parser;

/// Dashboard of the strategic axes: adherence radar, goal correspondence and PDF reports.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the settings of the dashboard. The other options
    /// override the values of this file. See the manual of the `adherence` crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, default dados.xlsx) The Excel workbook, with one sheet per axis.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (sheet name, repeatable) An axis to show. Use 'all' for every axis. If not specified,
    /// the axes are asked for on the terminal.
    #[clap(short, long, value_parser)]
    pub axis: Vec<String>,

    /// If passed as an argument, only lists the axes of the workbook.
    #[clap(long, takes_value = false)]
    pub list: bool,

    /// The access password. If not specified, it is asked for on the terminal.
    #[clap(long, value_parser)]
    pub password: Option<String>,

    /// (directory, default .) Where the PNG charts and the PDF reports are written.
    #[clap(long, value_parser)]
    pub out_dir: Option<String>,

    /// If passed as an argument, the charts are not exported as PNG images.
    #[clap(long, takes_value = false)]
    pub no_png: bool,

    /// If passed as an argument, no PDF report is written.
    #[clap(long, takes_value = false)]
    pub no_pdf: bool,

    /// (file path, 'stdout' or empty) If specified, the summary of all the axes will be written in
    /// JSON format to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, eixos will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
