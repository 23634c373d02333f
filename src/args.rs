use clap::Parser;

/// This is a dashboard builder for community event calendars.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the dashboard: the sheets to read, the output settings and
    /// the header spellings. For more information about the file format, read the documentation of the `manual`
    /// module of event_normalizer.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing a dashboard summary in JSON format. If provided, hivecal will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the dashboard summary will be written in JSON format to the given
    /// location. Setting this option overrides the output directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) If specified, the sheet to read. Setting this option overrides the sheet sources
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default events) What the input sheet contains: events, metrics or news.
    #[clap(long, value_parser)]
    pub kind: Option<String>,

    /// (default: first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// If passed as an argument, past and undated events are included in the dashboard.
    #[clap(long, takes_value = false)]
    pub show_past: bool,

    /// (default 10) The number of events in the ranking by funds.
    #[clap(long, value_parser)]
    pub top: Option<usize>,

    /// (YYYY-MM-DDTHH:MM[:SS], default: current local time) The reference time that separates upcoming
    /// and past events.
    #[clap(long, value_parser)]
    pub now: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
