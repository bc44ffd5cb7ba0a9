use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "offerdesk",
    version,
    about = "terminal desk client for hosted offer tables",
    long_about = "Offerdesk is a terminal client for a hosted offers table: filter, add and delete rows, watch the summary figures update.\n\nExamples:\n  offerdesk --ep https://xyz.example.co/rest/v1/ --key <KEY>\n  offerdesk --ep https://xyz.example.co/rest/v1/ --key <KEY> --vertical gambling --once\n  offerdesk --cfg ~/.offerdesk/config.yml\n\nTip: Use --cfg to persist connection settings and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'e',
        long = "ep",
        visible_alias = "endpoint",
        value_name = "URL",
        help_heading = "Connection",
        help = "Base REST endpoint of the hosted table store."
    )]
    pub endpoint: Option<String>,

    #[arg(
        short = 'k',
        long = "key",
        visible_alias = "api-key",
        value_name = "KEY",
        help_heading = "Connection",
        help = "API key (OFFERDESK_API_KEY overrides the config file)."
    )]
    pub api_key: Option<String>,

    #[arg(
        short = 't',
        long = "tb",
        visible_alias = "table",
        value_name = "NAME",
        help_heading = "Connection",
        help = "Table name (defaults to 'offers')."
    )]
    pub table: Option<String>,

    #[arg(
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "Connection",
        help = "Request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        long = "proxy",
        value_name = "URL",
        help_heading = "Connection",
        help = "Route requests through an HTTP proxy."
    )]
    pub proxy: Option<String>,

    #[arg(
        long = "vertical",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Substring match on the vertical column (case-insensitive)."
    )]
    pub vertical: Option<String>,

    #[arg(
        long = "settle",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Substring match on the settlement term (case-insensitive)."
    )]
    pub settle: Option<String>,

    #[arg(
        long = "title",
        value_name = "TEXT",
        help_heading = "Filters",
        help = "Substring match on the title (case-insensitive)."
    )]
    pub title: Option<String>,

    #[arg(
        long = "rate-min",
        value_name = "N",
        help_heading = "Filters",
        help = "Inclusive lower bound on rate."
    )]
    pub rate_min: Option<f64>,

    #[arg(
        long = "rate-max",
        value_name = "N",
        help_heading = "Filters",
        help = "Inclusive upper bound on rate."
    )]
    pub rate_max: Option<f64>,

    #[arg(
        long = "volume-min",
        value_name = "N",
        help_heading = "Filters",
        help = "Inclusive lower bound on volume."
    )]
    pub volume_min: Option<i64>,

    #[arg(
        long = "volume-max",
        value_name = "N",
        help_heading = "Filters",
        help = "Inclusive upper bound on volume."
    )]
    pub volume_max: Option<i64>,

    #[arg(
        long = "date-from",
        value_name = "YYYY-MM-DD",
        help_heading = "Filters",
        help = "Inclusive lower bound on creation date."
    )]
    pub date_from: Option<String>,

    #[arg(
        long = "date-to",
        value_name = "YYYY-MM-DD",
        help_heading = "Filters",
        help = "Inclusive upper bound on creation date."
    )]
    pub date_to: Option<String>,

    #[arg(
        long = "insurance",
        value_name = "any|yes|no",
        help_heading = "Filters",
        help = "Keep only insured (yes) or uninsured (no) offers."
    )]
    pub insurance: Option<String>,

    #[arg(
        long = "once",
        help_heading = "Mode",
        help = "Print the filtered table and totals once, then exit."
    )]
    pub once: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Mode",
        help = "Path to config file (defaults to ~/.offerdesk/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Mode",
        help = "Write the result set to a file after the read."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "text|json|csv",
        help_heading = "Mode",
        help = "Export format (inferred from the file extension if omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}
