use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "addrbook",
    version,
    about = "paginated, searchable address table client",
    long_about = "Addrbook renders a remote address inventory as a paginated table with a live street filter.\n\nExamples:\n  addrbook\n  addrbook --page 2 --query main\n  addrbook -u https://api.example.com/v1 --interactive\n  addrbook --query oak -o page.json\n\nTip: Use --config to persist the endpoint and retry settings."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the filtered page to a file."
    )]
    pub output: Option<String>,

    #[arg(
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output file format: text, json or xml (inferred from the extension when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 'u',
        long = "u",
        visible_alias = "base-url",
        value_name = "URL",
        help_heading = "Source",
        help = "Base URL of the address API."
    )]
    pub base_url: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Source",
        help = "Path to config file (defaults to ~/.addrbook/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Source",
        help = "Write a default config file if none exists, then exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Table",
        help = "Page to open first (1-based)."
    )]
    pub page: Option<u64>,

    #[arg(
        short = 'n',
        long = "ps",
        visible_alias = "page-size",
        value_name = "N",
        help_heading = "Table",
        help = "Records per page."
    )]
    pub page_size: Option<u64>,

    #[arg(
        short = 'q',
        long = "q",
        visible_alias = "query",
        value_name = "TEXT",
        help_heading = "Table",
        help = "Only show rows whose street contains TEXT (case-insensitive)."
    )]
    pub query: Option<String>,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "Table",
        help = "Browse pages interactively (commands are read from stdin)."
    )]
    pub interactive: bool,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "HTTP proxy URL (e.g. http://127.0.0.1:8080)."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'T',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<u64>,

    #[arg(
        short = 'H',
        long = "hdr",
        visible_alias = "header",
        value_name = "HEADER",
        help_heading = "HTTP",
        help = "Add a header to all requests (format: 'Key: Value')."
    )]
    pub header: Option<String>,

    #[arg(
        long = "ra",
        visible_alias = "retry-attempts",
        value_name = "N",
        help_heading = "Retry",
        help = "Tries for the total-count and menu requests (record reads are never retried)."
    )]
    pub retry_attempts: Option<u32>,

    #[arg(
        long = "rbd",
        visible_alias = "retry-base-delay",
        value_name = "MS",
        help_heading = "Retry",
        help = "Delay before the first retry in milliseconds; doubles on every retry."
    )]
    pub retry_base_delay_ms: Option<u64>,

    #[arg(
        long = "rmd",
        visible_alias = "retry-max-delay",
        value_name = "MS",
        help_heading = "Retry",
        help = "Upper bound for the retry delay in milliseconds."
    )]
    pub retry_max_delay_ms: Option<u64>,
}
