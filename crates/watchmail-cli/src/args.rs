use clap::Parser;

#[derive(Parser)]
#[command(name = "watchmail")]
#[command(about = "Like watch(1), but emails you a diff when the output changes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to run repeatedly
    #[arg(required = true, trailing_var_arg = true)]
    pub command: Vec<String>,

    /// Seconds to wait between updates
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    pub interval: Option<f64>,

    /// Highlight changed lines (use --differences=permanent to accumulate)
    #[arg(
        short = 'd',
        long,
        value_name = "permanent",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "transient"
    )]
    pub differences: Option<String>,

    /// Exit when the command returns a non-zero status
    #[arg(short = 'e', long)]
    pub errexit: bool,

    /// Exit when the output changes
    #[arg(short = 'g', long)]
    pub chgexit: bool,

    /// Pass ANSI color sequences through to the display
    #[arg(short = 'c', long)]
    pub color: bool,

    /// Strip ANSI color sequences from the display
    #[arg(short = 'C', long, conflicts_with = "color")]
    pub no_color: bool,

    /// Suppress the header line
    #[arg(short = 't', long)]
    pub no_title: bool,

    /// Truncate long lines instead of wrapping
    #[arg(short = 'w', long)]
    pub no_wrap: bool,

    /// Run the command directly instead of through `sh -c`
    #[arg(short = 'x', long)]
    pub exec: bool,

    /// Subtract the command's run time from the sleep interval
    #[arg(short = 'p', long)]
    pub precise: bool,

    /// Ring the terminal bell when the output changes
    #[arg(short = 'b', long)]
    pub beep: bool,

    /// Email address to notify on change
    #[arg(long)]
    pub email: Option<String>,

    /// Alias for --email
    #[arg(long)]
    pub to: Option<String>,

    /// Sender email address
    #[arg(long)]
    pub from: Option<String>,

    /// Minimum time between emails (e.g. "30s", "5m")
    #[arg(long)]
    pub cooldown: Option<String>,

    /// Custom email subject
    #[arg(long)]
    pub subject: Option<String>,

    /// Resend API key (defaults to the RESEND_API_KEY environment variable)
    #[arg(long)]
    pub api_key: Option<String>,
}
