use bindersift::core::models::chain::Dialect;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "bindersift - aggregates interface-confidence metrics from structure-prediction batches and ranks binder candidates.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Root directory containing the candidate job directories.
    #[arg(value_name = "ROOT")]
    pub root: PathBuf,

    /// Predictor output dialect of the batch.
    #[arg(short, long, value_enum)]
    pub dialect: DialectArg,

    /// Confidence threshold for the passing subset.
    #[arg(short = 't', long, value_name = "FLOAT")]
    pub threshold: Option<f64>,

    /// Comparison direction against the threshold: 'ge' or 'le'.
    #[arg(long, value_name = "DIR")]
    pub direction: Option<String>,

    /// Path for the full report table.
    #[arg(short, long, value_name = "PATH", default_value = "overview.csv")]
    pub output: PathBuf,

    /// Path for the threshold-passing subset table.
    #[arg(long, value_name = "PATH", default_value = "passing.csv")]
    pub passing_output: PathBuf,

    // --- Discovery Overrides ---
    /// Discover jobs as direct children named <PREFIX><integer>.
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Discover jobs as directories containing this marker file.
    #[arg(long, value_name = "FILE", conflicts_with = "prefix")]
    pub marker: Option<String>,

    // --- Score Tool Overrides ---
    /// Interface-score tool command line, e.g. 'python /opt/tools/ipsae.py'.
    /// The matrix path, confidence path, and chain pair are appended.
    #[arg(long, value_name = "CMD")]
    pub score_cmd: Option<String>,

    /// Header name of the interface metric column in the tool's output.
    #[arg(long, value_name = "NAME")]
    pub metric_column: Option<String>,

    /// Time budget in seconds for one tool invocation.
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Recompute external scores even when a fresh cached table exists.
    #[arg(long)]
    pub force_recompute: bool,

    /// Path to a configuration file in TOML format. CLI arguments
    /// override values from the file.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Set the number of threads for parallel job processing.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialectArg {
    /// AlphaFold3-style outputs (direct iptm scalar per model).
    Af3,
    /// Boltz-2-style outputs (matrix + confidence, external scoring).
    Boltz,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Af3 => Dialect::Af3,
            DialectArg::Boltz => Dialect::Boltz,
        }
    }
}
