use crate::cli::Cli;
use crate::error::{CliError, Result};
use bindersift::engine::config::{
    Direction, DiscoveryRule, RankConfig, ResolverConfig, ScanConfig,
};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

const DEFAULT_THRESHOLD: f64 = 0.7;

/// Optional TOML configuration file. Everything is optional; CLI
/// arguments win over file values, which win over defaults.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileConfig {
    discovery: Option<FileDiscovery>,
    resolver: Option<FileResolver>,
    ranking: Option<FileRanking>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileDiscovery {
    prefix: Option<String>,
    marker: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileResolver {
    score_cmd: Option<Vec<String>>,
    metric_column: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct FileRanking {
    threshold: Option<f64>,
    direction: Option<String>,
}

impl FileConfig {
    fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(CliError::Io)?;
        toml::from_str(&text).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

/// Fully merged and validated run settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub scan: ScanConfig,
    pub rank: RankConfig,
    pub output: PathBuf,
    pub passing_output: PathBuf,
}

impl Settings {
    /// Merges the optional config file with CLI arguments and validates
    /// threshold and direction up front; any problem here is fatal
    /// before scanning starts.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => {
                debug!("Loading configuration file {}", path.display());
                FileConfig::from_file(path)?
            }
            None => FileConfig::default(),
        };
        let file_discovery = file.discovery.unwrap_or_default();
        let file_resolver = file.resolver.unwrap_or_default();
        let file_ranking = file.ranking.unwrap_or_default();

        let dialect = cli.dialect.into();
        let mut scan = ScanConfig::new(dialect);

        if let Some(prefix) = cli.prefix.clone().or(file_discovery.prefix) {
            scan.discovery = DiscoveryRule::Prefix { prefix };
        }
        if let Some(file_name) = cli.marker.clone().or(file_discovery.marker) {
            scan.discovery = DiscoveryRule::Marker { file_name };
        }

        let mut resolver = ResolverConfig {
            force_recompute: cli.force_recompute,
            ..ResolverConfig::default()
        };
        let cli_cmd = cli
            .score_cmd
            .as_ref()
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect::<Vec<_>>());
        if let Some(cmd) = cli_cmd.or(file_resolver.score_cmd) {
            if cmd.is_empty() {
                return Err(CliError::Argument("score command is empty".to_string()));
            }
            resolver.score_cmd = cmd;
        }
        if let Some(column) = cli.metric_column.clone().or(file_resolver.metric_column) {
            resolver.metric_column = column;
        }
        if let Some(secs) = cli.timeout_secs.or(file_resolver.timeout_secs) {
            resolver.timeout = std::time::Duration::from_secs(secs);
        }
        scan.resolver = resolver;

        let threshold = cli
            .threshold
            .or(file_ranking.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        let direction = match cli.direction.clone().or(file_ranking.direction) {
            Some(raw) => raw
                .parse::<Direction>()
                .map_err(|e| CliError::Config(e.to_string()))?,
            None => Direction::Ge,
        };
        let rank =
            RankConfig::new(threshold, direction).map_err(|e| CliError::Config(e.to_string()))?;

        Ok(Self {
            scan,
            rank,
            output: cli.output.clone(),
            passing_output: cli.passing_output.clone(),
        })
    }
}
