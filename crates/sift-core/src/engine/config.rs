use crate::core::io::score_table::DEFAULT_METRIC_COLUMN;
use crate::core::models::chain::Dialect;
use crate::engine::error::SiftError;
use std::str::FromStr;
use std::time::Duration;

/// Comparison direction applied to the representative scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Pass when score >= threshold (the usual "surface good binders").
    Ge,
    /// Pass when score <= threshold (useful for error-like metrics).
    Le,
}

impl Direction {
    pub fn passes(&self, score: f64, threshold: f64) -> bool {
        match self {
            Direction::Ge => score >= threshold,
            Direction::Le => score <= threshold,
        }
    }
}

impl FromStr for Direction {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ge" | ">=" => Ok(Direction::Ge),
            "le" | "<=" => Ok(Direction::Le),
            other => Err(SiftError::Config(format!(
                "unknown comparison direction '{}' (expected 'ge' or 'le')",
                other
            ))),
        }
    }
}

/// Threshold filter configuration. Validated at startup; an invalid
/// threshold aborts before any directory is scanned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankConfig {
    pub threshold: f64,
    pub direction: Direction,
}

impl RankConfig {
    pub fn new(threshold: f64, direction: Direction) -> Result<Self, SiftError> {
        if !threshold.is_finite() {
            return Err(SiftError::Config(format!(
                "threshold must be a finite number, got {}",
                threshold
            )));
        }
        Ok(Self {
            threshold,
            direction,
        })
    }
}

/// How candidate job directories are recognized under the root.
/// Injected into the locator; never hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryRule {
    /// Direct children named `<prefix><integer>`, e.g. `binder_17`.
    Prefix { prefix: String },
    /// Any directory (recursively) containing the named marker file.
    Marker { file_name: String },
}

impl DiscoveryRule {
    /// The conventional rule for a dialect's batch layout.
    pub fn default_for(_dialect: Dialect) -> Self {
        DiscoveryRule::Prefix {
            prefix: "binder_".to_string(),
        }
    }
}

/// External interface-score tool invocation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Command line prefix, e.g. `["python", "/opt/tools/ipsae.py"]`.
    /// The matrix path, confidence path, and chain pair are appended.
    pub score_cmd: Vec<String>,
    /// Header name of the interface metric column in the tool's table.
    pub metric_column: String,
    pub timeout: Duration,
    /// Recompute even when a fresh cached table exists.
    pub force_recompute: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            score_cmd: vec!["ipsae".to_string()],
            metric_column: DEFAULT_METRIC_COLUMN.to_string(),
            timeout: Duration::from_secs(600),
            force_recompute: false,
        }
    }
}

/// Everything a batch scan needs besides the root path.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub dialect: Dialect,
    pub discovery: DiscoveryRule,
    pub resolver: ResolverConfig,
}

impl ScanConfig {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            discovery: DiscoveryRule::default_for(dialect),
            resolver: ResolverConfig::default(),
        }
    }
}
