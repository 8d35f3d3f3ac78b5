use serde::Serialize;
use std::fmt;

/// Output-schema variant a job directory was produced by.
///
/// The set is closed on purpose: every dialect-specific behavior in the
/// engine dispatches on this enum, so adding a predictor means adding a
/// variant here and an adapter for it, not new conditionals elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// AlphaFold3-style output: per-model summary JSON with a direct
    /// interface-confidence scalar.
    Af3,
    /// Boltz-2-style output: pairwise-error matrix plus per-residue
    /// confidence file; the interface scalar is computed externally.
    Boltz,
}

/// Semantic role of a chain within the predicted complex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainRole {
    Target,
    Binder,
    Antigen,
    Heavy,
    Light,
}

impl Dialect {
    /// Fixed chain-label to role table for this dialect.
    ///
    /// The mapping is a property of how the predictor inputs are
    /// templated upstream and is never inferred from file content.
    pub fn chain_map(&self) -> &'static [(char, ChainRole)] {
        match self {
            Dialect::Af3 => &[
                ('A', ChainRole::Antigen),
                ('B', ChainRole::Heavy),
                ('C', ChainRole::Light),
            ],
            Dialect::Boltz => &[('A', ChainRole::Target), ('B', ChainRole::Binder)],
        }
    }

    /// Chain pair spanning the interface the representative scalar is
    /// scoped to (target side first).
    pub fn interface_pair(&self) -> (char, char) {
        match self {
            Dialect::Af3 => ('A', 'B'),
            Dialect::Boltz => ('A', 'B'),
        }
    }

    /// Roles expected in a recovered sequence set, in report order.
    pub fn roles(&self) -> Vec<ChainRole> {
        self.chain_map().iter().map(|(_, role)| *role).collect()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Af3 => write!(f, "af3"),
            Dialect::Boltz => write!(f, "boltz"),
        }
    }
}

impl fmt::Display for ChainRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChainRole::Target => "target",
            ChainRole::Binder => "binder",
            ChainRole::Antigen => "antigen",
            ChainRole::Heavy => "heavy",
            ChainRole::Light => "light",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_maps_are_fixed_per_dialect() {
        let af3 = Dialect::Af3.chain_map();
        assert_eq!(af3.len(), 3);
        assert!(af3.contains(&('B', ChainRole::Heavy)));

        let boltz = Dialect::Boltz.chain_map();
        assert_eq!(boltz, &[('A', ChainRole::Target), ('B', ChainRole::Binder)]);
    }

    #[test]
    fn roles_follow_chain_map_order() {
        assert_eq!(
            Dialect::Af3.roles(),
            vec![ChainRole::Antigen, ChainRole::Heavy, ChainRole::Light]
        );
    }
}
