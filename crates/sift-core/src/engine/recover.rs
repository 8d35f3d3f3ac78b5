use crate::core::models::chain::{ChainRole, Dialect};
use crate::engine::error::SiftError;
use std::collections::{BTreeMap, HashMap};

/// Maps a parsed chain-label table through the dialect's fixed
/// label-to-role table. Fails with `MissingChain` on the first role
/// whose label is absent; callers record this on the job rather than
/// aborting the batch.
pub fn recover_roles(
    dialect: Dialect,
    sequences: &HashMap<char, String>,
) -> Result<BTreeMap<ChainRole, String>, SiftError> {
    let mut roles = BTreeMap::new();
    for (label, role) in dialect.chain_map() {
        let sequence = sequences
            .get(label)
            .ok_or(SiftError::MissingChain { role: *role })?;
        roles.insert(*role, sequence.clone());
    }
    Ok(roles)
}
