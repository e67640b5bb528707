//! Entity (sharding) key extraction

use crate::model::Column;
use crate::{Error, Result};

/// Collect sharding-key columns ordered by their declared index
///
/// Returns storage names. An empty result is valid here; whether it is
/// acceptable depends on the schema kind and is decided by the compiler.
pub fn extract_entity_keys<'a, I>(columns: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = &'a Column>,
{
    let mut keyed: Vec<(u32, &Column)> = columns
        .into_iter()
        .filter_map(|col| col.sharding_key.map(|key| (key.idx, col)))
        .collect();
    keyed.sort_by_key(|(idx, _)| *idx);

    for pair in keyed.windows(2) {
        let ((idx, first), (next_idx, second)) = (pair[0], pair[1]);
        if idx == next_idx {
            return Err(Error::DuplicateShardingKey {
                idx,
                first: first.name.clone(),
                second: second.name.clone(),
            });
        }
    }

    Ok(keyed.into_iter().map(|(_, col)| col.name.clone()).collect())
}
