//! Singleton elimination over candidate sets

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Display;

use itertools::Itertools;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EliminationError {
    #[error("no candidate left for {0}")]
    NoCandidate(String),
    #[error("could not pin down: {0}")]
    Ambiguous(String),
}

/// Pair every key with one distinct value.
///
/// Keys left with a single candidate are settled one at a time and their
/// value is struck from every other set. Running out of singletons before
/// every key is settled is an error, never a guess.
pub fn eliminate<K, V>(
    mut candidates: BTreeMap<K, BTreeSet<V>>,
) -> Result<BTreeMap<K, V>, EliminationError>
where
    K: Ord + Clone + Display,
    V: Ord + Clone,
{
    let mut resolved = BTreeMap::new();
    loop {
        if let Some((key, _)) = candidates.iter().find(|(_, set)| set.is_empty()) {
            return Err(EliminationError::NoCandidate(key.to_string()));
        }
        let Some((key, value)) = candidates
            .iter()
            .find(|(_, set)| set.len() == 1)
            .and_then(|(key, set)| set.first().map(|value| (key.clone(), value.clone())))
        else {
            break;
        };

        candidates.remove(&key);
        for set in candidates.values_mut() {
            set.remove(&value);
        }
        log::trace!("{key} settled");
        resolved.insert(key, value);
    }

    if !candidates.is_empty() {
        return Err(EliminationError::Ambiguous(candidates.keys().join(", ")));
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sets(entries: Vec<(&'static str, Vec<u8>)>) -> BTreeMap<&'static str, BTreeSet<u8>> {
        entries
            .into_iter()
            .map(|(key, values)| (key, values.into_iter().collect()))
            .collect()
    }

    #[test]
    fn test_chain_of_singletons() {
        let candidates = sets(vec![("a", vec![1, 2, 3]), ("b", vec![2]), ("c", vec![2, 3])]);
        let resolved = eliminate(candidates).unwrap();
        assert_eq!(resolved, BTreeMap::from([("a", 1), ("b", 2), ("c", 3)]));
    }

    #[test]
    fn test_stalls_without_singletons() {
        assert_eq!(
            eliminate(sets(vec![("a", vec![1, 2]), ("b", vec![1, 2]), ("c", vec![3])])),
            Err(EliminationError::Ambiguous("a, b".to_string()))
        );
    }

    #[test]
    fn test_emptied_set() {
        assert_eq!(
            eliminate(sets(vec![("a", vec![1]), ("b", vec![1])])),
            Err(EliminationError::NoCandidate("b".to_string()))
        );
    }

    #[test]
    fn test_nothing_to_resolve() {
        assert_eq!(eliminate(BTreeMap::<String, BTreeSet<u8>>::new()), Ok(BTreeMap::new()));
    }
}
