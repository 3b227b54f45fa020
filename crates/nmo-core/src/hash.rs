//! Fx-hashed map and set aliases.
//!
//! Every lookup in the crosswalk is keyed by short strings (normalized keys,
//! table names, `Table.Field` labels, review triples), which is the case the Fx
//! hash from `rustc-hash` is tuned for. None of the keys are attacker-controlled,
//! so the lack of `DoS` resistance does not matter here.
//!
//! # Examples
//!
//! ```
//! use nmo_core::{FxHashMap, fx_hash_map};
//!
//! let mut counts: FxHashMap<String, usize> = fx_hash_map();
//! *counts.entry("Location.PointID".to_owned()).or_default() += 1;
//! assert_eq!(counts["Location.PointID"], 1);
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// Creates a new empty [`FxHashMap`].
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_keeps_first_insert() {
        let mut map: FxHashMap<&str, i32> = fx_hash_map();
        map.entry("wellid").or_insert(1);
        map.entry("wellid").or_insert(2);
        assert_eq!(map.get("wellid"), Some(&1));
    }

    #[test]
    fn test_set_insert_reports_duplicates() {
        let mut set: FxHashSet<(&str, &str, &str)> = fx_hash_set();
        assert!(set.insert(("Location.PointID", "AB-0001", "bad value")));
        assert!(!set.insert(("Location.PointID", "AB-0001", "bad value")));
    }
}
