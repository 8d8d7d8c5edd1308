//! Fast hash map and hash set type aliases.
//!
//! This module provides type aliases for [`FxHashMap`] and [`FxHashSet`] from
//! the `rustc-hash` crate. The hierarchy records key everything by UID
//! strings, and the Fx algorithm is roughly 2x faster than the standard
//! library's default hasher for string keys.
//!
//! Denial-of-service resistance is not required here: every map is internal
//! and keyed by data the scan itself produced.
//!
//! # Examples
//!
//! ```
//! use dcm_core::{FxHashMap, FxHashSet, fx_hash_map, fx_hash_set};
//!
//! let mut map: FxHashMap<String, u32> = FxHashMap::default();
//! map.insert("1.2.840.10008.1.1".to_owned(), 1);
//!
//! let set: FxHashSet<&str> = fx_hash_set();
//! assert!(set.is_empty());
//! ```

/// A [`HashMap`](std::collections::HashMap) using the Fx hash algorithm.
///
/// Faster than the standard library's `HashMap` for the UID string keys
/// used throughout the hierarchy, but not DoS-resistant.
pub type FxHashMap<K, V> = rustc_hash::FxHashMap<K, V>;

/// A [`HashSet`](std::collections::HashSet) using the Fx hash algorithm.
///
/// Faster than the standard library's `HashSet` for the UID string keys
/// used throughout the hierarchy, but not DoS-resistant.
pub type FxHashSet<V> = rustc_hash::FxHashSet<V>;

/// The hasher used by [`FxHashMap`] and [`FxHashSet`].
pub type FxBuildHasher = rustc_hash::FxBuildHasher;

/// Creates a new empty [`FxHashMap`].
///
/// Equivalent to `FxHashMap::default()` but reads better at call sites
/// where the turbofish would otherwise be needed.
///
/// # Examples
///
/// ```
/// use dcm_core::fx_hash_map;
///
/// let map: dcm_core::FxHashMap<String, u32> = fx_hash_map();
/// assert!(map.is_empty());
/// ```
#[inline]
#[must_use]
pub fn fx_hash_map<K, V>() -> FxHashMap<K, V> {
    FxHashMap::default()
}

/// Creates a new empty [`FxHashSet`].
///
/// # Examples
///
/// ```
/// use dcm_core::fx_hash_set;
///
/// let set: dcm_core::FxHashSet<String> = fx_hash_set();
/// assert!(set.is_empty());
/// ```
#[inline]
#[must_use]
pub fn fx_hash_set<V>() -> FxHashSet<V> {
    FxHashSet::default()
}
