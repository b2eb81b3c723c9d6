use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;

/// `HashMap` with a default-constructible hasher.
pub type FastHashMap<K, V> = HashMap<K, V, BuildHasherDefault<DefaultHasher>>;

/// `HashSet` counterpart of `FastHashMap`.
pub type FastHashSet<K> = HashSet<K, BuildHasherDefault<DefaultHasher>>;
