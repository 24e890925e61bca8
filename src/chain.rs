//! Fixed-bucket hash map with per-bucket collision chains.
//!
//! The bucket count never changes and no rehashing happens; with many more
//! than a few thousand entries lookups degrade to linear scans of long
//! chains. Known scalability limit, sized for a configuration table.

/// Number of buckets. Fixed for the lifetime of the map.
const BUCKET_COUNT: usize = 256;

const HASH_MODULUS: i64 = 1_000_000_007;
const HASH_BASE: i64 = 31;

#[derive(Debug)]
struct Entry<V> {
    key: String,
    value: V,
}

/// Associative map from string keys to `V`, with collisions resolved by
/// chaining inside a fixed array of 256 buckets.
///
/// Insertion appends to the tail of the bucket's chain and does not check
/// for duplicates; callers that need unique keys must probe with
/// [`contains_key`](Self::contains_key) or [`get`](Self::get) first.
#[derive(Debug)]
pub struct ChainMap<V> {
    buckets: Vec<Vec<Entry<V>>>,
    len: usize,
}

impl<V> ChainMap<V> {
    pub fn new() -> Self {
        let mut buckets = Vec::with_capacity(BUCKET_COUNT);
        buckets.resize_with(BUCKET_COUNT, Vec::new);
        Self { buckets, len: 0 }
    }

    /// Appends `(key, value)` to the chain of the key's bucket.
    pub fn insert(&mut self, key: String, value: V) {
        let index = bucket_index(&key);
        self.buckets[index].push(Entry { key, value });
        self.len += 1;
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let index = bucket_index(key);
        self.buckets[index]
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let index = bucket_index(key);
        self.buckets[index]
            .iter_mut()
            .find(|entry| entry.key == key)
            .map(|entry| &mut entry.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Visits every entry in bucket order, then chain order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.buckets
            .iter()
            .flat_map(|chain| chain.iter().map(|entry| (entry.key.as_str(), &entry.value)))
    }
}

impl<V> Default for ChainMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Polynomial hash reduced into `[0, BUCKET_COUNT)`.
///
/// Byte codes are taken relative to `'a'`, so keys with upper-case or
/// punctuation bytes produce negative codes; `modulo` keeps every
/// intermediate remainder non-negative regardless.
fn bucket_index(key: &str) -> usize {
    let mut hash: i64 = 0;
    for &byte in key.as_bytes() {
        let code = byte as i64 - 'a' as i64 + 1;
        hash = modulo(hash * HASH_BASE + code, HASH_MODULUS);
    }

    (hash % BUCKET_COUNT as i64) as usize
}

/// Remainder that is non-negative whenever the divisor is positive.
fn modulo(dividend: i64, divisor: i64) -> i64 {
    let remainder = dividend % divisor;
    if remainder < 0 {
        remainder + divisor
    } else {
        remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut map = ChainMap::new();
        map.insert("alpha".to_string(), 1);
        map.insert("beta".to_string(), 2);

        assert_eq!(map.get("alpha"), Some(&1));
        assert_eq!(map.get("beta"), Some(&2));
        assert_eq!(map.get("gamma"), None);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut map = ChainMap::new();
        map.insert("counter".to_string(), 0);

        *map.get_mut("counter").unwrap() = 41;
        assert_eq!(map.get("counter"), Some(&41));
    }

    #[test]
    fn test_colliding_keys_share_a_bucket() {
        // Every key hashes into 256 buckets, so 300 distinct keys are
        // guaranteed to collide somewhere; all must stay retrievable.
        let mut map = ChainMap::new();
        for i in 0..300 {
            map.insert(format!("key_{i}"), i);
        }

        for i in 0..300 {
            assert_eq!(map.get(&format!("key_{i}")), Some(&i));
        }
        assert_eq!(map.len(), 300);
    }

    #[test]
    fn test_hash_is_in_range_for_non_lowercase_keys() {
        // '-' and upper-case bytes sit below 'a' and would drive a naive
        // remainder negative.
        for key in ["UPPER-CASE", "-", "_leading", "Z9"] {
            assert!(bucket_index(key) < BUCKET_COUNT);
        }
    }

    #[test]
    fn test_iter_sees_every_entry() {
        let mut map = ChainMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("c".to_string(), 3);

        let mut seen: Vec<_> = map.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        seen.sort();
        assert_eq!(
            seen,
            vec![
                ("a".to_string(), 1),
                ("b".to_string(), 2),
                ("c".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_empty_map() {
        let map: ChainMap<i32> = ChainMap::new();
        assert!(map.is_empty());
        assert!(!map.contains_key("anything"));
    }
}
