//! Insertion-ordered PMT dictionary.

use std::fmt;
use std::hash::{BuildHasher, DefaultHasher, Hash, Hasher};

use hashbrown::{DefaultHashBuilder, HashTable};

use super::value::Pmt;

/// A dictionary keyed by arbitrary PMT values.
///
/// Keys are unique under value equality. Entries keep insertion order, which
/// the legacy encoding depends on: entries are written most recent first.
/// Equality ignores order.
///
/// Lookups and fresh inserts go through a hash index. Removing a key, or
/// re-inserting one that is present, shifts the later entries and is linear.
#[derive(Clone, Default)]
pub struct PmtDict {
    entries: Vec<(Pmt, Pmt)>,
    /// `(key hash, position in entries)` for every entry.
    index: HashTable<(u64, usize)>,
    hasher: DefaultHashBuilder,
}

impl PmtDict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashTable::with_capacity(capacity),
            hasher: DefaultHashBuilder::default(),
        }
    }

    /// Inserts `value` under `key`, returning the previous value if the key existed.
    ///
    /// An existing key is removed and re-appended, so it becomes the most
    /// recently inserted entry.
    pub fn insert(&mut self, key: impl Into<Pmt>, value: impl Into<Pmt>) -> Option<Pmt> {
        let key = key.into();
        let hash = self.hasher.hash_one(&key);
        let previous = self.remove_hashed(hash, &key);
        self.append(hash, key, value.into());
        previous
    }

    /// Appends an entry unless `key` is already present, in which case the
    /// existing entry is kept as is.
    pub(crate) fn insert_if_absent(&mut self, key: Pmt, value: Pmt) {
        let hash = self.hasher.hash_one(&key);
        if self.position(hash, &key).is_none() {
            self.append(hash, key, value);
        }
    }

    /// Reverses entry order.
    pub(crate) fn reverse(&mut self) {
        let last = self.entries.len().saturating_sub(1);
        self.entries.reverse();
        for (_, i) in self.index.iter_mut() {
            *i = last - *i;
        }
    }

    pub fn get(&self, key: &Pmt) -> Option<&Pmt> {
        let i = self.position(self.hasher.hash_one(key), key)?;
        Some(&self.entries[i].1)
    }

    pub fn contains_key(&self, key: &Pmt) -> bool {
        self.get(key).is_some()
    }

    pub fn remove(&mut self, key: &Pmt) -> Option<Pmt> {
        let hash = self.hasher.hash_one(key);
        self.remove_hashed(hash, key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&Pmt, &Pmt)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    fn position(&self, hash: u64, key: &Pmt) -> Option<usize> {
        let entries = &self.entries;
        self.index
            .find(hash, |&(h, i)| h == hash && entries[i].0 == *key)
            .map(|&(_, i)| i)
    }

    fn append(&mut self, hash: u64, key: Pmt, value: Pmt) {
        self.index
            .insert_unique(hash, (hash, self.entries.len()), |&(h, _)| h);
        self.entries.push((key, value));
    }

    fn remove_hashed(&mut self, hash: u64, key: &Pmt) -> Option<Pmt> {
        let entries = &self.entries;
        let found = self
            .index
            .find_entry(hash, |&(h, i)| h == hash && entries[i].0 == *key)
            .ok()?;
        let ((_, removed), _) = found.remove();
        for (_, i) in self.index.iter_mut() {
            if *i > removed {
                *i -= 1;
            }
        }
        Some(self.entries.remove(removed).1)
    }
}

impl fmt::Debug for PmtDict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl PartialEq for PmtDict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

/// Entry hashes are combined by addition, so the result ignores order like `==` does.
impl Hash for PmtDict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let sum = self.iter().fold(0u64, |sum, (k, v)| {
            let mut entry = DefaultHasher::new();
            k.hash(&mut entry);
            v.hash(&mut entry);
            sum.wrapping_add(entry.finish())
        });
        state.write_usize(self.len());
        state.write_u64(sum);
    }
}

impl<K: Into<Pmt>, V: Into<Pmt>> FromIterator<(K, V)> for PmtDict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        for (k, v) in iter {
            dict.insert(k, v);
        }
        dict
    }
}

impl<K: Into<Pmt>, V: Into<Pmt>, const N: usize> From<[(K, V); N]> for PmtDict {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for PmtDict {
    type Item = (Pmt, Pmt);
    type IntoIter = std::vec::IntoIter<(Pmt, Pmt)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(d: &PmtDict) -> Vec<Pmt> {
        d.iter().map(|(k, _)| k.clone()).collect()
    }

    #[test]
    fn insert_and_get() {
        let mut d = PmtDict::new();
        assert_eq!(d.insert("spam", 42), None);
        assert_eq!(d.get(&Pmt::symbol("spam")), Some(&Pmt::Int32(42)));
        assert!(d.contains_key(&Pmt::symbol("spam")));
        assert!(!d.contains_key(&Pmt::symbol("eggs")));
    }

    #[test]
    fn reinsert_moves_to_end() {
        let mut d = PmtDict::from([("a", 1), ("b", 2)]);
        assert_eq!(d.insert("a", 3), Some(Pmt::Int32(1)));
        assert_eq!(keys(&d), vec![Pmt::symbol("b"), Pmt::symbol("a")]);
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn lookups_follow_entries_after_remove() {
        let mut d = PmtDict::from([("a", 1), ("b", 2), ("c", 3), ("d", 4)]);
        assert_eq!(d.remove(&Pmt::symbol("b")), Some(Pmt::Int32(2)));
        assert_eq!(d.remove(&Pmt::symbol("b")), None);
        assert_eq!(d.get(&Pmt::symbol("a")), Some(&Pmt::Int32(1)));
        assert_eq!(d.get(&Pmt::symbol("c")), Some(&Pmt::Int32(3)));
        assert_eq!(d.get(&Pmt::symbol("d")), Some(&Pmt::Int32(4)));

        d.insert("e", 5);
        assert_eq!(d.get(&Pmt::symbol("e")), Some(&Pmt::Int32(5)));
        assert_eq!(
            keys(&d),
            vec![Pmt::symbol("a"), Pmt::symbol("c"), Pmt::symbol("d"), Pmt::symbol("e")]
        );
    }

    #[test]
    fn reverse_keeps_lookups() {
        let mut d = PmtDict::from([("a", 1), ("b", 2), ("c", 3)]);
        d.reverse();
        assert_eq!(keys(&d), vec![Pmt::symbol("c"), Pmt::symbol("b"), Pmt::symbol("a")]);
        assert_eq!(d.get(&Pmt::symbol("a")), Some(&Pmt::Int32(1)));
        assert_eq!(d.get(&Pmt::symbol("c")), Some(&Pmt::Int32(3)));

        let mut empty = PmtDict::new();
        empty.reverse();
        assert!(empty.is_empty());
    }

    #[test]
    fn insert_if_absent_keeps_first() {
        let mut d = PmtDict::new();
        d.insert_if_absent(Pmt::symbol("k"), Pmt::Int32(2));
        d.insert_if_absent(Pmt::symbol("k"), Pmt::Int32(1));
        assert_eq!(d.len(), 1);
        assert_eq!(d.get(&Pmt::symbol("k")), Some(&Pmt::Int32(2)));
    }

    #[test]
    fn equality_ignores_order() {
        let a = PmtDict::from([("x", 1), ("y", 2)]);
        let b = PmtDict::from([("y", 2), ("x", 1)]);
        assert_eq!(a, b);

        let c = PmtDict::from([("y", 2), ("x", 5)]);
        assert_ne!(a, c);
    }

    #[test]
    fn non_symbol_keys() {
        let mut d = PmtDict::new();
        d.insert(7, "seven");
        d.insert(Pmt::cons(1, 2), true);
        assert_eq!(d.get(&Pmt::Int32(7)), Some(&Pmt::symbol("seven")));
        assert_eq!(d.get(&Pmt::cons(1, 2)), Some(&Pmt::Bool(true)));
        assert_eq!(d.get(&Pmt::Int64(7)), None);
    }

    #[test]
    fn signed_zero_keys_are_one_key() {
        let mut d = PmtDict::new();
        d.insert(0.0, "zero");
        assert_eq!(d.get(&Pmt::Double(-0.0)), Some(&Pmt::symbol("zero")));
        assert_eq!(d.insert(-0.0, "negative"), Some(Pmt::symbol("zero")));
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn many_distinct_keys() {
        let d: PmtDict = (0..10_000i32).map(|i| (i, i * 2)).collect();
        assert_eq!(d.len(), 10_000);
        assert_eq!(d.get(&Pmt::Int32(9_999)), Some(&Pmt::Int32(19_998)));
    }
}
