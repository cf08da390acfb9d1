//! Maps keyed by atom-index tuples that collapse symmetry-equivalent keys.
//!
//! Both containers rewrite every key into a canonical form before touching the backing
//! [`IndexMap`], so lookups through any equivalent ordering reach the same entry and
//! iteration follows first-insertion order.

use indexmap::IndexMap;
use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// A pure rewrite of an atom-index key into its canonical representative.
pub trait KeyTransform {
    type Input: ?Sized;
    type Key: Hash + Eq + Clone + fmt::Debug + Borrow<Self::Input>;

    fn canonicalize(key: &Self::Input) -> Self::Key;
}

/// Bonds, angles and proper torsions: a key and its reverse are the same term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValenceKey;

impl KeyTransform for ValenceKey {
    type Input = [usize];
    type Key = Vec<usize>;

    fn canonicalize(key: &[usize]) -> Vec<usize> {
        let mut canonical = key.to_vec();
        if let (Some(first), Some(last)) = (key.first(), key.last()) {
            if first > last {
                canonical.reverse();
            }
        }
        canonical
    }
}

/// Improper torsions: position 1 is the central atom, the three substituents are unordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImproperKey;

impl KeyTransform for ImproperKey {
    type Input = [usize; 4];
    type Key = [usize; 4];

    fn canonicalize(key: &[usize; 4]) -> [usize; 4] {
        let center = key[1];
        let mut substituents = [key[0], key[2], key[3]];
        substituents.sort_unstable();
        [substituents[0], center, substituents[1], substituents[2]]
    }
}

pub struct TransformedDict<T: KeyTransform, V> {
    store: IndexMap<T::Key, V>,
    _transform: PhantomData<T>,
}

pub type ValenceDict<V> = TransformedDict<ValenceKey, V>;
pub type ImproperDict<V> = TransformedDict<ImproperKey, V>;

impl<T: KeyTransform, V> TransformedDict<T, V> {
    pub fn new() -> Self {
        Self {
            store: IndexMap::new(),
            _transform: PhantomData,
        }
    }

    /// Inserts a value, returning the previous value stored under the canonical key.
    pub fn insert(&mut self, key: &T::Input, value: V) -> Option<V> {
        self.store.insert(T::canonicalize(key), value)
    }

    pub fn get(&self, key: &T::Input) -> Option<&V> {
        self.store.get(&T::canonicalize(key))
    }

    pub fn contains_key(&self, key: &T::Input) -> bool {
        self.store.contains_key(&T::canonicalize(key))
    }

    /// Removes an entry while preserving the insertion order of the remaining entries.
    pub fn remove(&mut self, key: &T::Input) -> Option<V> {
        self.store.shift_remove(&T::canonicalize(key))
    }

    /// Iterates `(canonical key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&T::Key, &V)> {
        self.store.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &T::Key> {
        self.store.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.store.values()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl<T: KeyTransform, V> Default for TransformedDict<T, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: KeyTransform, V: Clone> Clone for TransformedDict<T, V> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _transform: PhantomData,
        }
    }
}

impl<T: KeyTransform, V: fmt::Debug> fmt::Debug for TransformedDict<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.store.iter()).finish()
    }
}

impl<T: KeyTransform, V> Extend<(T::Key, V)> for TransformedDict<T, V> {
    fn extend<I: IntoIterator<Item = (T::Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key.borrow(), value);
        }
    }
}

impl<T: KeyTransform, V> FromIterator<(T::Key, V)> for TransformedDict<T, V> {
    fn from_iter<I: IntoIterator<Item = (T::Key, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}
