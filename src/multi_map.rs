use std::{borrow::Borrow, collections::BTreeMap};

/// Multi-valued map ordered by key. Values under one key keep insertion order.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct MultiMap<K, T>(BTreeMap<K, Vec<T>>);

impl<K: Ord, T> MultiMap<K, T> {
    pub fn new_empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn insert(&mut self, key: K, value: T) {
        self.0.entry(key).or_default().push(value);
    }

    /// First value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&T>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.0.get(key).and_then(|values| values.first())
    }

    pub fn get_all<Q>(&self, key: &Q) -> &[T]
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.0.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    /// Flattened `(key, value)` pairs in key order.
    pub fn pairs(&self) -> impl Iterator<Item = (&K, &T)> + '_ {
        self.0
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k, v)))
    }
}

impl<K: Ord, T> FromIterator<(K, T)> for MultiMap<K, T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut mm = Self::new_empty();
        for (k, v) in iter {
            mm.insert(k, v);
        }
        mm
    }
}
