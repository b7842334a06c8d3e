use std::{borrow::Borrow, collections::HashMap, hash::Hash};

/// A hash map that iterates in insertion order. Re-inserting an existing
/// key replaces its value in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderedHashMap<K, V>
where
    K: Clone + Hash + Eq,
{
    order: Vec<K>,
    keys: HashMap<K, usize>,
    values: Vec<V>,
}

pub struct Iter<'a, K, V>
where
    K: Clone + Hash + Eq,
{
    idx: usize,
    map: &'a OrderedHashMap<K, V>,
}

impl<K, V> OrderedHashMap<K, V>
where
    K: Clone + Hash + Eq,
{
    pub fn new() -> OrderedHashMap<K, V> {
        OrderedHashMap {
            order: Vec::new(),
            keys: HashMap::new(),
            values: Vec::new(),
        }
    }

    pub fn get<Q>(&self, k: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.get(k).map(|idx| &self.values[*idx])
    }

    pub fn contains_key<Q>(&self, k: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.keys.contains_key(k)
    }

    pub fn insert(&mut self, k: K, v: V) -> Option<V> {
        if let Some(idx) = self.keys.get(&k) {
            return Some(std::mem::replace(&mut self.values[*idx], v));
        }

        let idx = self.order.len();
        self.order.push(k.clone());
        self.keys.insert(k, idx);
        self.values.push(v);
        None
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter { idx: 0, map: self }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Clone + Hash + Eq,
{
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx < self.map.order.len() {
            let k = &self.map.order[self.idx];
            let v = &self.map.values[self.idx];
            self.idx += 1;
            Some((k, v))
        } else {
            None
        }
    }
}
