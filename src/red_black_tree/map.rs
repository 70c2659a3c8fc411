use crate::red_black_tree::node::NIL;
use crate::red_black_tree::tree::RedBlackTree;
use crate::red_black_tree::{Error, Result};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::marker::PhantomData;
use std::ops;
use std::result;

/// An ordered map implemented by a red-black tree.
///
/// A red-black tree is a self-balancing binary search tree that tags every node with a color and
/// maintains a small set of coloring rules during insertions and deletions. The rules guarantee
/// that no path from the root to a leaf is more than twice as long as any other, so lookups,
/// insertions, and removals all take logarithmic time in the worst case. Missing keys are
/// reported through [`Error::KeyNotFound`], which carries the key that was looked up.
///
/// The map is a single-owner, single-threaded structure; it provides no internal synchronization
/// and concurrent mutation is unsupported.
///
/// # Examples
///
/// ```
/// use balanced_collections::red_black_tree::RedBlackMap;
///
/// let mut map = RedBlackMap::new();
/// map.set(0, 1);
/// map.set(3, 4);
///
/// assert_eq!(map.get(&0), Ok(&1));
/// assert!(map.get(&1).is_err());
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map[&3], 4);
///
/// map.set(0, 2);
/// assert_eq!(map.remove(&0), Ok((0, 2)));
/// assert!(map.remove(&0).is_err());
/// ```
pub struct RedBlackMap<T, U> {
    tree: RedBlackTree<T, U>,
}

impl<T, U> RedBlackMap<T, U> {
    /// Constructs a new, empty `RedBlackMap<T, U>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// ```
    pub fn new() -> Self {
        RedBlackMap {
            tree: RedBlackTree::new(),
        }
    }

    /// Associates `value` with `key`. If the key is already present, its node is removed and a
    /// fresh node with the new value is inserted, so the key is briefly absent while the update
    /// is in progress.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// map.set(1, 2);
    /// assert_eq!(map.get(&1), Ok(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn set(&mut self, key: T, value: U)
    where
        T: Ord,
    {
        let node = self.tree.find(&key);
        if node != NIL {
            self.tree.remove_node(node);
        }
        self.tree.insert(key, value);
    }

    /// Checks if a key exists in the map. This never fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// assert!(!map.is_set(&0));
    /// assert!(map.is_set(&1));
    /// ```
    pub fn is_set(&self, key: &T) -> bool
    where
        T: Ord,
    {
        self.tree.contains(key)
    }

    /// Returns an immutable reference to the value associated with `key`, or
    /// `Error::KeyNotFound` carrying the key if it is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// assert_eq!(map.get(&1), Ok(&1));
    /// assert_eq!(map.get(&44), Err(Error::KeyNotFound(44)));
    /// ```
    pub fn get(&self, key: &T) -> Result<&U, T>
    where
        T: Ord + Clone,
    {
        match self.tree.get(key) {
            Some(entry) => Ok(&entry.value),
            None => Err(Error::KeyNotFound(key.clone())),
        }
    }

    /// Returns a mutable reference to the value associated with `key`, or `Error::KeyNotFound`
    /// carrying the key if it is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// *map.get_mut(&1).unwrap() = 3;
    /// assert_eq!(map.get(&1), Ok(&3));
    /// ```
    pub fn get_mut(&mut self, key: &T) -> Result<&mut U, T>
    where
        T: Ord + Clone,
    {
        match self.tree.get_mut(key) {
            Some(entry) => Ok(&mut entry.value),
            None => Err(Error::KeyNotFound(key.clone())),
        }
    }

    /// Removes the entry for `key` and returns the key-value pair, or `Error::KeyNotFound`
    /// carrying the key if it is not present.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::{Error, RedBlackMap};
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// assert_eq!(map.remove(&1), Ok((1, 1)));
    /// assert_eq!(map.remove(&1), Err(Error::KeyNotFound(1)));
    /// ```
    pub fn remove(&mut self, key: &T) -> Result<(T, U), T>
    where
        T: Ord + Clone,
    {
        self.tree.remove(key).map(|entry| (entry.key, entry.value))
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let map: RedBlackMap<u32, u32> = RedBlackMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Removes every entry from the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// map.clear();
    /// assert!(map.is_empty());
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// map.set(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree.min().map(|entry| &entry.key)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use balanced_collections::red_black_tree::RedBlackMap;
    ///
    /// let mut map = RedBlackMap::new();
    /// map.set(1, 1);
    /// map.set(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.max().map(|entry| &entry.key)
    }
}

impl<'a, T, U> ops::Index<&'a T> for RedBlackMap<T, U>
where
    T: Ord,
{
    type Output = U;

    /// Returns an immutable reference to the value associated with `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &T) -> &Self::Output {
        match self.tree.get(key) {
            Some(entry) => &entry.value,
            None => panic!("Error: key not found in map."),
        }
    }
}

impl<T, U> Default for RedBlackMap<T, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for RedBlackMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.tree.traverse()).finish()
    }
}

impl<T, U> PartialEq for RedBlackMap<T, U>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.tree.traverse() == other.tree.traverse()
    }
}

impl<T, U> Serialize for RedBlackMap<T, U>
where
    T: Ord + Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.tree.traverse() {
            state.serialize_entry(key, value)?;
        }
        state.end()
    }
}

struct RedBlackMapVisitor<T, U> {
    phantom: PhantomData<(T, U)>,
}

impl<'de, T, U> Visitor<'de> for RedBlackMapVisitor<T, U>
where
    T: Ord + Deserialize<'de>,
    U: Deserialize<'de>,
{
    type Value = RedBlackMap<T, U>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = RedBlackMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.set(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U> Deserialize<'de> for RedBlackMap<T, U>
where
    T: Ord + Deserialize<'de>,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RedBlackMapVisitor {
            phantom: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::RedBlackMap;
    use crate::red_black_tree::Error;
    use serde_test::{assert_tokens, Token};

    #[test]
    fn test_len_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_get_missing() {
        let map: RedBlackMap<i32, i32> = RedBlackMap::new();
        let error = map.get(&44).unwrap_err();
        assert_eq!(error, Error::KeyNotFound(44));
        assert_eq!(error.key(), &44);
    }

    #[test]
    fn test_set_get() {
        let mut map = RedBlackMap::new();
        map.set(1, 1);
        assert!(map.is_set(&1));
        assert_eq!(map.get(&1), Ok(&1));
    }

    #[test]
    fn test_set_replaces_value() {
        let mut map = RedBlackMap::new();
        map.set(1, 1);
        map.set(1, 3);
        assert_eq!(map.get(&1), Ok(&3));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_set_same_value_is_idempotent() {
        let mut map = RedBlackMap::new();
        map.set(1, 1);
        map.set(2, 2);
        map.set(1, 1);
        assert_eq!(map.get(&1), Ok(&1));
        assert_eq!(map.get(&2), Ok(&2));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut map = RedBlackMap::new();
        map.set(1, 1);
        assert_eq!(map.remove(&1), Ok((1, 1)));
        assert!(!map.is_set(&1));
        assert_eq!(map.get(&1), Err(Error::KeyNotFound(1)));
    }

    #[test]
    fn test_remove_missing() {
        let mut map: RedBlackMap<i32, i32> = RedBlackMap::new();
        assert_eq!(map.remove(&1), Err(Error::KeyNotFound(1)));
    }

    #[test]
    fn test_get_mut() {
        let mut map = RedBlackMap::new();
        map.set(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Ok(&3));
    }

    #[test]
    fn test_min_max() {
        let mut map = RedBlackMap::new();
        map.set(1, 1);
        map.set(3, 3);
        map.set(5, 5);
        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_index() {
        let mut map = RedBlackMap::new();
        map.set(1, 2);
        assert_eq!(map[&1], 2);
    }

    #[test]
    #[should_panic]
    fn test_index_missing() {
        let map: RedBlackMap<u32, u32> = RedBlackMap::new();
        let _ = map[&1];
    }

    #[test]
    fn test_clear() {
        let mut map = RedBlackMap::new();
        map.set(1, 1);
        map.clear();
        assert!(map.is_empty());
        assert!(!map.is_set(&1));
    }

    #[test]
    fn test_eq() {
        let mut n = RedBlackMap::new();
        n.set(1, 1);
        n.set(2, 2);

        let mut m = RedBlackMap::new();
        m.set(2, 2);
        m.set(1, 1);

        assert_eq!(n, m);
        m.set(2, 3);
        assert_ne!(n, m);
    }

    #[test]
    fn test_debug() {
        let mut map = RedBlackMap::new();
        map.set(3, 4);
        map.set(1, 2);
        assert_eq!(format!("{:?}", map), "{1: 2, 3: 4}");
    }

    #[test]
    fn test_serde() {
        let mut map = RedBlackMap::new();
        map.set(1, 2);
        map.set(3, 4);
        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::I32(1),
                Token::I32(2),
                Token::I32(3),
                Token::I32(4),
                Token::MapEnd,
            ],
        );
    }
}
