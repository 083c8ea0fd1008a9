//! Module containing the implementation of the `TstMap` and associated
//! iterators/etc.

use alloc::{string::String, vec::Vec};
use core::{fmt::Debug, mem::ManuallyDrop, ops::Index, panic::UnwindSafe};

use crate::raw::{
    clone_tree, deallocate_tree, insert_unchecked, search_for_delete_point, search_unchecked,
    validated_points, validated_points_from_bytes, EmptyKeyError, KeyError, NodePtr,
};

mod iterators;
pub use iterators::*;

/// An ordered map based on a ternary search trie, keyed by Unicode strings.
///
/// Each trie node matches a single Unicode code point and has three
/// children: less, equal (one code point further into the key), and
/// greater. Compared to a hash map this trades raw lookup speed for space
/// sharing between keys with common prefixes and for ordered prefix
/// queries ([`prefix`][TstMap::prefix], [`prefix_keys`][TstMap::prefix_keys]).
///
/// Keys must contain at least one Unicode code point; the validation
/// failures are [`EmptyKeyError`] and, for the byte-oriented entry points,
/// [`KeyError`]. The map is not safe for concurrent mutation from multiple
/// threads without external synchronization, like any `&mut`-based
/// container.
pub struct TstMap<V> {
    /// The number of stored keys present in the tree.
    num_entries: usize,
    /// A pointer to the tree root, if present.
    root: Option<NodePtr<V>>,
}

impl<V> TstMap<V> {
    /// Create a new, empty [`TstMap`].
    ///
    /// This function will not pre-allocate anything.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let map = TstMap::<()>::new();
    /// assert!(map.is_empty());
    /// assert_eq!(map.len(), 0);
    /// ```
    pub fn new() -> Self {
        TstMap {
            num_entries: 0,
            root: None,
        }
    }

    /// Returns the number of stored keys in the map.
    ///
    /// This counts keys, not trie nodes; interior nodes that do not
    /// terminate a stored key are invisible here.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("fooooo", 2);
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn len(&self) -> usize {
        self.num_entries
    }

    /// Returns `true` if the map contains no stored keys.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let map = TstMap::<()>::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.num_entries == 0
    }

    /// Removes every stored key, releasing the whole node graph.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert_eq!(map.get("foo"), None);
    /// ```
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            // SAFETY: The root was just taken out of the map, making this
            // the only remaining handle to the node graph; the mutable
            // borrow of self precludes any overlapping read.
            unsafe { deallocate_tree(root) };
        }
        self.num_entries = 0;
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map did not have this key present, `Ok(None)` is returned. If
    /// the map did have this key present, the value is updated, the old
    /// value is returned, and the length is unchanged.
    ///
    /// Keys are matched one Unicode code point at a time, so a character
    /// outside the basic multilingual plane occupies a single trie node.
    ///
    /// # Errors
    ///  - Returns [`EmptyKeyError`] when the key contains no code points.
    ///    The map is left untouched in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    ///
    /// assert_eq!(map.try_insert("foo", 1), Ok(None));
    /// assert_eq!(map.try_insert("foo", 2), Ok(Some(1)));
    /// assert!(map.try_insert("", 3).is_err());
    ///
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn try_insert(&mut self, key: &str, value: V) -> Result<Option<V>, EmptyKeyError> {
        let points = validated_points(key)?;
        Ok(self.insert_points(&points, value))
    }

    /// Inserts a key-value pair into the map, returning the old value if the
    /// key was already present.
    ///
    /// # Panics
    ///  - Panics when the key contains no code points; use
    ///    [`try_insert`][TstMap::try_insert] to handle that case as a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    ///
    /// assert!(map.insert("foo", 'a').is_none());
    /// assert_eq!(map.insert("foo", 'b'), Some('a'));
    /// assert!(map.insert("😀", 'c').is_none());
    ///
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Option<V> {
        match self.try_insert(key, value) {
            Ok(existing) => existing,
            Err(err) => panic!("{err}"),
        }
    }

    /// Inserts a key-value pair whose key is supplied as raw bytes.
    ///
    /// # Errors
    ///  - Returns [`KeyError::Invalid`] when the bytes are not valid UTF-8
    ///    and [`KeyError::Empty`] when they decode to zero code points. The
    ///    map is left untouched in either case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::{KeyError, TstMap};
    ///
    /// let mut map = TstMap::new();
    ///
    /// assert_eq!(map.try_insert_bytes("日本".as_bytes(), 1), Ok(None));
    /// assert!(matches!(map.try_insert_bytes(&[0xff], 2), Err(KeyError::Invalid(_))));
    /// assert!(matches!(map.try_insert_bytes(b"", 2), Err(KeyError::Empty(_))));
    ///
    /// assert_eq!(map.get("日本"), Some(&1));
    /// ```
    pub fn try_insert_bytes(&mut self, key: &[u8], value: V) -> Result<Option<V>, KeyError> {
        let points = validated_points_from_bytes(key)?;
        Ok(self.insert_points(&points, value))
    }

    fn insert_points(&mut self, points: &[char], value: V) -> Option<V> {
        // SAFETY: The mutable borrow of self guarantees exclusive access to
        // the tree, so no other read or write overlaps this call.
        let result = unsafe { insert_unchecked(self.root, points, value) };
        self.root = Some(result.new_root);
        if result.existing.is_none() {
            self.num_entries += 1;
        }
        result.existing
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// A key that only reaches interior trie structure counts as absent.
    ///
    /// # Errors
    ///  - Returns [`EmptyKeyError`] when the key contains no code points.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    ///
    /// assert_eq!(map.try_get("foo"), Ok(Some(&1)));
    /// assert_eq!(map.try_get("fo"), Ok(None));
    /// assert!(map.try_get("").is_err());
    /// ```
    pub fn try_get(&self, key: &str) -> Result<Option<&V>, EmptyKeyError> {
        let points = validated_points(key)?;
        Ok(self.lookup_value(&points))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Panics
    ///  - Panics when the key contains no code points; use
    ///    [`try_get`][TstMap::try_get] to handle that case as a value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    ///
    /// assert_eq!(map.get("foo"), Some(&1));
    /// assert_eq!(map.get("fo"), None);
    /// assert_eq!(map.get("bar"), None);
    /// ```
    pub fn get(&self, key: &str) -> Option<&V> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns a reference to the value whose key is supplied as raw bytes.
    ///
    /// # Errors
    ///  - Returns [`KeyError::Invalid`] when the bytes are not valid UTF-8
    ///    and [`KeyError::Empty`] when they decode to zero code points.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::{KeyError, TstMap};
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    ///
    /// assert_eq!(map.try_get_bytes(b"foo"), Ok(Some(&1)));
    /// assert!(matches!(map.try_get_bytes(&[0xff]), Err(KeyError::Invalid(_))));
    /// ```
    pub fn try_get_bytes(&self, key: &[u8]) -> Result<Option<&V>, KeyError> {
        let points = validated_points_from_bytes(key)?;
        Ok(self.lookup_value(&points))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Errors
    ///  - Returns [`EmptyKeyError`] when the key contains no code points.
    pub fn try_get_mut(&mut self, key: &str) -> Result<Option<&mut V>, EmptyKeyError> {
        let points = validated_points(key)?;
        let Some(node) = self.find_node(&points) else {
            return Ok(None);
        };
        // SAFETY: The lifetime of the returned reference is bounded by the
        // mutable borrow of self, so the value cannot be accessed through
        // any other pointer while it is live.
        Ok(unsafe { node.as_value_mut() })
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Panics
    ///  - Panics when the key contains no code points; use
    ///    [`try_get_mut`][TstMap::try_get_mut] to handle that case as a
    ///    value.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    ///
    /// *map.get_mut("foo").unwrap() += 1;
    /// assert_eq!(map.get("foo"), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        match self.try_get_mut(key) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes a key from the map, returning the value at the key if the
    /// key was previously in the map.
    ///
    /// An absent key, the empty key included, is a plain not-found: nothing
    /// happens and `None` is returned. A successful removal decrements the
    /// length by exactly one, however many interior nodes it unlinks.
    ///
    /// Removing a key that is a strict prefix of another stored key only
    /// clears the value; the interior nodes keep routing the longer key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("fooooo", 2);
    ///
    /// assert_eq!(map.remove("foo"), Some(1));
    /// assert_eq!(map.remove("foo"), None);
    /// assert_eq!(map.get("fooooo"), Some(&2));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn remove(&mut self, key: &str) -> Option<V> {
        if key.is_empty() {
            return None;
        }
        let root = self.root?;
        let points: Vec<char> = key.chars().collect();

        // SAFETY: The mutable borrow of self guarantees exclusive access to
        // the tree, so no other read or write overlaps this call.
        let delete_point = unsafe { search_for_delete_point(root, &points) }?;
        // SAFETY: Same exclusive access; stale pointers into the tree are
        // replaced by the returned root below.
        let result = unsafe { delete_point.apply(root) };

        self.root = result.new_root;
        self.num_entries -= 1;
        Some(result.removed)
    }

    /// Returns `true` if the map contains the given key.
    ///
    /// This is defined in terms of [`keys`][TstMap::keys]: the stored keys
    /// are enumerated and compared, so the cost grows with the number of
    /// stored keys rather than with the key length.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    ///
    /// assert!(map.contains_key("foo"));
    /// assert!(!map.contains_key("fo"));
    /// assert!(!map.contains_key("bar"));
    /// ```
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys().any(|stored| stored == key)
    }

    /// Gets an iterator over the stored keys and values, in depth-first
    /// emission order.
    ///
    /// The order is the trie's left / node / middle / right walk; it is
    /// stable for a given tree shape but is not a global lexicographic
    /// guarantee across sibling subtrees.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("bar", 2);
    ///
    /// let mut entries: Vec<_> = map.iter().collect();
    /// entries.sort();
    /// assert_eq!(entries, [("bar".to_string(), &2), ("foo".to_string(), &1)]);
    /// ```
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Gets a mutable iterator over the stored keys and values, in
    /// depth-first emission order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("bar", 2);
    ///
    /// for (_key, value) in map.iter_mut() {
    ///     *value *= 10;
    /// }
    ///
    /// assert_eq!(map.get("foo"), Some(&10));
    /// assert_eq!(map.get("bar"), Some(&20));
    /// ```
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut::new(self)
    }

    /// Gets an iterator over the stored keys, in depth-first emission order.
    ///
    /// Every stored key appears exactly once; interior trie nodes
    /// contribute nothing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("bar", 2);
    ///
    /// let mut keys: Vec<_> = map.keys().collect();
    /// keys.sort();
    /// assert_eq!(keys, ["bar", "foo"]);
    /// ```
    pub fn keys(&self) -> Keys<'_, V> {
        Keys::new(self)
    }

    /// Gets an iterator over the stored values, in depth-first key emission
    /// order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("bar", 2);
    ///
    /// let mut values: Vec<_> = map.values().copied().collect();
    /// values.sort();
    /// assert_eq!(values, [1, 2]);
    /// ```
    pub fn values(&self) -> Values<'_, V> {
        Values::new(self)
    }

    /// Gets a mutable iterator over the stored values, in depth-first key
    /// emission order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("bar", 2);
    ///
    /// for value in map.values_mut() {
    ///     *value += 1;
    /// }
    ///
    /// assert_eq!(map.get("foo"), Some(&2));
    /// assert_eq!(map.get("bar"), Some(&3));
    /// ```
    pub fn values_mut(&mut self) -> ValuesMut<'_, V> {
        ValuesMut::new(self)
    }

    /// Gets an iterator over the entries whose keys start with `prefix`.
    ///
    /// A key equal to the prefix is itself a match; an absent prefix yields
    /// an empty iterator with no error; the empty prefix matches every
    /// stored key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("fooo", 2);
    /// map.insert("bar", 3);
    ///
    /// let mut matches: Vec<_> = map.prefix("foo").collect();
    /// matches.sort();
    /// assert_eq!(matches, [("foo".to_string(), &1), ("fooo".to_string(), &2)]);
    ///
    /// assert_eq!(map.prefix("zzz").count(), 0);
    /// assert_eq!(map.prefix("").count(), 3);
    /// ```
    pub fn prefix(&self, prefix: &str) -> Prefix<'_, V> {
        Prefix::new(self, prefix)
    }

    /// Gets a mutable iterator over the entries whose keys start with
    /// `prefix`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("foo", 1);
    /// map.insert("fooo", 2);
    /// map.insert("bar", 3);
    ///
    /// for (_key, value) in map.prefix_mut("fo") {
    ///     *value += 10;
    /// }
    ///
    /// assert_eq!(map.get("foo"), Some(&11));
    /// assert_eq!(map.get("fooo"), Some(&12));
    /// assert_eq!(map.get("bar"), Some(&3));
    /// ```
    pub fn prefix_mut(&mut self, prefix: &str) -> PrefixMut<'_, V> {
        PrefixMut::new(self, prefix)
    }

    /// Gets an iterator over the stored keys that start with `prefix`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// for key in ["foo", "fore", "fobe", "fooooo", "bar", "baz"] {
    ///     map.insert(key, ());
    /// }
    ///
    /// let mut matches: Vec<_> = map.prefix_keys("fo").collect();
    /// matches.sort();
    /// assert_eq!(matches, ["fobe", "foo", "fooooo", "fore"]);
    /// ```
    pub fn prefix_keys(&self, prefix: &str) -> PrefixKeys<'_, V> {
        PrefixKeys::new(self, prefix)
    }

    /// Visit every trie node, value-holding or structural, in left / node /
    /// middle / right order.
    ///
    /// The callback receives the node's code point and its value, `None` at
    /// nodes that do not terminate a stored key. This exposes the raw tree
    /// shape; for the stored entries use [`iter`][TstMap::iter] instead.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let mut map = TstMap::new();
    /// map.insert("ab", 1);
    /// map.insert("ac", 2);
    ///
    /// let mut nodes = Vec::new();
    /// map.dfs(|key, value| nodes.push((key, value.copied())));
    /// assert_eq!(nodes, [('a', None), ('b', Some(1)), ('c', Some(2))]);
    /// ```
    pub fn dfs<F>(&self, mut callback: F)
    where
        F: FnMut(char, Option<&V>),
    {
        if let Some(root) = self.root {
            // SAFETY: The shared borrow of self precludes mutation for the
            // duration of the walk.
            unsafe { visit_nodes(root, &mut callback) };
        }
    }

    fn find_node(&self, points: &[char]) -> Option<NodePtr<V>> {
        let root = self.root?;
        // SAFETY: The borrow of self precludes overlapping mutation.
        unsafe { search_unchecked(root, points) }
    }

    fn lookup_value(&self, points: &[char]) -> Option<&V> {
        let node = self.find_node(points)?;
        // SAFETY: The lifetime of the returned reference is bounded by the
        // shared borrow of self, so the value cannot be mutated while it is
        // live.
        unsafe { node.as_value_ref() }
    }

    pub(crate) fn root_ptr(&self) -> Option<NodePtr<V>> {
        self.root
    }

    pub(crate) fn into_raw_parts(self) -> (Option<NodePtr<V>>, usize) {
        let map = ManuallyDrop::new(self);
        (map.root, map.num_entries)
    }
}

/// Recursive left / node / middle / right walk over every node.
///
/// # Safety
///  - No mutation of the subtree may overlap this call.
unsafe fn visit_nodes<V, F>(node_ptr: NodePtr<V>, callback: &mut F)
where
    F: FnMut(char, Option<&V>),
{
    // SAFETY: Covered by the requirements on this function.
    let node = unsafe { node_ptr.as_ref() };

    if let Some(left) = node.left {
        // SAFETY: Covered by the requirements on this function.
        unsafe { visit_nodes(left, callback) };
    }
    callback(node.key, node.value.as_ref());
    if let Some(middle) = node.middle {
        // SAFETY: Covered by the requirements on this function.
        unsafe { visit_nodes(middle, callback) };
    }
    if let Some(right) = node.right {
        // SAFETY: Covered by the requirements on this function.
        unsafe { visit_nodes(right, callback) };
    }
}

impl<V> Drop for TstMap<V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<V: Clone> Clone for TstMap<V> {
    fn clone(&self) -> Self {
        match self.root {
            Some(root) => TstMap {
                num_entries: self.num_entries,
                // SAFETY: The shared borrow of self precludes overlapping
                // mutation during the walk.
                root: Some(unsafe { clone_tree(root) }),
            },
            None => TstMap::new(),
        }
    }
}

impl<V: Debug> Debug for TstMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<V> Default for TstMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Panics if a key contains no code points, like
/// [`insert`][TstMap::insert].
impl<'a, V> Extend<(&'a str, V)> for TstMap<V> {
    fn extend<T: IntoIterator<Item = (&'a str, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            let _ = self.insert(key, value);
        }
    }
}

/// Panics if a key contains no code points, like
/// [`insert`][TstMap::insert].
impl<V> Extend<(String, V)> for TstMap<V> {
    fn extend<T: IntoIterator<Item = (String, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            let _ = self.insert(&key, value);
        }
    }
}

impl<'a, V, const N: usize> From<[(&'a str, V); N]> for TstMap<V> {
    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let map = TstMap::from([("a", 1), ("b", 2)]);
    /// assert_eq!(map.len(), 2);
    /// assert_eq!(map.get("a"), Some(&1));
    /// ```
    fn from(arr: [(&'a str, V); N]) -> Self {
        let mut map = TstMap::new();
        map.extend(arr);
        map
    }
}

impl<'a, V> FromIterator<(&'a str, V)> for TstMap<V> {
    fn from_iter<T: IntoIterator<Item = (&'a str, V)>>(iter: T) -> Self {
        let mut map = TstMap::new();
        map.extend(iter);
        map
    }
}

impl<V> FromIterator<(String, V)> for TstMap<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut map = TstMap::new();
        map.extend(iter);
        map
    }
}

/// Panics if the key is absent from the map or contains no code points.
impl<V> Index<&str> for TstMap<V> {
    type Output = V;

    fn index(&self, key: &str) -> &Self::Output {
        self.get(key).expect("no entry found for key")
    }
}

impl<'a, V> IntoIterator for &'a TstMap<V> {
    type IntoIter = Iter<'a, V>;
    type Item = (String, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, V> IntoIterator for &'a mut TstMap<V> {
    type IntoIter = IterMut<'a, V>;
    type Item = (String, &'a mut V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<V> IntoIterator for TstMap<V> {
    type IntoIter = IntoIter<V>;
    type Item = (String, V);

    /// # Examples
    ///
    /// ```rust
    /// use tstrie::TstMap;
    ///
    /// let map = TstMap::from([("b", 1), ("a", 2)]);
    ///
    /// let mut entries: Vec<_> = map.into_iter().collect();
    /// entries.sort();
    /// assert_eq!(entries, [("a".to_string(), 2), ("b".to_string(), 1)]);
    /// ```
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<V: PartialEq> PartialEq for TstMap<V> {
    fn eq(&self, other: &Self) -> bool {
        // Two tries holding the same entries can have different shapes,
        // and therefore different emission orders, depending on insertion
        // history; compare by lookup instead of by sequence.
        self.num_entries == other.num_entries
            && self.iter().all(|(key, value)| other.get(&key) == Some(value))
    }
}

impl<V: Eq> Eq for TstMap<V> {}

// SAFETY: The raw node pointers are owned exclusively by the map and only
// dereferenced through borrows of it, so the container is safe to `Send`
// for the same reasons other owning containers are.
unsafe impl<V: Send> Send for TstMap<V> {}

// SAFETY: Shared access to the map only ever produces shared references to
// the values, so the container is safe to `Sync` when its values are.
unsafe impl<V: Sync> Sync for TstMap<V> {}

// Need to implement this manually because the map contains `NonNull`
// pointers, which are not `UnwindSafe`. It is safe here since mutations
// only happen through a mutable reference to the map as a whole.
impl<V: UnwindSafe> UnwindSafe for TstMap<V> {}

#[cfg(test)]
mod tests {
    use alloc::{format, string::ToString, vec::Vec};
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::tests_common::{generate_keys_fixed_length, generate_keys_skewed, DICTIONARY};

    #[test]
    fn tst_map_is_send_sync_unwind_safe() {
        fn is_send<T: Send>() {}
        fn is_sync<T: Sync>() {}
        fn is_unwind_safe<T: UnwindSafe>() {}

        is_send::<TstMap<usize>>();
        is_sync::<TstMap<usize>>();
        is_unwind_safe::<TstMap<usize>>();
    }

    #[test]
    fn empty_map_behaves_like_the_empty_set() {
        let map = TstMap::<usize>::new();

        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert_eq!(map.keys().count(), 0);
        assert_eq!(map.get("anything"), None);
        assert!(!map.contains_key("anything"));
        assert_eq!(map.prefix_keys("any").count(), 0);

        let mut map = map;
        assert_eq!(map.remove("anything"), None);
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn default_map_is_empty() {
        assert!(TstMap::<usize>::default().is_empty());
    }

    macro_rules! insert_get_remove_tests {
        ($($suite:ident: [$($key:literal),+ $(,)?]),+ $(,)?) => {
            $(
                paste::paste! {
                    #[test]
                    fn [<insert_get_remove_ $suite>]() {
                        let keys = [$($key),+];
                        let mut map = TstMap::new();

                        for (index, key) in keys.iter().copied().enumerate() {
                            assert_eq!(map.try_insert(key, index), Ok(None));
                            assert_eq!(map.len(), index + 1);

                            for later in keys.iter().copied().skip(index + 1) {
                                assert!(map.get(later).is_none(), "{later} present early");
                            }
                            assert_eq!(map.get(key), Some(&index));
                        }

                        for (index, key) in keys.iter().copied().enumerate() {
                            *map.get_mut(key).unwrap() *= 2;
                            assert_eq!(map.remove(key), Some(index * 2));
                            assert!(map.get(key).is_none());
                            assert_eq!(map.len(), keys.len() - index - 1);
                        }

                        assert!(map.is_empty());
                    }
                }
            )+
        };
    }

    insert_get_remove_tests! {
        ascii_words: ["foo", "fore", "fobe", "fooooo", "bar", "baz"],
        shared_prefixes: ["a", "ab", "abc", "abcd"],
        reverse_order: ["d", "c", "b", "a"],
        unicode: ["für", "füll", "日本語", "😀", "😀😀"],
    }

    #[test]
    fn reinsert_updates_value_without_growing() {
        let mut map = TstMap::new();

        assert_eq!(map.try_insert("foo", 1), Ok(None));
        assert_eq!(map.try_insert("foo", 2), Ok(Some(1)));
        assert_eq!(map.try_insert("foo", 3), Ok(Some(2)));

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("foo"), Some(&3));
    }

    #[test]
    fn removing_some_keys_leaves_the_rest_intact() {
        let mut map = TstMap::new();
        for key in ["foo", "fooooo", "bar", "baz"] {
            map.insert(key, key.to_string());
        }

        assert_eq!(map.remove("foo").as_deref(), Some("foo"));
        assert_eq!(map.remove("baz").as_deref(), Some("baz"));

        assert_eq!(map.get("foo"), None);
        assert_eq!(map.get("baz"), None);
        assert_eq!(map.get("bar").map(String::as_str), Some("bar"));
        assert_eq!(map.get("fooooo").map(String::as_str), Some("fooooo"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn deleting_prefix_key_keeps_longer_key_and_structure() {
        let mut map = TstMap::new();
        map.insert("foo", 1);
        map.insert("fooo", 2);

        let count_nodes = |map: &TstMap<i32>| {
            let mut nodes = 0;
            map.dfs(|_, _| nodes += 1);
            nodes
        };
        assert_eq!(count_nodes(&map), 4);

        assert_eq!(map.remove("foo"), Some(1));

        // The "f", "o", "o" chain still routes the longer key.
        assert_eq!(count_nodes(&map), 4);
        assert_eq!(map.get("fooo"), Some(&2));
        assert_eq!(map.get("foo"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn keys_are_exact_and_duplicate_free() {
        let mut map = TstMap::new();
        for (index, key) in DICTIONARY.iter().copied().enumerate() {
            map.insert(key, index);
        }
        // Re-insert a few to check against duplicated emission.
        map.insert("foo", 100);
        map.insert("baz", 101);

        let mut keys: Vec<_> = map.keys().collect();
        keys.sort();
        let mut expected: Vec<_> = DICTIONARY.iter().map(|key| key.to_string()).collect();
        expected.sort();
        assert_eq!(keys, expected);
    }

    #[test]
    fn prefix_includes_key_equal_to_prefix() {
        let mut map = TstMap::new();
        map.insert("foo", 1);
        map.insert("fooo", 2);

        let mut matches: Vec<_> = map.prefix_keys("foo").collect();
        matches.sort();
        assert_eq!(matches, ["foo", "fooo"]);
    }

    #[test]
    fn prefix_at_structural_node_excludes_it() {
        let mut map = TstMap::new();
        map.insert("foo", 1);

        // "fo" reaches interior structure only; it is not itself a match.
        let matches: Vec<_> = map.prefix_keys("fo").collect();
        assert_eq!(matches, ["foo"]);
    }

    #[test]
    fn prefix_keys_matches_filtered_key_set() {
        let mut map = TstMap::new();
        for key in generate_keys_fixed_length(3, &['a', 'b', 'c']) {
            map.insert(&key, ());
        }

        for prefix in ["", "a", "b", "ab", "abc", "ac", "zz"] {
            let mut matched: Vec<_> = map.prefix_keys(prefix).collect();
            matched.sort();
            let mut expected: Vec<_> =
                map.keys().filter(|key| key.starts_with(prefix)).collect();
            expected.sort();
            assert_eq!(matched, expected, "prefix {prefix:?}");
        }
    }

    #[test]
    fn skewed_keys_keep_interior_values() {
        let keys: Vec<_> = generate_keys_skewed(12).collect();
        let mut map = TstMap::new();
        for (index, key) in keys.iter().enumerate() {
            map.insert(key, index);
        }

        // Remove every second key; the others must survive, including the
        // ones whose nodes are interior to longer keys.
        for key in keys.iter().step_by(2) {
            assert!(map.remove(key).is_some());
        }
        for (index, key) in keys.iter().enumerate() {
            if index % 2 == 0 {
                assert_eq!(map.get(key), None);
            } else {
                assert_eq!(map.get(key), Some(&index));
            }
        }
    }

    #[test]
    fn surrogate_pair_code_point_is_one_node() {
        let mut map = TstMap::new();
        map.insert("😀", "grin");

        let mut nodes = 0;
        map.dfs(|key, _| {
            assert_eq!(key, '😀');
            nodes += 1;
        });
        assert_eq!(nodes, 1);
        assert_eq!(map.get("😀"), Some(&"grin"));
    }

    #[test]
    fn empty_key_is_rejected_before_any_mutation() {
        let mut map = TstMap::<usize>::new();

        assert_eq!(map.try_insert("", 1), Err(EmptyKeyError));
        assert!(map.is_empty());
        assert_eq!(map.try_get(""), Err(EmptyKeyError));
        assert_eq!(map.remove(""), None);
        assert!(!map.contains_key(""));
    }

    #[test]
    fn byte_keys_distinguish_invalid_from_empty() {
        let mut map = TstMap::new();

        assert!(matches!(
            map.try_insert_bytes(&[0xc3, 0x28], 1),
            Err(KeyError::Invalid(_))
        ));
        assert!(matches!(map.try_insert_bytes(b"", 1), Err(KeyError::Empty(_))));
        assert!(map.is_empty());

        assert_eq!(map.try_insert_bytes("für".as_bytes(), 1), Ok(None));
        assert_eq!(map.try_get_bytes("für".as_bytes()), Ok(Some(&1)));
        assert_eq!(map.get("für"), Some(&1));
    }

    #[test]
    #[should_panic(expected = "at least one Unicode code point")]
    fn insert_panics_on_empty_key() {
        TstMap::new().insert("", 1);
    }

    #[test]
    #[should_panic(expected = "at least one Unicode code point")]
    fn get_panics_on_empty_key() {
        let _ = TstMap::<usize>::new().get("");
    }

    #[test]
    #[should_panic(expected = "no entry found for key")]
    fn index_panics_on_missing_key() {
        let _ = TstMap::<usize>::new()["missing"];
    }

    #[test]
    fn contains_key_is_enumeration_based() {
        let mut map = TstMap::new();
        map.insert("foo", 1);
        map.insert("foz", 2);

        // Present keys, structural paths, and unrelated keys.
        assert!(map.contains_key("foo"));
        assert!(map.contains_key("foz"));
        assert!(!map.contains_key("f"));
        assert!(!map.contains_key("fooz"));
    }

    #[test]
    fn iterators_report_exact_sizes() {
        let mut map = TstMap::new();
        for key in ["foo", "bar", "baz"] {
            map.insert(key, ());
        }

        let mut iter = map.iter();
        assert_eq!(iter.len(), 3);
        iter.next();
        assert_eq!(iter.len(), 2);

        assert_eq!(map.keys().size_hint(), (3, Some(3)));
        assert_eq!(map.prefix_keys("ba").size_hint().0, 0);
    }

    #[test]
    fn clone_is_independent_of_the_original() {
        let mut map = TstMap::new();
        for (index, key) in DICTIONARY.iter().copied().enumerate() {
            map.insert(key, index);
        }

        let mut copy = map.clone();
        assert_eq!(copy, map);

        copy.insert("only-in-copy", 999);
        copy.remove("foo");

        assert_eq!(map.get("only-in-copy"), None);
        assert_eq!(map.get("foo"), Some(&3));
        assert_eq!(copy.get("only-in-copy"), Some(&999));
        assert_eq!(copy.get("foo"), None);
    }

    #[test]
    fn equality_ignores_tree_shape() {
        let forward: TstMap<_> = [("a", 1), ("b", 2), ("c", 3)].into_iter().collect();
        let backward: TstMap<_> = [("c", 3), ("b", 2), ("a", 1)].into_iter().collect();
        let different: TstMap<_> = [("a", 1), ("b", 2), ("c", 4)].into_iter().collect();

        assert_eq!(forward, backward);
        assert_ne!(forward, different);
    }

    #[test]
    fn debug_output_lists_entries() {
        let mut map = TstMap::new();
        map.insert("a", 1);
        assert_eq!(format!("{map:?}"), r#"{"a": 1}"#);
    }

    #[derive(Debug)]
    struct DropBomb(Rc<Cell<usize>>);

    impl Drop for DropBomb {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn dropping_the_map_drops_every_value() {
        let drops = Rc::new(Cell::new(0));

        let mut map = TstMap::new();
        for key in DICTIONARY {
            map.insert(key, DropBomb(Rc::clone(&drops)));
        }
        assert_eq!(drops.get(), 0);

        drop(map);
        assert_eq!(drops.get(), DICTIONARY.len());
    }

    #[test]
    fn replaced_and_removed_values_drop_once() {
        let drops = Rc::new(Cell::new(0));

        let mut map = TstMap::new();
        map.insert("foo", DropBomb(Rc::clone(&drops)));
        map.insert("foo", DropBomb(Rc::clone(&drops)));
        assert_eq!(drops.get(), 1);

        drop(map.remove("foo"));
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn partially_consumed_into_iter_drops_the_rest() {
        let drops = Rc::new(Cell::new(0));

        let mut map = TstMap::new();
        for key in DICTIONARY {
            map.insert(key, DropBomb(Rc::clone(&drops)));
        }

        let mut entries = map.into_iter();
        drop(entries.next());
        drop(entries.next());
        assert_eq!(drops.get(), 2);

        drop(entries);
        assert_eq!(drops.get(), DICTIONARY.len());
    }

    #[test]
    fn into_iter_yields_every_entry() {
        let mut map = TstMap::new();
        for (index, key) in DICTIONARY.iter().copied().enumerate() {
            map.insert(key, index);
        }

        let mut entries: Vec<_> = map.into_iter().collect();
        entries.sort();
        let mut expected: Vec<_> = DICTIONARY
            .iter()
            .enumerate()
            .map(|(index, key)| (key.to_string(), index))
            .collect();
        expected.sort();
        assert_eq!(entries, expected);
    }

    #[test]
    fn clear_empties_and_map_stays_usable() {
        let mut map = TstMap::new();
        map.insert("foo", 1);
        map.insert("bar", 2);

        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.get("foo"), None);

        map.insert("foo", 3);
        assert_eq!(map.get("foo"), Some(&3));
        assert_eq!(map.len(), 1);
    }
}
