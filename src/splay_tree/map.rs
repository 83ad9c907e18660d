use crate::callback::{Comparator, NaturalOrder, Release};
use crate::entry::Entry;
use crate::splay_tree::arena::{NodeId, SlotsMut};
use crate::splay_tree::node::Node;
use crate::splay_tree::tree::Tree;
use log::debug;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp;
use std::fmt;
use std::iter::FromIterator;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};

/// An ordered map implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree with the additional property that
/// recently accessed items are quick to access again. A successful `get` or `get_mut` "splays"
/// the accessed node to the root of the tree; `insert` and `remove` leave the accessed node where
/// it is. Because lookups restructure the tree, `get` requires a mutable reference. Use `peek` or
/// `contains_key` for lookups through a shared reference.
///
/// Keys are ordered by the comparator supplied at creation. An optional release callback is given
/// ownership of every key-value pair whose association ends: on replacement by a duplicate key, on
/// removal, and on `clear` or drop.
///
/// # Examples
///
/// ```
/// use keyed_collections::splay_tree::SplayMap;
///
/// let mut map = SplayMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map[&0], 1);
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.get(&3), Some(&4));
/// assert_eq!(map.root_key(), Some(&3));
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// map[&0] = 2;
/// assert!(map.remove(&0));
/// assert!(!map.remove(&1));
/// ```
pub struct SplayMap<T, U> {
    tree: Tree<T, U>,
    comparator: Box<dyn Comparator<T>>,
    release: Option<Box<dyn Release<T, U>>>,
}

impl<T, U> SplayMap<T, U> {
    /// Constructs a new, empty `SplayMap<T, U>` ordered by the keys' `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// ```
    pub fn new() -> Self
    where
        T: Ord,
    {
        Self::with_comparator(NaturalOrder)
    }

    /// Constructs a new, empty `SplayMap<T, U>` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.min(), Some(&2));
    /// ```
    pub fn with_comparator<C>(comparator: C) -> Self
    where
        C: Comparator<T> + 'static,
    {
        Self::from_parts(Box::new(comparator), None, 0)
    }

    /// Constructs a new, empty `SplayMap<T, U>` ordered by `comparator` that hands every
    /// terminated key-value pair to `release`.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    /// use std::cell::RefCell;
    /// use std::rc::Rc;
    ///
    /// let released = Rc::new(RefCell::new(Vec::new()));
    /// let log = Rc::clone(&released);
    /// let mut map = SplayMap::with_comparator_and_release(
    ///     |a: &u32, b: &u32| a.cmp(b),
    ///     move |key: u32, value: u32| log.borrow_mut().push((key, value)),
    /// );
    /// map.insert(1, 1);
    /// map.insert(1, 2);
    /// assert_eq!(*released.borrow(), vec![(1, 1)]);
    /// ```
    pub fn with_comparator_and_release<C, R>(comparator: C, release: R) -> Self
    where
        C: Comparator<T> + 'static,
        R: Release<T, U> + 'static,
    {
        Self::from_parts(Box::new(comparator), Some(Box::new(release)), 0)
    }

    pub(crate) fn from_parts(
        comparator: Box<dyn Comparator<T>>,
        release: Option<Box<dyn Release<T, U>>>,
        capacity: usize,
    ) -> Self {
        SplayMap {
            tree: Tree::with_capacity(capacity),
            comparator,
            release,
        }
    }

    fn release_entry(&mut self, entry: Entry<T, U>) {
        let (key, value) = entry.into_pair();
        if let Some(release) = self.release.as_mut() {
            release.release(key, value);
        }
    }

    /// Inserts a key-value pair into the map. Returns `true` if the key was not already present.
    /// Otherwise the existing pair is replaced in place and handed to the release callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert!(map.insert(1, 1));
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert!(!map.insert(1, 2));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> bool {
        match self.tree.insert(&*self.comparator, key, value) {
            Some(old) => {
                self.release_entry(old);
                false
            },
            None => true,
        }
    }

    /// Removes a key from the map, handing its pair to the release callback. Returns `false` if
    /// the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert!(map.remove(&1));
    /// assert!(!map.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &T) -> bool {
        match self.tree.remove(&*self.comparator, key) {
            Some(entry) => {
                self.release_entry(entry);
                true
            },
            None => false,
        }
    }

    /// Returns an immutable reference to the value associated with a particular key and splays
    /// the key to the root. Returns `None`, leaving the tree untouched, if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&2), Some(&2));
    /// assert_eq!(map.root_key(), Some(&2));
    /// ```
    pub fn get(&mut self, key: &T) -> Option<&U> {
        match self.tree.access(&*self.comparator, key) {
            Some(id) => Some(&self.tree.entry(id).value),
            None => None,
        }
    }

    /// Returns a mutable reference to the value associated with a particular key and splays the
    /// key to the root. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &T) -> Option<&mut U> {
        match self.tree.access(&*self.comparator, key) {
            Some(id) => Some(&mut self.tree.entry_mut(id).value),
            None => None,
        }
    }

    /// Returns an immutable reference to the value associated with a particular key without
    /// splaying the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// assert_eq!(map.peek(&2), Some(&2));
    /// assert_eq!(map.root_key(), Some(&1));
    /// ```
    pub fn peek(&self, key: &T) -> Option<&U> {
        self.tree.peek(&*self.comparator, key).map(|entry| &entry.value)
    }

    /// Checks if a key exists in the map. Note that `contains_key` does not splay the tree in
    /// order to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key(&self, key: &T) -> bool {
        self.peek(key).is_some()
    }

    /// Returns the number of elements in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
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
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let map: SplayMap<u32, u32> = SplayMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the map, handing every key-value pair to the release callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        let SplayMap {
            ref mut tree,
            ref mut release,
            ..
        } = self;
        let released = tree.drain(|entry| {
            let (key, value) = entry.into_pair();
            if let Some(release) = release.as_mut() {
                release.release(key, value);
            }
        });
        if released > 0 {
            debug!("tore down splay tree holding {} entries", released);
        }
    }

    /// Returns the key currently at the root of the tree. After a successful `get`, this is the
    /// key that was looked up.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// assert_eq!(map.root_key(), None);
    /// map.insert(2, 2);
    /// map.insert(1, 1);
    /// assert_eq!(map.root_key(), Some(&2));
    /// map.get(&1);
    /// assert_eq!(map.root_key(), Some(&1));
    /// ```
    pub fn root_key(&self) -> Option<&T> {
        self.tree.root().map(|id| &self.tree.entry(id).key)
    }

    /// Returns a key in the map that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist. Note that `floor` does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.tree.floor(&*self.comparator, key).map(|entry| &entry.key)
    }

    /// Returns a key in the map that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist. Note that `ceil` does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.tree.ceil(&*self.comparator, key).map(|entry| &entry.key)
    }

    /// Returns the minimum key of the map. Returns `None` if the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
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
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree.max().map(|entry| &entry.key)
    }

    /// Calls `visitor` on every key-value pair in order. Does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(2, 20);
    /// map.insert(1, 10);
    ///
    /// let mut sum = 0;
    /// map.for_each(|key, value| sum += key * value);
    /// assert_eq!(sum, 50);
    /// ```
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&T, &U),
    {
        for (key, value) in self.iter() {
            visitor(key, value);
        }
    }

    /// Returns an iterator over the map. The iterator will yield key-value pairs using in-order
    /// traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplayMapIter<T, U> {
        SplayMapIter {
            tree: &self.tree,
            current: self.tree.root(),
            stack: Vec::new(),
        }
    }

    /// Returns a mutable iterator over the map. The iterator will yield key-value pairs using
    /// in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplayMap;
    ///
    /// let mut map = SplayMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    ///
    /// for (key, value) in &mut map {
    ///     *value += 1;
    /// }
    ///
    /// let mut iterator = map.iter_mut();
    /// assert_eq!(iterator.next(), Some((&1, &mut 2)));
    /// assert_eq!(iterator.next(), Some((&2, &mut 3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter_mut(&mut self) -> SplayMapIterMut<T, U> {
        SplayMapIterMut {
            current: self.tree.root(),
            nodes: self.tree.nodes_mut(),
            stack: Vec::new(),
        }
    }
}

impl<T, U> Drop for SplayMap<T, U> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, U> IntoIterator for SplayMap<T, U> {
    type IntoIter = SplayMapIntoIter<T, U>;
    type Item = (T, U);

    /// Consumes the map. Yielded pairs pass to the caller and are not released. Pairs still in
    /// the iterator when it is dropped are handed to the release callback.
    fn into_iter(mut self) -> Self::IntoIter {
        let tree = mem::replace(&mut self.tree, Tree::with_capacity(0));
        Self::IntoIter {
            current: tree.root(),
            tree,
            stack: Vec::new(),
            release: self.release.take(),
        }
    }
}

impl<'a, T, U> IntoIterator for &'a SplayMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = SplayMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, U> IntoIterator for &'a mut SplayMap<T, U>
where
    T: 'a,
    U: 'a,
{
    type IntoIter = SplayMapIterMut<'a, T, U>;
    type Item = (&'a T, &'a mut U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

/// An owning iterator for `SplayMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned entries.
pub struct SplayMapIntoIter<T, U> {
    tree: Tree<T, U>,
    current: Option<NodeId>,
    stack: Vec<NodeId>,
    release: Option<Box<dyn Release<T, U>>>,
}

impl<T, U> Iterator for SplayMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree[id].left;
        }
        let id = self.stack.pop()?;
        let Node { entry, right, .. } = self.tree.free_node(id);
        self.current = right;
        Some(entry.into_pair())
    }
}

impl<T, U> Drop for SplayMapIntoIter<T, U> {
    fn drop(&mut self) {
        let mut released = 0;
        while let Some((key, value)) = self.next() {
            if let Some(release) = self.release.as_mut() {
                release.release(key, value);
            }
            released += 1;
        }
        if released > 0 {
            debug!("released {} entries left in a consumed splay tree", released);
        }
    }
}

/// An iterator for `SplayMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields immutable references.
pub struct SplayMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    tree: &'a Tree<T, U>,
    current: Option<NodeId>,
    stack: Vec<NodeId>,
}

impl<'a, T, U> SplayMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    fn next_id(&mut self) -> Option<NodeId> {
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = self.tree[id].left;
        }
        let id = self.stack.pop()?;
        self.current = self.tree[id].right;
        Some(id)
    }
}

impl<'a, T, U> Iterator for SplayMapIter<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next_id()?;
        let tree = self.tree;
        let Entry { ref key, ref value } = tree[id].entry;
        Some((key, value))
    }
}

/// A mutable iterator for `SplayMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields mutable references.
pub struct SplayMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    nodes: SlotsMut<'a, Node<T, U>>,
    current: Option<NodeId>,
    stack: Vec<NodeId>,
}

impl<'a, T, U> Iterator for SplayMapIterMut<'a, T, U>
where
    T: 'a,
    U: 'a,
{
    type Item = (&'a T, &'a mut U);

    fn next(&mut self) -> Option<Self::Item> {
        // A node is read only before it is yielded, so yielded borrows never alias.
        while let Some(id) = self.current {
            self.stack.push(id);
            self.current = unsafe { self.nodes.get(id) }.left;
        }
        let id = self.stack.pop()?;
        let node = unsafe { self.nodes.get(id) };
        self.current = node.right;
        let Entry {
            ref key,
            ref mut value,
        } = node.entry;
        Some((key, value))
    }
}

impl<T, U> Default for SplayMap<T, U>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> fmt::Debug for SplayMap<T, U>
where
    T: fmt::Debug,
    U: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq for SplayMap<T, U>
where
    T: PartialEq,
    U: PartialEq,
{
    fn eq(&self, other: &SplayMap<T, U>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U> Eq for SplayMap<T, U>
where
    T: Eq,
    U: Eq,
{
}

impl<T, U> Extend<(T, U)> for SplayMap<T, U> {
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (T, U)>,
    {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<T, U> FromIterator<(T, U)> for SplayMap<T, U>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (T, U)>,
    {
        let mut map = SplayMap::new();
        map.extend(iter);
        map
    }
}

impl<T, U> Index<&T> for SplayMap<T, U> {
    type Output = U;

    fn index(&self, key: &T) -> &Self::Output {
        self.peek(key).expect("Error: key does not exist.")
    }
}

impl<T, U> IndexMut<&T> for SplayMap<T, U> {
    fn index_mut(&mut self, key: &T) -> &mut Self::Output {
        self.get_mut(key).expect("Error: key does not exist.")
    }
}

impl<T, U> Serialize for SplayMap<T, U>
where
    T: Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// Size hints come from the input and only bound the initial allocation.
const MAX_PREALLOCATED_ENTRIES: usize = 4096;

struct SplayMapVisitor<T, U> {
    marker: PhantomData<fn() -> SplayMap<T, U>>,
}

impl<'de, T, U> Visitor<'de> for SplayMapVisitor<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    type Value = SplayMap<T, U>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let capacity = cmp::min(access.size_hint().unwrap_or(0), MAX_PREALLOCATED_ENTRIES);
        let mut map = SplayMap::from_parts(Box::new(NaturalOrder), None, capacity);
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U> Deserialize<'de> for SplayMap<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SplayMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::SplayMap;
    use serde_test::{assert_de_tokens, assert_tokens, Token};
    use std::cell::RefCell;
    use std::rc::Rc;

    type Released = Rc<RefCell<Vec<(u32, u32)>>>;

    fn tracked() -> (SplayMap<u32, u32>, Released) {
        let released = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&released);
        let map = SplayMap::with_comparator_and_release(
            |a: &u32, b: &u32| a.cmp(b),
            move |key: u32, value: u32| log.borrow_mut().push((key, value)),
        );
        (map, released)
    }

    #[test]
    fn test_len_empty() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        assert!(map.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
        assert_eq!(map.root_key(), None);
    }

    #[test]
    fn test_insert() {
        let mut map = SplayMap::new();
        assert!(map.insert(1, 1));
        assert!(map.contains_key(&1));
        assert_eq!(map.get(&1), Some(&1));
    }

    #[test]
    fn test_insert_replace() {
        let mut map = SplayMap::new();
        assert!(map.insert(1, 1));
        assert!(!map.insert(1, 3));
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        assert!(map.remove(&1));
        assert!(!map.contains_key(&1));
        assert!(map.is_empty());
    }

    #[test]
    fn test_get_empty() {
        let mut map: SplayMap<u32, u32> = SplayMap::new();
        assert_eq!(map.get(&1), None);
        assert!(!map.remove(&1));
    }

    #[test]
    fn test_get_splays() {
        let mut map = SplayMap::new();
        for key in &[4, 2, 6, 1, 3, 5, 7] {
            map.insert(*key, key * 10);
        }
        assert_eq!(map.root_key(), Some(&4));
        assert_eq!(map.get(&3), Some(&30));
        assert_eq!(map.root_key(), Some(&3));
        assert_eq!(map.get(&8), None);
        assert_eq!(map.root_key(), Some(&3));
    }

    #[test]
    fn test_peek_does_not_splay() {
        let mut map = SplayMap::new();
        map.insert(2, 2);
        map.insert(1, 1);
        assert_eq!(map.peek(&1), Some(&1));
        assert_eq!(map.peek(&3), None);
        assert_eq!(map.root_key(), Some(&2));
    }

    #[test]
    fn test_min_max() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_get_mut() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    #[test]
    fn test_custom_comparator() {
        let mut map = SplayMap::with_comparator(|a: &&str, b: &&str| {
            a.len().cmp(&b.len()).then(a.cmp(b))
        });
        map.insert("ccc", 3);
        map.insert("a", 1);
        map.insert("bb", 2);
        map.insert("aa", 4);

        assert_eq!(
            map.iter().map(|(key, _)| *key).collect::<Vec<&str>>(),
            vec!["a", "aa", "bb", "ccc"],
        );
        assert_eq!(map.get(&"bb"), Some(&2));
    }

    #[test]
    fn test_release_on_replace() {
        let (mut map, released) = tracked();
        map.insert(1, 10);
        map.insert(1, 20);
        assert_eq!(*released.borrow(), vec![(1, 10)]);
        assert_eq!(map.get(&1), Some(&20));
    }

    #[test]
    fn test_release_on_remove() {
        let (mut map, released) = tracked();
        map.insert(1, 10);
        map.insert(2, 20);
        assert!(map.remove(&1));
        assert!(!map.remove(&1));
        assert_eq!(*released.borrow(), vec![(1, 10)]);
    }

    #[test]
    fn test_release_on_clear_and_drop() {
        let (mut map, released) = tracked();
        map.insert(1, 10);
        map.insert(2, 20);
        map.clear();
        released.borrow_mut().sort();
        assert_eq!(*released.borrow(), vec![(1, 10), (2, 20)]);

        map.insert(3, 30);
        drop(map);
        assert_eq!(released.borrow().len(), 3);
        assert_eq!(released.borrow()[2], (3, 30));
    }

    #[test]
    fn test_no_release_for_missing_keys() {
        let (mut map, released) = tracked();
        assert_eq!(map.get(&1), None);
        assert!(!map.remove(&1));
        drop(map);
        assert!(released.borrow().is_empty());
    }

    #[test]
    fn test_into_iter_does_not_release() {
        let (mut map, released) = tracked();
        map.insert(2, 20);
        map.insert(1, 10);
        assert_eq!(map.into_iter().collect::<Vec<(u32, u32)>>(), vec![(1, 10), (2, 20)]);
        assert!(released.borrow().is_empty());
    }

    #[test]
    fn test_into_iter() {
        let mut map = SplayMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_into_iter_partial() {
        let mut map = SplayMap::new();
        map.insert(1, String::from("a"));
        map.insert(2, String::from("b"));
        let mut iter = map.into_iter();
        assert_eq!(iter.next(), Some((1, String::from("a"))));
    }

    #[test]
    fn test_into_iter_partial_releases_rest() {
        let (mut map, released) = tracked();
        map.insert(2, 20);
        map.insert(1, 10);
        map.insert(3, 30);
        {
            let mut iter = map.into_iter();
            assert_eq!(iter.next(), Some((1, 10)));
        }
        let mut remaining = released.borrow().clone();
        remaining.sort();
        assert_eq!(remaining, vec![(2, 20), (3, 30)]);
    }

    #[test]
    fn test_iter() {
        let mut map = SplayMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
    }

    #[test]
    fn test_iter_mut() {
        let mut map = SplayMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        for (_, value) in &mut map {
            *value += 1;
        }

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &3), (&3, &5), (&5, &7)],
        );
    }

    #[test]
    fn test_iter_mut_after_remove() {
        let mut map = SplayMap::new();
        for key in &[4, 2, 6, 1, 3, 5, 7] {
            map.insert(*key, *key * 10);
        }
        assert!(map.remove(&2));
        assert!(map.remove(&6));
        map.get(&5);

        for (_, value) in map.iter_mut().take(2) {
            *value += 1;
        }

        assert_eq!(
            map.iter().map(|(key, value)| (*key, *value)).collect::<Vec<(i32, i32)>>(),
            vec![(1, 11), (3, 31), (4, 40), (5, 50), (7, 70)],
        );
    }

    #[test]
    fn test_for_each() {
        let mut map = SplayMap::new();
        map.insert(3, 4);
        map.insert(1, 2);
        map.get(&3);

        let mut visited = Vec::new();
        map.for_each(|key, value| visited.push((*key, *value)));
        assert_eq!(visited, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_index() {
        let mut map = SplayMap::new();
        map.insert(1, 1);
        map[&1] += 4;
        assert_eq!(map[&1], 5);
    }

    #[test]
    #[should_panic]
    fn test_index_missing() {
        let map: SplayMap<u32, u32> = SplayMap::new();
        let value = map[&1];
        assert_eq!(value, 0);
    }

    #[test]
    fn test_from_iter_eq_debug() {
        let map: SplayMap<u32, u32> = vec![(3, 30), (1, 10), (2, 20)].into_iter().collect();
        let mut other = SplayMap::new();
        other.extend(vec![(1, 10), (2, 20), (3, 30)]);
        other.get(&3);

        assert_eq!(map, other);
        assert_eq!(format!("{:?}", map), "{1: 10, 2: 20, 3: 30}");
    }

    #[test]
    fn test_serde_tokens() {
        let mut map = SplayMap::new();
        map.insert(2u32, 20u32);
        map.insert(1u32, 10u32);

        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::U32(1),
                Token::U32(10),
                Token::U32(2),
                Token::U32(20),
                Token::MapEnd,
            ],
        );
    }

    #[test]
    fn test_deserialize_oversized_len_hint() {
        let mut map = SplayMap::new();
        map.insert(1u32, 10u32);

        assert_de_tokens(
            &map,
            &[
                Token::Map {
                    len: Some(usize::MAX / 2),
                },
                Token::U32(1),
                Token::U32(10),
                Token::MapEnd,
            ],
        );
    }
}
