use crate::callback::Comparator;
use crate::splay_tree::map::{SplayMap, SplayMapIntoIter, SplayMapIter};

/// An ordered set implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree with the additional property that
/// recently accessed items are quick to access again.
///
/// # Examples
///
/// ```
/// use keyed_collections::splay_tree::SplaySet;
///
/// let mut set = SplaySet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.ceil(&2), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct SplaySet<T> {
    map: SplayMap<T, ()>,
}

impl<T> SplaySet<T> {
    /// Constructs a new, empty `SplaySet<T>` ordered by the keys' `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// ```
    pub fn new() -> Self
    where
        T: Ord,
    {
        SplaySet {
            map: SplayMap::new(),
        }
    }

    /// Constructs a new, empty `SplaySet<T>` ordered by `comparator`.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::with_comparator(|a: &u32, b: &u32| b.cmp(a));
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.min(), Some(&2));
    /// ```
    pub fn with_comparator<C>(comparator: C) -> Self
    where
        C: Comparator<T> + 'static,
    {
        SplaySet {
            map: SplayMap::with_comparator(comparator),
        }
    }

    /// Inserts a key into the set. Returns `true` if the key was not already present; otherwise
    /// the stored key is replaced.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// ```
    pub fn insert(&mut self, key: T) -> bool {
        self.map.insert(key, ())
    }

    /// Removes a key from the set. Returns `false` if the key does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove(&mut self, key: &T) -> bool {
        self.map.remove(key)
    }

    /// Returns the stored key equal to `key` and splays it to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// assert_eq!(set.get(&1), Some(&1));
    /// assert_eq!(set.get(&3), None);
    /// ```
    pub fn get(&mut self, key: &T) -> Option<&T> {
        if self.map.get(key).is_some() {
            self.map.root_key()
        } else {
            None
        }
    }

    /// Checks if a key exists in the set without splaying the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains(&self, key: &T) -> bool {
        self.map.contains_key(key)
    }

    /// Returns the number of elements in the set.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Clears the set, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None` if
    /// such a key does not exist.
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.map.floor(key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist.
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.map.ceil(key)
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    pub fn min(&self) -> Option<&T> {
        self.map.min()
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    pub fn max(&self) -> Option<&T> {
        self.map.max()
    }

    /// Returns an iterator over the set. The iterator will yield keys using in-order traversal.
    ///
    /// # Examples
    ///
    /// ```
    /// use keyed_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(2);
    /// set.insert(1);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&2));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> SplaySetIter<T> {
        SplaySetIter {
            map_iter: self.map.iter(),
        }
    }
}

impl<T> IntoIterator for SplaySet<T> {
    type IntoIter = SplaySetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            map_iter: self.map.into_iter(),
        }
    }
}

impl<'a, T> IntoIterator for &'a SplaySet<T>
where
    T: 'a,
{
    type IntoIter = SplaySetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `SplaySet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct SplaySetIntoIter<T> {
    map_iter: SplayMapIntoIter<T, ()>,
}

impl<T> Iterator for SplaySetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(key, _)| key)
    }
}

/// An iterator for `SplaySet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct SplaySetIter<'a, T>
where
    T: 'a,
{
    map_iter: SplayMapIter<'a, T, ()>,
}

impl<'a, T> Iterator for SplaySetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.map_iter.next().map(|(key, _)| key)
    }
}

impl<T> Default for SplaySet<T>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::SplaySet;

    #[test]
    fn test_len_empty() {
        let set: SplaySet<u32> = SplaySet::new();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
    }

    #[test]
    fn test_insert_remove() {
        let mut set = SplaySet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
        assert!(set.remove(&1));
        assert!(!set.contains(&1));
    }

    #[test]
    fn test_get_splays() {
        let mut set = SplaySet::new();
        for key in 0..10 {
            set.insert(key);
        }
        assert_eq!(set.get(&7), Some(&7));
        assert_eq!(set.map.root_key(), Some(&7));
        assert_eq!(set.get(&11), None);
    }

    #[test]
    fn test_min_max_floor_ceil() {
        let mut set = SplaySet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
        assert_eq!(set.floor(&4), Some(&3));
        assert_eq!(set.ceil(&4), Some(&5));
        assert_eq!(set.ceil(&6), None);
    }

    #[test]
    fn test_into_iter() {
        let mut set = SplaySet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut set = SplaySet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }
}
