//! Generic in-memory keyed containers whose ordering is supplied by the caller.
//!
//! Every container is created with a [`Comparator`](callback::Comparator) that defines the key
//! order and, optionally, a [`Release`](callback::Release) callback that receives each key-value
//! pair exactly once when the association is permanently terminated (replaced, removed, or torn
//! down with the container).
//!
//! # Examples
//!
//! ```
//! use keyed_collections::splay_tree::SplayMap;
//!
//! let mut map = SplayMap::with_comparator(|a: &&str, b: &&str| b.cmp(a));
//! map.insert("a", 1);
//! map.insert("b", 2);
//!
//! assert_eq!(map.get(&"a"), Some(&1));
//! assert_eq!(map.root_key(), Some(&"a"));
//! assert_eq!(map.iter().collect::<Vec<_>>(), vec![(&"b", &2), (&"a", &1)]);
//! ```

pub mod callback;
mod entry;
pub mod splay_tree;
