//! Self-adjusting binary search tree with the additional property that recently accessed elements
//! are quick to access again.
//!
//! Keys are ordered by a caller-supplied [`Comparator`](crate::callback::Comparator). A successful
//! lookup through [`SplayMap::get`] moves the accessed node to the root with a sequence of zig,
//! zig-zig and zig-zag rotations, so lookups need exclusive access to the map. Insertions and
//! removals do not splay.

mod arena;
mod builder;
mod map;
mod node;
mod set;
mod tree;

pub use self::builder::{Config, SplayMapBuilder};
pub use self::map::{SplayMap, SplayMapIntoIter, SplayMapIter, SplayMapIterMut};
pub use self::set::{SplaySet, SplaySetIntoIter, SplaySetIter};

use std::error;
use std::fmt;
use std::result;

/// Errors raised while creating a splay tree.
#[derive(Debug, Eq, PartialEq)]
pub enum Error {
    /// The map was built without a comparator.
    MissingComparator,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingComparator => {
                write!(f, "a comparator is required to create a splay tree")
            },
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
