use crate::callback::{Comparator, Release};
use crate::splay_tree::map::SplayMap;
use crate::splay_tree::{Error, Result};
use log::debug;
use serde_derive::{Deserialize, Serialize};

/// Tunables for a splay tree that do not involve caller behavior.
///
/// # Examples
///
/// ```
/// use keyed_collections::splay_tree::{Config, SplayMap, SplayMapBuilder};
///
/// let config = Config { capacity: 64 };
/// let map: SplayMap<u32, String> = SplayMapBuilder::from_config(config)
///     .comparator(|a: &u32, b: &u32| a.cmp(b))
///     .build()
///     .unwrap();
/// assert!(map.is_empty());
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    /// Number of nodes to reserve storage for up front.
    pub capacity: usize,
}

/// Builds a `SplayMap<T, U>` from a comparator, an optional release callback and a `Config`.
///
/// # Examples
///
/// ```
/// use keyed_collections::splay_tree::{Error, SplayMapBuilder};
///
/// let mut map = SplayMapBuilder::new()
///     .capacity(16)
///     .comparator(|a: &u32, b: &u32| a.cmp(b))
///     .release(|key: u32, value: u32| println!("released {} -> {}", key, value))
///     .build()
///     .unwrap();
/// map.insert(1, 2);
///
/// let result = SplayMapBuilder::<u32, u32>::new().build();
/// assert_eq!(result.err(), Some(Error::MissingComparator));
/// ```
pub struct SplayMapBuilder<T, U> {
    config: Config,
    comparator: Option<Box<dyn Comparator<T>>>,
    release: Option<Box<dyn Release<T, U>>>,
}

impl<T, U> SplayMapBuilder<T, U> {
    /// Constructs a builder with the default `Config` and no callbacks.
    pub fn new() -> Self {
        Self::from_config(Config::default())
    }

    pub fn from_config(config: Config) -> Self {
        SplayMapBuilder {
            config,
            comparator: None,
            release: None,
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Sets the comparator that orders the keys. Required.
    pub fn comparator<C>(mut self, comparator: C) -> Self
    where
        C: Comparator<T> + 'static,
    {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Sets the callback that receives every terminated key-value pair.
    pub fn release<R>(mut self, release: R) -> Self
    where
        R: Release<T, U> + 'static,
    {
        self.release = Some(Box::new(release));
        self
    }

    /// Creates the map. Fails with `Error::MissingComparator` if no comparator was set.
    pub fn build(self) -> Result<SplayMap<T, U>> {
        let SplayMapBuilder {
            config,
            comparator,
            release,
        } = self;
        match comparator {
            Some(comparator) => Ok(SplayMap::from_parts(comparator, release, config.capacity)),
            None => {
                debug!("refusing to build a splay tree without a comparator");
                Err(Error::MissingComparator)
            },
        }
    }
}

impl<T, U> Default for SplayMapBuilder<T, U> {
    fn default() -> Self {
        Self::new()
    }
}
