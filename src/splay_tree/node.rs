use crate::entry::Entry;
use crate::splay_tree::arena::NodeId;
use std::mem;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub struct Node<T, U> {
    pub entry: Entry<T, U>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<T, U> Node<T, U> {
    pub fn new(key: T, value: U) -> Self {
        Node {
            entry: Entry::new(key, value),
            left: None,
            right: None,
        }
    }

    pub fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    /// Replaces the child link on `side` and returns the previous one.
    pub fn set_child(&mut self, side: Side, child: Option<NodeId>) -> Option<NodeId> {
        match side {
            Side::Left => mem::replace(&mut self.left, child),
            Side::Right => mem::replace(&mut self.right, child),
        }
    }
}
