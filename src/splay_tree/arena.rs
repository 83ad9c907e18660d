use std::marker::PhantomData;
use std::mem;
use std::ops::{Index, IndexMut};

/// A stable handle to a slot in an `Arena<T>`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct NodeId(usize);

enum Slot<T> {
    Occupied(T),
    Vacant(Option<NodeId>),
}

/// Slot storage for tree nodes. Freed slots are chained into a free list and reused before the
/// underlying `Vec` grows, so a `NodeId` stays valid until it is freed.
pub struct Arena<T> {
    head: Option<NodeId>,
    slots: Vec<Slot<T>>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn with_capacity(capacity: usize) -> Self {
        Arena {
            head: None,
            slots: Vec::with_capacity(capacity),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn allocate(&mut self, value: T) -> NodeId {
        self.len += 1;
        match self.head.take() {
            None => {
                self.slots.push(Slot::Occupied(value));
                NodeId(self.slots.len() - 1)
            },
            Some(id) => {
                match mem::replace(&mut self.slots[id.0], Slot::Occupied(value)) {
                    Slot::Vacant(next) => self.head = next,
                    Slot::Occupied(_) => panic!("Error: free list points at an occupied slot."),
                }
                id
            },
        }
    }

    /// Deallocates the value at `id` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds or refers to a vacant slot.
    pub fn free(&mut self, id: NodeId) -> T {
        if id.0 >= self.slots.len() {
            panic!("Error: attempting to free invalid slot.");
        }
        let next = self.head;
        match mem::replace(&mut self.slots[id.0], Slot::Vacant(next)) {
            Slot::Occupied(value) => {
                self.head = Some(id);
                self.len -= 1;
                value
            },
            Slot::Vacant(next) => {
                self.slots[id.0] = Slot::Vacant(next);
                panic!("Error: attempting to free vacant slot.");
            },
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(value)) => Some(value),
            _ => None,
        }
    }

    /// Borrows the slot storage for handing out mutable references to distinct slots one at a
    /// time.
    pub fn slots_mut(&mut self) -> SlotsMut<T> {
        SlotsMut {
            slots: self.slots.as_mut_ptr(),
            len: self.slots.len(),
            marker: PhantomData,
        }
    }

    pub fn clear(&mut self) {
        self.head = None;
        self.slots.clear();
        self.len = 0;
    }
}

/// Exclusive borrow of an arena's slots that yields `&'a mut T` for individual ids.
pub struct SlotsMut<'a, T>
where
    T: 'a,
{
    slots: *mut Slot<T>,
    len: usize,
    marker: PhantomData<&'a mut T>,
}

impl<'a, T> SlotsMut<'a, T>
where
    T: 'a,
{
    /// Returns a mutable reference to the value in the slot at `id`.
    ///
    /// # Safety
    ///
    /// No reference previously returned for the same `id` may still be alive.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of bounds or refers to a vacant slot.
    pub unsafe fn get(&mut self, id: NodeId) -> &'a mut T {
        assert!(id.0 < self.len, "Error: node id out of bounds.");
        match &mut *self.slots.add(id.0) {
            Slot::Occupied(value) => value,
            Slot::Vacant(_) => panic!("Error: node id out of bounds."),
        }
    }
}

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = T;

    fn index(&self, id: NodeId) -> &Self::Output {
        self.get(id).expect("Error: node id out of bounds.")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        self.get_mut(id).expect("Error: node id out of bounds.")
    }
}
