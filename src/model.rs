//! Growable array with explicit capacity and change notifications.
//!
//! [`DynamicArray`] keeps its own capacity counter instead of relying on
//! `Vec`'s allocator-chosen one, so the visualization can show exactly when
//! a reallocation happens. Observers registered with
//! [`DynamicArray::subscribe`] see one [`Change`] per mutation.
//!
//! ```
//! use dynarray_viz::DynamicArray;
//!
//! let mut arr = DynamicArray::new();
//! arr.add(5);
//! arr.add(7);
//! assert_eq!((arr.len(), arr.capacity()), (2, 2));
//!
//! arr.add(9);
//! assert_eq!((arr.len(), arr.capacity()), (3, 4));
//! assert_eq!(arr.remove_last(), Ok(9));
//! ```

use log::debug;

use crate::error::EmptyError;

/// Value held in one slot.
pub type Element = i32;

/// Capacity of a freshly created array.
pub const DEFAULT_CAPACITY: usize = 2;

/// What a mutation did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeKind {
    /// `value` was appended at index `size - 1`.
    Added(Element),
    /// `value` was taken from index `size`.
    Removed(Element),
    /// Capacity was doubled from `from`.
    Grown { from: usize },
}

/// Notification emitted after every successful mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    /// Element count after the mutation.
    pub size: usize,
    /// Capacity after the mutation.
    pub capacity: usize,
}

/// Handle returned by [`DynamicArray::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Observer = Box<dyn FnMut(&Change)>;

/// In-memory growable sequence that tracks capacity explicitly.
///
/// Invariant: `len() <= capacity()`, and capacity never decreases.
pub struct DynamicArray {
    items: Vec<Element>,
    capacity: usize,
    observers: Vec<(SubscriptionId, Observer)>,
    next_id: u32,
}

impl DynamicArray {
    /// Empty array with [`DEFAULT_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Empty array with the given starting capacity. Zero is allowed; the
    /// first grow takes it to one.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when the next `add` will have to grow first.
    pub fn is_full(&self) -> bool {
        self.items.len() == self.capacity
    }

    pub fn as_slice(&self) -> &[Element] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<Element> {
        self.items.get(index).copied()
    }

    /// Append `value`, doubling capacity first if the array is full.
    ///
    /// Emits [`ChangeKind::Grown`] (when a grow was needed) followed by
    /// [`ChangeKind::Added`].
    pub fn add(&mut self, value: Element) {
        if self.is_full() {
            self.grow();
        }
        self.items.push(value);
        debug!("add {value} -> size {}, capacity {}", self.len(), self.capacity);
        self.emit(ChangeKind::Added(value));
    }

    /// Remove and return the last element. Capacity is left as is.
    pub fn remove_last(&mut self) -> Result<Element, EmptyError> {
        let value = self.items.pop().ok_or(EmptyError)?;
        debug!("remove {value} -> size {}, capacity {}", self.len(), self.capacity);
        self.emit(ChangeKind::Removed(value));
        Ok(value)
    }

    /// Double the capacity (or set it to one when it is zero). Existing
    /// elements keep their order.
    pub fn grow(&mut self) {
        let from = self.capacity;
        self.capacity = from.saturating_mul(2).max(1);
        debug!("grow {from} -> {}", self.capacity);
        self.emit(ChangeKind::Grown { from });
    }

    /// Register `observer`; it is called synchronously after each mutation.
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&Change) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn emit(&mut self, kind: ChangeKind) {
        let change = Change {
            kind,
            size: self.items.len(),
            capacity: self.capacity,
        };
        for (_, observer) in &mut self.observers {
            observer(&change);
        }
    }
}

impl Default for DynamicArray {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DynamicArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicArray")
            .field("items", &self.items)
            .field("capacity", &self.capacity)
            .field("observers", &self.observers.len())
            .finish()
    }
}
