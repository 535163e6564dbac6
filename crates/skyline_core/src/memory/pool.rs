//! # Generational Pool
//!
//! Growable slot storage for objects that are created and destroyed in
//! batches (streamed chunk content).
//!
//! Every slot carries a generation counter. A [`Handle`] remembers the
//! generation it was issued with, so a handle to a freed slot never resolves
//! to whatever is stored there later.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Typed handle to an object stored in a [`Pool`].
///
/// The handle is split into two parts:
/// - Index into the slot array
/// - Generation counter for detecting stale references
pub struct Handle<T> {
    index: u32,
    generation: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    #[inline]
    const fn new(index: u32, generation: u32) -> Self {
        Self {
            index,
            generation,
            _marker: PhantomData,
        }
    }

    /// Returns the slot index portion of the handle.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the generation portion of the handle.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Packs the handle into a single `u64` (generation in the upper 32 bits).
    #[inline]
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.generation as u64) << 32) | (self.index as u64)
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Handle<T> {}

impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.generation == other.generation
    }
}

impl<T> Eq for Handle<T> {}

impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bits().hash(state);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.index, self.generation)
    }
}

struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// A pool of objects addressed by generational handles.
///
/// Insertion and removal are O(1). Freed slots are reused, with their
/// generation bumped so that old handles stay invalid.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread or wrap in a mutex.
///
/// # Example
///
/// ```rust
/// use skyline_core::Pool;
///
/// let mut pool: Pool<&str> = Pool::new();
/// let a = pool.insert("tower");
/// let b = pool.insert("spire");
///
/// assert_eq!(pool.remove(a), Some("tower"));
/// assert!(pool.get(a).is_none());
/// assert_eq!(pool.get(b), Some(&"spire"));
/// ```
pub struct Pool<T> {
    /// Slot storage.
    slots: Vec<Slot<T>>,
    /// Free list - indices of vacant slots.
    free_list: Vec<u32>,
    /// Number of occupied slots.
    len: usize,
}

impl<T> Pool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Returns the number of live objects.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the pool holds no live objects.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores an object and returns its handle.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` slots would be required.
    pub fn insert(&mut self, value: T) -> Handle<T> {
        self.len += 1;

        if let Some(index) = self.free_list.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return Handle::new(index, slot.generation);
        }

        let index = u32::try_from(self.slots.len()).expect("pool exceeded u32::MAX slots");
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        Handle::new(index, 0)
    }

    /// Removes an object.
    ///
    /// Returns `None` if the handle is stale or was never issued by this pool.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<T> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.len -= 1;

        Some(value)
    }

    /// Gets a reference to a live object.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation == handle.generation {
            slot.value.as_ref()
        } else {
            None
        }
    }

    /// Returns true if the handle refers to a live object.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.get(handle).is_some()
    }

    /// Removes every object. Handles issued before the call stay invalid.
    pub fn clear(&mut self) {
        self.free_list.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            // Slot count is bounded by `insert`.
            self.free_list.push(u32::try_from(index).unwrap_or(u32::MAX));
        }
        self.len = 0;
    }

    /// Iterates over live objects in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            slot.value
                .as_ref()
                .map(|value| (Handle::new(index, slot.generation), value))
        })
    }

    /// Iterates over live objects without their handles.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_insert_remove() {
        let mut pool: Pool<u32> = Pool::new();

        let h1 = pool.insert(42);
        let h2 = pool.insert(7);
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.get(h1), Some(&42));

        assert_eq!(pool.remove(h1), Some(42));
        assert_eq!(pool.len(), 1);
        assert!(pool.get(h1).is_none());
        assert_eq!(pool.get(h2), Some(&7));
    }

    #[test]
    fn test_stale_handle_after_reuse() {
        let mut pool: Pool<u32> = Pool::new();

        let old = pool.insert(1);
        pool.remove(old);
        let new = pool.insert(2);

        // Same slot, different generation
        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());
        assert!(pool.get(old).is_none());
        assert_eq!(pool.remove(old), None);
        assert_eq!(pool.get(new), Some(&2));
    }

    #[test]
    fn test_clear_invalidates_handles() {
        let mut pool: Pool<u32> = Pool::new();
        let handles: Vec<_> = (0..5).map(|i| pool.insert(i)).collect();

        pool.clear();
        assert!(pool.is_empty());
        for handle in &handles {
            assert!(!pool.contains(*handle));
        }

        // Slots are reused from the lowest index
        let reused = pool.insert(99);
        assert_eq!(reused.index(), 0);
        assert!(!handles.contains(&reused));
    }

    #[test]
    fn test_iter_skips_vacant_slots() {
        let mut pool: Pool<u32> = Pool::new();
        let a = pool.insert(10);
        let b = pool.insert(20);
        let c = pool.insert(30);
        pool.remove(b);

        let live: Vec<_> = pool.iter().collect();
        assert_eq!(live, vec![(a, &10), (c, &30)]);
        assert_eq!(pool.values().copied().sum::<u32>(), 40);
    }
}
