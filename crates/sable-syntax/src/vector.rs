//! Growable array that lives either on the heap or inside an [`Arena`].
//!
//! Arena-backed vectors grow by allocating a fresh block twice the size and
//! copying; the old block is simply abandoned until the arena is emptied or
//! freed. Heap-backed vectors reallocate in place.

use crate::arena::{Arena, ArenaError, Block};

enum Storage<'a, T> {
    Heap(Vec<T>),
    Arena { arena: &'a Arena<T>, block: Block },
}

/// Densely packed dynamic array, usable as a stack.
pub struct Vector<'a, T> {
    storage: Storage<'a, T>,
    count: usize,
    capacity: usize,
}

impl<T: Copy + Default> Vector<'static, T> {
    /// Heap-backed vector with room for `capacity` elements.
    ///
    /// If that much cannot be reserved the vector starts with no room, and
    /// the first `push` reports [`ArenaError::Exhausted`] if it still can't
    /// get any.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let mut items = Vec::new();
        let capacity = match items.try_reserve_exact(capacity) {
            Ok(()) => capacity,
            Err(_) => 0,
        };
        Self {
            storage: Storage::Heap(items),
            count: 0,
            capacity,
        }
    }
}

impl<'a, T: Copy + Default> Vector<'a, T> {
    /// Arena-backed vector with room for `capacity` elements.
    pub fn new_in(arena: &'a Arena<T>, capacity: usize) -> Result<Self, ArenaError> {
        let capacity = capacity.max(1);
        let block = arena.alloc(capacity)?;
        Ok(Self {
            storage: Storage::Arena { arena, block },
            count: 0,
            capacity,
        })
    }

    /// Arena-backed when `arena` is given, heap-backed otherwise.
    pub fn with_arena(arena: Option<&'a Arena<T>>, capacity: usize) -> Result<Self, ArenaError> {
        match arena {
            Some(arena) => Self::new_in(arena, capacity),
            None => {
                let capacity = capacity.max(1);
                let mut items = Vec::new();
                items
                    .try_reserve_exact(capacity)
                    .map_err(|_| ArenaError::Exhausted { requested: capacity })?;
                Ok(Self {
                    storage: Storage::Heap(items),
                    count: 0,
                    capacity,
                })
            }
        }
    }

    /// Append a value, doubling the capacity when full.
    pub fn push(&mut self, value: T) -> Result<(), ArenaError> {
        if self.count == self.capacity {
            self.grow((self.capacity * 2).max(1))?;
        }
        match &mut self.storage {
            Storage::Heap(items) => items.push(value),
            Storage::Arena { arena, block } => arena.set(*block, self.count, value),
        }
        self.count += 1;
        Ok(())
    }

    fn grow(&mut self, capacity: usize) -> Result<(), ArenaError> {
        match &mut self.storage {
            Storage::Heap(items) => {
                items
                    .try_reserve_exact(capacity - items.len())
                    .map_err(|_| ArenaError::Exhausted { requested: capacity })?;
            }
            Storage::Arena { arena, block } => {
                let fresh = arena.alloc(capacity)?;
                arena.copy(*block, fresh, self.count);
                *block = fresh;
            }
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        self.count -= 1;
        match &mut self.storage {
            Storage::Heap(items) => items.pop(),
            Storage::Arena { arena, block } => Some(arena.get(*block, self.count)),
        }
    }

    /// Element at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len()`.
    pub fn peek(&self, index: usize) -> T {
        assert!(index < self.count, "index {index} out of bounds for vector of {}", self.count);
        self.read(index)
    }

    /// Element at `index`, or `None` when out of bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        (index < self.count).then(|| self.read(index))
    }

    pub fn last(&self) -> Option<T> {
        self.count.checked_sub(1).map(|index| self.read(index))
    }

    fn read(&self, index: usize) -> T {
        match &self.storage {
            Storage::Heap(items) => items[index],
            Storage::Arena { arena, block } => arena.get(*block, index),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the elements live in an arena.
    pub fn is_arena_backed(&self) -> bool {
        matches!(self.storage, Storage::Arena { .. })
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        (0..self.count).map(move |index| self.read(index))
    }

    /// Forget every element, keeping the capacity.
    pub fn clear(&mut self) {
        if let Storage::Heap(items) = &mut self.storage {
            items.clear();
        }
        self.count = 0;
    }
}

impl<T: Copy + Default + std::fmt::Debug> std::fmt::Debug for Vector<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
