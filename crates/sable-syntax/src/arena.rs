//! Region-based bump allocator.
//!
//! An arena hands out [`Block`]s: runs of slots inside one fixed-capacity
//! region. Nothing is ever freed individually. The whole arena is either
//! released at once (`free`, or dropping it) or rewound for reuse (`empty`).
//!
//! Blocks are handles rather than references, so they can be stored inside
//! other arena values. AST child lists, for example, are blocks of
//! [`NodeId`](crate::NodeId)s which are themselves blocks of the node arena.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::ops::Range;

use thiserror::Error;
use tracing::trace;

/// Minimum region size used by [`Arena::default`].
pub const DEFAULT_REGION_SIZE: usize = 64;

/// Allocation failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    #[error("arena exhausted: could not reserve a region of {requested} slots")]
    Exhausted { requested: usize },
}

/// Handle to a contiguous run of slots inside one arena region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Block {
    region: u32,
    start: u32,
    len: u32,
}

impl Block {
    /// Number of slots in the block.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the region holding the block.
    #[inline]
    pub const fn region(&self) -> usize {
        self.region as usize
    }

    /// Offset of the first slot inside the region.
    #[inline]
    pub const fn start(&self) -> usize {
        self.start as usize
    }

    /// Check whether two blocks share a slot.
    pub const fn overlaps(&self, other: &Block) -> bool {
        self.region == other.region
            && self.start < other.start + other.len
            && other.start < self.start + self.len
    }

    fn slots(&self, count: usize) -> Range<usize> {
        let start = self.start as usize;
        start..start + count
    }
}

struct Region<T> {
    slots: Vec<T>,
    used: usize,
}

impl<T: Copy + Default> Region<T> {
    fn new(size: usize) -> Result<Self, ArenaError> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(size)
            .map_err(|_| ArenaError::Exhausted { requested: size })?;
        slots.resize(size, T::default());
        Ok(Self { slots, used: 0 })
    }

    fn remaining(&self) -> usize {
        self.slots.len() - self.used
    }
}

/// Bump allocator over a list of fixed-capacity regions.
///
/// Allocation takes `&self` so that several [`Vector`](crate::Vector)s can
/// grow inside the same arena. `free` and `empty` take `&mut self`, which
/// guarantees no vector is still borrowing the arena when its slots are
/// released or recycled.
pub struct Arena<T> {
    /// Regions created by `alloc` are at least this many slots.
    min_region_size: usize,
    regions: RefCell<Vec<Region<T>>>,
    /// Region most recently used for allocation.
    last: Cell<usize>,
}

impl<T: Copy + Default> Arena<T> {
    /// Create an empty arena. No region is allocated until the first `alloc`.
    pub fn new(min_region_size: usize) -> Self {
        Self {
            min_region_size: min_region_size.max(1),
            regions: RefCell::new(Vec::new()),
            last: Cell::new(0),
        }
    }

    /// Allocate a block of `len` slots (at least one).
    ///
    /// The search starts at the last-used region and only links a new region,
    /// sized `max(min_region_size, len)`, when every region from there on is
    /// too full.
    pub fn alloc(&self, len: usize) -> Result<Block, ArenaError> {
        let len = len.max(1);
        let mut regions = self.regions.borrow_mut();

        let mut index = self.last.get();
        while index < regions.len() && regions[index].remaining() < len {
            index += 1;
        }
        if index == regions.len() {
            let size = self.min_region_size.max(len);
            trace!(size, regions = regions.len() + 1, "arena: linking new region");
            regions.push(Region::new(size)?);
        }

        let region = &mut regions[index];
        let block = Block {
            region: to_u32(index)?,
            start: to_u32(region.used)?,
            len: to_u32(len)?,
        };
        region.used += len;
        self.last.set(index);
        Ok(block)
    }

    /// Read one slot of a block.
    ///
    /// # Panics
    /// Panics if `index` is outside the block or the block was released.
    pub fn get(&self, block: Block, index: usize) -> T {
        assert!(index < block.len(), "slot {index} outside block of {}", block.len);
        self.regions.borrow()[block.region()].slots[block.start() + index]
    }

    /// Overwrite one slot of a block.
    ///
    /// # Panics
    /// Panics if `index` is outside the block or the block was released.
    pub fn set(&self, block: Block, index: usize, value: T) {
        assert!(index < block.len(), "slot {index} outside block of {}", block.len);
        self.regions.borrow_mut()[block.region()].slots[block.start() + index] = value;
    }

    /// Copy the first `count` slots of `from` into the start of `to`.
    pub fn copy(&self, from: Block, to: Block, count: usize) {
        assert!(count <= from.len() && count <= to.len(), "copy of {count} slots overruns a block");
        let mut regions = self.regions.borrow_mut();
        let (src, dst) = (from.region(), to.region());

        if src == dst {
            regions[src]
                .slots
                .copy_within(from.slots(count), to.start());
            return;
        }

        let (source, target) = if src < dst {
            let (head, tail) = regions.split_at_mut(dst);
            (&head[src], &mut tail[0])
        } else {
            let (head, tail) = regions.split_at_mut(src);
            (&tail[0], &mut head[dst])
        };
        target.slots[to.slots(count)].copy_from_slice(&source.slots[from.slots(count)]);
    }

    /// Copy the first `count` slots of a block out of the arena.
    pub fn to_vec(&self, block: Block, count: usize) -> Vec<T> {
        self.with_slice(block, |slots| slots[..count].to_vec())
    }

    /// Run `f` over the slots of a block.
    ///
    /// `f` must not allocate from this arena.
    pub fn with_slice<R>(&self, block: Block, f: impl FnOnce(&[T]) -> R) -> R {
        let regions = self.regions.borrow();
        f(&regions[block.region()].slots[block.slots(block.len())])
    }

    /// Release every region. The arena ends up as if freshly created.
    pub fn free(&mut self) {
        *self.regions.get_mut() = Vec::new();
        self.last.set(0);
    }

    /// Forget every allocation but keep the regions for reuse.
    pub fn empty(&mut self) {
        for region in self.regions.get_mut().iter_mut() {
            region.used = 0;
        }
        self.last.set(0);
    }

    /// Number of regions currently linked.
    pub fn region_count(&self) -> usize {
        self.regions.borrow().len()
    }

    /// Total slots across all regions.
    pub fn capacity(&self) -> usize {
        self.regions.borrow().iter().map(|r| r.slots.len()).sum()
    }

    /// Total slots handed out since the last `free`/`empty`.
    pub fn used(&self) -> usize {
        self.regions.borrow().iter().map(|r| r.used).sum()
    }
}

impl<T: Copy + Default> Default for Arena<T> {
    fn default() -> Self {
        Self::new(DEFAULT_REGION_SIZE)
    }
}

impl<T> fmt::Debug for Arena<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regions = self.regions.borrow();
        f.debug_struct("Arena")
            .field("min_region_size", &self.min_region_size)
            .field("regions", &regions.len())
            .field("used", &regions.iter().map(|r| r.used).sum::<usize>())
            .finish()
    }
}

fn to_u32(value: usize) -> Result<u32, ArenaError> {
    u32::try_from(value).map_err(|_| ArenaError::Exhausted { requested: value })
}
