//! Generational handles.
//!
//! A [`Handle`] packs a slot index and a reuse counter into one `u64`. The
//! [`HandleTable`] hands out indices, bumps the counter every time an index is
//! recycled, and rejects handles whose counter no longer matches. This is the
//! classic generation-checked arena index: copies of a handle that outlive the
//! thing they named resolve to `None` instead of to whatever reused the slot.
//!
//! # Layout
//!
//! ```text
//!  63            index_bits + counter_bits      index_bits            0
//! +----------------+---------------------------+---------------------+
//! |    unused      |          counter          |        index        |
//! +----------------+---------------------------+---------------------+
//! ```
//!
//! Counters start at 1 and skip 0 when they wrap, so the raw value 0 is never
//! issued and can be used as a null handle.

use crate::error::{Error, Result};

/// Opaque generational handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(u64);

impl Handle {
    /// The null handle. Never resolves.
    pub const NULL: Self = Self(0);

    /// Raw packed value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from a raw packed value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Check whether this is the null handle.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

const fn bit_mask(bits: u32) -> u64 {
    if bits >= 64 {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Bit widths of the index and counter fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandleLayout {
    index_bits: u32,
    counter_bits: u32,
}

impl HandleLayout {
    /// Create a layout.
    ///
    /// Both widths must be at least 1 and together at most 64.
    pub fn new(index_bits: u32, counter_bits: u32) -> Result<Self> {
        if index_bits == 0 || counter_bits == 0 {
            return Err(Error::InvalidConfig(format!(
                "handle fields need at least one bit (index_bits={index_bits}, counter_bits={counter_bits})"
            )));
        }
        if index_bits + counter_bits > 64 {
            return Err(Error::InvalidConfig(format!(
                "index_bits + counter_bits must be <= 64, got {}",
                index_bits + counter_bits
            )));
        }
        Ok(Self {
            index_bits,
            counter_bits,
        })
    }

    #[must_use]
    pub const fn index_bits(self) -> u32 {
        self.index_bits
    }

    #[must_use]
    pub const fn counter_bits(self) -> u32 {
        self.counter_bits
    }

    const fn index_mask(self) -> u64 {
        bit_mask(self.index_bits)
    }

    const fn counter_mask(self) -> u64 {
        bit_mask(self.counter_bits)
    }

    /// Largest index this layout can address.
    #[must_use]
    pub const fn max_index(self) -> u64 {
        self.index_mask()
    }

    /// Pack an index and counter into a handle. Excess bits are masked off.
    #[must_use]
    pub const fn pack(self, index: u64, counter: u64) -> Handle {
        Handle(((counter & self.counter_mask()) << self.index_bits) | (index & self.index_mask()))
    }

    #[must_use]
    pub const fn index_of(self, handle: Handle) -> u64 {
        handle.0 & self.index_mask()
    }

    #[must_use]
    pub const fn counter_of(self, handle: Handle) -> u64 {
        (handle.0 >> self.index_bits) & self.counter_mask()
    }

    /// The counter value following `counter`, skipping 0.
    const fn next_counter(self, counter: u64) -> u64 {
        let next = counter.wrapping_add(1) & self.counter_mask();
        if next == 0 { 1 } else { next }
    }
}

impl Default for HandleLayout {
    fn default() -> Self {
        Self {
            index_bits: 32,
            counter_bits: 32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SlotState {
    /// Live, pointing at a target index in the owner's dense storage.
    Live(usize),
    /// Free, linked to the next free slot (FIFO).
    Free { next: Option<usize> },
}

#[derive(Clone, Debug)]
struct HandleSlot {
    counter: u64,
    state: SlotState,
}

/// Indirection table from generational handles to dense storage indices.
///
/// Fresh indices are preferred while the table is under its current capacity;
/// after that, released indices are reused oldest-first so a recycled index
/// stays retired for as long as possible.
#[derive(Clone, Debug)]
pub struct HandleTable {
    layout: HandleLayout,
    slots: Vec<HandleSlot>,
    capacity: usize,
    free_head: Option<usize>,
    free_tail: Option<usize>,
    live: usize,
}

impl HandleTable {
    /// Create a table with room for `capacity` handles before recycling starts.
    #[must_use]
    pub fn new(layout: HandleLayout, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            layout,
            slots: Vec::with_capacity(capacity),
            capacity,
            free_head: None,
            free_tail: None,
            live: 0,
        }
    }

    #[must_use]
    pub const fn layout(&self) -> HandleLayout {
        self.layout
    }

    /// Number of live handles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Current capacity before the table grows.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    fn fits(&self, index: usize) -> bool {
        index as u64 <= self.layout.max_index()
    }

    fn push_fresh(&mut self, target: usize) -> usize {
        let index = self.slots.len();
        self.slots.push(HandleSlot {
            counter: 1,
            state: SlotState::Live(target),
        });
        index
    }

    fn pop_free(&mut self) -> Option<usize> {
        let head = self.free_head?;
        let next = match self.slots[head].state {
            SlotState::Free { next } => next,
            SlotState::Live(_) => None,
        };
        self.free_head = next;
        if next.is_none() {
            self.free_tail = None;
        }
        Some(head)
    }

    /// Allocate a handle pointing at `target`.
    pub fn allocate(&mut self, target: usize) -> Result<Handle> {
        let fresh = self.slots.len();
        let index = if fresh < self.capacity && self.fits(fresh) {
            self.push_fresh(target)
        } else if let Some(index) = self.pop_free() {
            self.slots[index].state = SlotState::Live(target);
            index
        } else if self.fits(fresh) {
            self.capacity = self.capacity.saturating_mul(2);
            self.push_fresh(target)
        } else {
            return Err(Error::HandleSpaceExhausted {
                index_bits: self.layout.index_bits(),
            });
        };
        self.live += 1;
        Ok(self.layout.pack(index as u64, self.slots[index].counter))
    }

    /// Release a slot by index, invalidating every handle issued for it.
    ///
    /// Releasing a slot that is already free does nothing.
    pub fn release(&mut self, index: usize) {
        let Some(slot) = self.slots.get_mut(index) else {
            return;
        };
        if !matches!(slot.state, SlotState::Live(_)) {
            return;
        }
        slot.counter = self.layout.next_counter(slot.counter);
        slot.state = SlotState::Free { next: None };
        if let Some(tail) = self.free_tail {
            self.slots[tail].state = SlotState::Free { next: Some(index) };
        } else {
            self.free_head = Some(index);
        }
        self.free_tail = Some(index);
        self.live -= 1;
    }

    /// Resolve a handle to its target, or `None` if stale, null or out of range.
    #[must_use]
    pub fn resolve(&self, handle: Handle) -> Option<usize> {
        let index = usize::try_from(self.layout.index_of(handle)).ok()?;
        let slot = self.slots.get(index)?;
        if slot.counter != self.layout.counter_of(handle) {
            return None;
        }
        match slot.state {
            SlotState::Live(target) => Some(target),
            SlotState::Free { .. } => None,
        }
    }

    /// Index component of a handle, if it resolves.
    #[must_use]
    pub fn index_of(&self, handle: Handle) -> Option<usize> {
        self.resolve(handle)?;
        usize::try_from(self.layout.index_of(handle)).ok()
    }

    /// Point a live slot at a new target. Used when dense storage moves.
    pub fn retarget(&mut self, index: usize, target: usize) {
        if let Some(slot) = self.slots.get_mut(index) {
            if matches!(slot.state, SlotState::Live(_)) {
                slot.state = SlotState::Live(target);
            }
        }
    }

    /// The current handle for a live slot.
    #[must_use]
    pub fn handle_at(&self, index: usize) -> Option<Handle> {
        let slot = self.slots.get(index)?;
        match slot.state {
            SlotState::Live(_) => Some(self.layout.pack(index as u64, slot.counter)),
            SlotState::Free { .. } => None,
        }
    }

    /// Release every live slot. Counters are kept, so old handles stay invalid.
    pub fn release_all(&mut self) {
        for index in 0..self.slots.len() {
            self.release(index);
        }
    }
}
