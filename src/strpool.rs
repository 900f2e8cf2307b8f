//! String interning pool.
//!
//! Stores one canonical copy of each distinct byte string and hands out
//! [`Handle`]s to it. Lookups by handle are O(1); injecting a string that is
//! already pooled returns the existing handle.
//!
//! # Design
//!
//! - Hash table: open addressing, linear probing, power-of-two capacity, grown
//!   when the load factor would pass 2/3. Each slot also records how many live
//!   entries use it as their *base* slot, which bounds a probe without
//!   tombstones.
//! - Entries: dense array, swap-removed on discard.
//! - Handles: a [`HandleTable`] between callers and the dense entry array,
//!   so entries can move while handles stay stable.
//! - Blocks: byte slabs. Payloads are bump-allocated in power-of-two sizes;
//!   freed payloads go on a per-block free list kept sorted by size.
//!
//! Payload layout inside a block:
//!
//! ```text
//! +-----------+-------------+-----------------+-----+
//! | hash: u32 | length: u32 | bytes (length)  | NUL |
//! +-----------+-------------+-----------------+-----+
//! ```
//!
//! The stored hash is what rehashing and defragmentation use; strings are
//! never hashed twice.
//!
//! # Usage
//!
//! ```
//! use cutekit::strpool::{PoolConfig, StringPool};
//!
//! let mut pool = StringPool::new(PoolConfig::default()).unwrap();
//! let a = pool.inject("player");
//! let b = pool.inject("player");
//! assert_eq!(a, b);
//! assert_eq!(pool.get(a), Some("player"));
//!
//! pool.discard(a);
//! assert_eq!(pool.get(a), None);
//! ```
//!
//! # Invariants
//!
//! - Every live entry has exactly one handle slot and one hash slot.
//! - Handle counters never repeat for an index until they wrap the counter width.
//! - Entries with a non-zero reference count are never discarded or defragged away.

use crate::error::{Error, Result};
use crate::event::{LogLevel, emit_log};
use crate::handle::{Handle, HandleLayout, HandleTable};
use crate::hash::djb2_xor;
use std::ffi::CStr;
use std::fmt;

/// Bytes in front of every payload: stored hash + stored length.
const HEADER_SIZE: usize = 8;

/// Bytes a freed payload needs to hold its free-list node.
const FREE_NODE_SIZE: usize = 8;

/// Free-list terminator in the on-block node encoding.
const NO_NEXT: u32 = u32::MAX;

/// Largest payload allocation; free-list nodes record sizes as `u32`.
const MAX_ALLOC_SIZE: usize = 1 << 31;

/// Longest string the pool accepts.
pub const MAX_STRING_LEN: usize = MAX_ALLOC_SIZE - HEADER_SIZE - 1;

/// Pool configuration.
///
/// All capacities are rounded up to powers of two when the pool is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Treat ASCII letters case-insensitively when hashing and comparing.
    pub ignore_case: bool,
    /// Width of the handle reuse counter.
    pub counter_bits: u32,
    /// Width of the handle index.
    pub index_bits: u32,
    /// Initial number of entries (and handles) before growth.
    pub entry_capacity: usize,
    /// Initial capacity of the block list.
    pub block_capacity: usize,
    /// Size of each storage block in bytes.
    pub block_size: usize,
    /// Strings shorter than this still reserve this many payload bytes.
    pub min_length: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            ignore_case: false,
            counter_bits: 32,
            index_bits: 32,
            entry_capacity: 4096,
            block_capacity: 32,
            block_size: 256 * 1024,
            min_length: 23,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    #[must_use]
    pub const fn with_handle_bits(mut self, index_bits: u32, counter_bits: u32) -> Self {
        self.index_bits = index_bits;
        self.counter_bits = counter_bits;
        self
    }

    #[must_use]
    pub const fn with_entry_capacity(mut self, entry_capacity: usize) -> Self {
        self.entry_capacity = entry_capacity;
        self
    }

    #[must_use]
    pub const fn with_block_capacity(mut self, block_capacity: usize) -> Self {
        self.block_capacity = block_capacity;
        self
    }

    #[must_use]
    pub const fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub const fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }
}

fn pow2_at_least(value: usize, floor: usize, what: &str) -> Result<usize> {
    value
        .max(floor)
        .checked_next_power_of_two()
        .ok_or_else(|| Error::InvalidConfig(format!("{what} too large: {value}")))
}

/// Concatenation of every pooled string, each followed by a NUL byte.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collated {
    pub bytes: Vec<u8>,
    pub count: usize,
}

impl Collated {
    /// Split back into the individual strings.
    ///
    /// Strings that themselves contain NUL bytes split at those bytes too.
    #[must_use]
    pub fn strings(&self) -> Vec<&[u8]> {
        self.bytes.split(|&b| b == 0).take(self.count).collect()
    }
}

/// Storage statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Live entries.
    pub entries: usize,
    /// Hash table slot count.
    pub hash_capacity: usize,
    /// Handle slots available before the handle table grows.
    pub handle_capacity: usize,
    /// Number of storage blocks.
    pub blocks: usize,
    /// Total bytes reserved by blocks.
    pub block_bytes: usize,
    /// Bytes bump-allocated out of blocks (live + freed).
    pub used_bytes: usize,
    /// Bytes sitting on block free lists.
    pub free_bytes: usize,
}

impl PoolStats {
    /// Fraction of allocated payload bytes that are on free lists.
    #[must_use]
    pub fn fragmentation_ratio(&self) -> f32 {
        if self.used_bytes == 0 {
            return 0.0;
        }
        self.free_bytes as f32 / self.used_bytes as f32
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct HashSlot {
    /// Stored hash, 0 when empty.
    hash: u32,
    entry: usize,
    /// Live entries whose base slot is this slot.
    base_count: u32,
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    hash_slot: usize,
    handle_index: usize,
    block: usize,
    offset: usize,
    /// Allocated payload size (power of two).
    size: usize,
    length: usize,
    refcount: u32,
}

impl Entry {
    const fn data_start(&self) -> usize {
        self.offset + HEADER_SIZE
    }
}

#[derive(Clone)]
struct Block {
    data: Box<[u8]>,
    tail: usize,
    free_list: Option<usize>,
}

impl Block {
    fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            tail: 0,
            free_list: None,
        }
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn read_u32(&self, at: usize) -> u32 {
        let mut raw = [0u8; 4];
        raw.copy_from_slice(&self.data[at..at + 4]);
        u32::from_le_bytes(raw)
    }

    fn write_u32(&mut self, at: usize, value: u32) {
        self.data[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Read a free-list node: (region size, next region offset).
    fn free_node(&self, offset: usize) -> (usize, Option<usize>) {
        let size = self.read_u32(offset) as usize;
        let next = self.read_u32(offset + 4);
        (size, (next != NO_NEXT).then_some(next as usize))
    }

    fn set_free_node(&mut self, offset: usize, size: usize, next: Option<usize>) {
        self.write_u32(offset, size as u32);
        self.write_u32(offset + 4, next.map_or(NO_NEXT, |n| n as u32));
    }

    fn set_next(&mut self, prev: Option<usize>, next: Option<usize>) {
        match prev {
            Some(p) => {
                let (size, _) = self.free_node(p);
                self.set_free_node(p, size, next);
            }
            None => self.free_list = next,
        }
    }

    fn bump(&mut self, size: usize) -> Option<usize> {
        if self.capacity() - self.tail < size {
            return None;
        }
        let offset = self.tail;
        self.tail += size;
        Some(offset)
    }

    /// Take a freed region of exactly `size` bytes.
    fn take_free(&mut self, size: usize) -> Option<usize> {
        let mut prev = None;
        let mut cursor = self.free_list;
        while let Some(offset) = cursor {
            let (region, next) = self.free_node(offset);
            if region == size {
                self.set_next(prev, next);
                return Some(offset);
            }
            if region > size {
                return None;
            }
            prev = Some(offset);
            cursor = next;
        }
        None
    }

    /// Return a region to the free list, keeping it sorted by size.
    fn release(&mut self, offset: usize, size: usize) {
        let mut prev = None;
        let mut cursor = self.free_list;
        while let Some(at) = cursor {
            let (region, next) = self.free_node(at);
            if region >= size {
                break;
            }
            prev = Some(at);
            cursor = next;
        }
        self.set_free_node(offset, size, cursor);
        self.set_next(prev, Some(offset));
    }

    fn free_bytes(&self) -> usize {
        let mut total = 0;
        let mut cursor = self.free_list;
        while let Some(at) = cursor {
            let (region, next) = self.free_node(at);
            total += region;
            cursor = next;
        }
        total
    }
}

/// String interning pool. See the [module docs](self).
///
/// # Thread Safety
///
/// `StringPool` is not internally synchronized. Wrap it in a lock to share it
/// between threads.
#[derive(Clone)]
pub struct StringPool {
    ignore_case: bool,
    hash_slots: Vec<HashSlot>,
    entries: Vec<Entry>,
    handles: HandleTable,
    blocks: Vec<Block>,
    current_block: usize,
    block_size: usize,
    min_data_size: usize,
    initial_entry_capacity: usize,
    initial_block_capacity: usize,
}

impl fmt::Debug for StringPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringPool")
            .field("ignore_case", &self.ignore_case)
            .field("entries", &self.entries.len())
            .field("hash_capacity", &self.hash_slots.len())
            .field("blocks", &self.blocks.len())
            .finish_non_exhaustive()
    }
}

impl Default for StringPool {
    fn default() -> Self {
        let config = PoolConfig::default();
        Self::build(config, HandleLayout::default(), 4096, 32, 256 * 1024)
    }
}

impl StringPool {
    /// Create a pool.
    ///
    /// Fails if the handle bit widths are unusable or a capacity overflows.
    pub fn new(config: PoolConfig) -> Result<Self> {
        let layout = HandleLayout::new(config.index_bits, config.counter_bits)?;
        let entry_capacity = pow2_at_least(config.entry_capacity, 2, "entry_capacity")?;
        let block_capacity = pow2_at_least(config.block_capacity, 1, "block_capacity")?;
        let block_size = pow2_at_least(config.block_size, 256, "block_size")?;
        if block_size > MAX_ALLOC_SIZE {
            return Err(Error::InvalidConfig(format!(
                "block_size {block_size} exceeds {MAX_ALLOC_SIZE}"
            )));
        }
        if entry_capacity
            .checked_mul(2)
            .is_none_or(|slots| slots > isize::MAX as usize / size_of::<HashSlot>())
        {
            return Err(Error::InvalidConfig(format!(
                "entry_capacity too large: {entry_capacity}"
            )));
        }
        Ok(Self::build(
            config,
            layout,
            entry_capacity,
            block_capacity,
            block_size,
        ))
    }

    fn build(
        config: PoolConfig,
        layout: HandleLayout,
        entry_capacity: usize,
        block_capacity: usize,
        block_size: usize,
    ) -> Self {
        let mut blocks = Vec::with_capacity(block_capacity);
        blocks.push(Block::new(block_size));
        Self {
            ignore_case: config.ignore_case,
            hash_slots: vec![HashSlot::default(); entry_capacity * 2],
            entries: Vec::with_capacity(entry_capacity),
            handles: HandleTable::new(layout, entry_capacity),
            blocks,
            current_block: 0,
            block_size,
            min_data_size: HEADER_SIZE + 1 + config.min_length.clamp(8, MAX_STRING_LEN),
            initial_entry_capacity: entry_capacity,
            initial_block_capacity: block_capacity,
        }
    }

    /// Whether lookups ignore ASCII case.
    #[must_use]
    pub const fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Number of pooled strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn hash_mask(&self) -> usize {
        self.hash_slots.len() - 1
    }

    fn entry_bytes(&self, entry: &Entry) -> &[u8] {
        let start = entry.data_start();
        &self.blocks[entry.block].data[start..start + entry.length]
    }

    fn stored_hash_of(&self, entry: &Entry) -> u32 {
        self.blocks[entry.block].read_u32(entry.offset)
    }

    fn entry(&self, handle: Handle) -> Option<&Entry> {
        let index = self.handles.resolve(handle)?;
        self.entries.get(index)
    }

    fn find(&self, hash: u32, bytes: &[u8]) -> Option<usize> {
        let mask = self.hash_mask();
        let base = hash as usize & mask;
        let mut remaining = self.hash_slots[base].base_count;
        let mut slot = base;
        while remaining > 0 {
            let candidate = self.hash_slots[slot];
            if candidate.hash != 0 && candidate.hash as usize & mask == base {
                remaining -= 1;
                if candidate.hash == hash {
                    let entry = &self.entries[candidate.entry];
                    let stored = self.entry_bytes(entry);
                    let equal = if self.ignore_case {
                        stored.eq_ignore_ascii_case(bytes)
                    } else {
                        stored == bytes
                    };
                    if equal {
                        return Some(candidate.entry);
                    }
                }
            }
            slot = (slot + 1) & mask;
        }
        None
    }

    /// Place `hash` in the first empty slot at or after its base slot.
    fn claim_slot(&mut self, hash: u32, entry: usize) -> usize {
        let mask = self.hash_mask();
        let base = hash as usize & mask;
        let mut slot = base;
        while self.hash_slots[slot].hash != 0 {
            slot = (slot + 1) & mask;
        }
        self.hash_slots[slot].hash = hash;
        self.hash_slots[slot].entry = entry;
        self.hash_slots[base].base_count += 1;
        slot
    }

    fn rebuild_hash_table(&mut self, capacity: usize) {
        self.hash_slots = vec![HashSlot::default(); capacity];
        for index in 0..self.entries.len() {
            let hash = self.stored_hash_of(&self.entries[index]);
            let slot = self.claim_slot(hash, index);
            self.entries[index].hash_slot = slot;
        }
    }

    fn add_block(&mut self, capacity: usize) -> usize {
        self.blocks.push(Block::new(capacity));
        emit_log(
            LogLevel::Debug,
            &format!(
                "string pool: added block #{} ({capacity} bytes)",
                self.blocks.len()
            ),
        );
        self.blocks.len() - 1
    }

    /// Reserve payload storage. Returns (block, offset, allocated size).
    fn allocate_storage(&mut self, needed: usize) -> (usize, usize, usize) {
        let size = needed
            .max(FREE_NODE_SIZE)
            .max(self.min_data_size)
            .next_power_of_two();

        for block in (0..self.blocks.len()).rev() {
            if let Some(offset) = self.blocks[block].take_free(size) {
                return (block, offset, size);
            }
        }

        if let Some(offset) = self.blocks[self.current_block].bump(size) {
            return (self.current_block, offset, size);
        }

        // Oversized payloads get a block of their own and leave the current
        // block in place.
        let capacity = size.max(self.block_size);
        let block = self.add_block(capacity);
        if size <= self.block_size {
            self.current_block = block;
        }
        self.blocks[block].tail = size;
        (block, 0, size)
    }

    /// Intern a byte string, returning its handle.
    ///
    /// Injecting content that is already pooled (under the pool's case rules)
    /// returns the existing handle.
    ///
    /// # Panics
    ///
    /// Panics if the string is longer than [`MAX_STRING_LEN`] or the handle
    /// index space is exhausted. Use [`try_inject()`](Self::try_inject) to
    /// handle those cases.
    pub fn inject(&mut self, bytes: impl AsRef<[u8]>) -> Handle {
        self.try_inject(bytes)
            .unwrap_or_else(|e| panic!("string pool inject failed: {e}"))
    }

    /// Fallible version of [`inject()`](Self::inject).
    pub fn try_inject(&mut self, bytes: impl AsRef<[u8]>) -> Result<Handle> {
        let bytes = bytes.as_ref();
        if bytes.len() > MAX_STRING_LEN {
            return Err(Error::StringTooLarge {
                len: bytes.len(),
                max: MAX_STRING_LEN,
            });
        }

        let hash = djb2_xor(bytes, self.ignore_case);
        if let Some(index) = self.find(hash, bytes) {
            let handle_index = self.entries[index].handle_index;
            if let Some(handle) = self.handles.handle_at(handle_index) {
                return Ok(handle);
            }
        }

        let capacity = self.hash_slots.len();
        if self.entries.len() >= capacity - capacity / 3 {
            self.rebuild_hash_table(capacity * 2);
            emit_log(
                LogLevel::Debug,
                &format!("string pool: hash table grown to {} slots", capacity * 2),
            );
        }

        let entry_index = self.entries.len();
        let handle = self.handles.allocate(entry_index)?;
        let handle_index = self.handles.layout().index_of(handle) as usize;

        let (block, offset, size) = self.allocate_storage(HEADER_SIZE + bytes.len() + 1);
        let data = &mut self.blocks[block];
        data.write_u32(offset, hash);
        data.write_u32(offset + 4, bytes.len() as u32);
        let start = offset + HEADER_SIZE;
        data.data[start..start + bytes.len()].copy_from_slice(bytes);
        data.data[start + bytes.len()] = 0;

        let hash_slot = self.claim_slot(hash, entry_index);
        self.entries.push(Entry {
            hash_slot,
            handle_index,
            block,
            offset,
            size,
            length: bytes.len(),
            refcount: 0,
        });
        Ok(handle)
    }

    /// Remove a string from the pool.
    ///
    /// Returns `true` if the string was removed. Invalid handles and strings
    /// with a non-zero reference count are left alone.
    pub fn discard(&mut self, handle: Handle) -> bool {
        let Some(index) = self.handles.resolve(handle) else {
            return false;
        };
        if self.entries[index].refcount > 0 {
            return false;
        }

        let entry = self.entries.swap_remove(index);
        self.blocks[entry.block].release(entry.offset, entry.size);

        let mask = self.hash_mask();
        let base = self.hash_slots[entry.hash_slot].hash as usize & mask;
        self.hash_slots[base].base_count -= 1;
        self.hash_slots[entry.hash_slot].hash = 0;

        self.handles.release(entry.handle_index);

        if let Some(moved) = self.entries.get(index).copied() {
            self.hash_slots[moved.hash_slot].entry = index;
            self.handles.retarget(moved.handle_index, index);
        }
        true
    }

    /// Pooled bytes for a handle.
    #[must_use]
    pub fn bytes(&self, handle: Handle) -> Option<&[u8]> {
        self.entry(handle).map(|entry| self.entry_bytes(entry))
    }

    /// Pooled string for a handle, if it is valid UTF-8.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&str> {
        self.bytes(handle)
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// NUL-terminated view of the pooled string.
    ///
    /// Strings with embedded NUL bytes end at the first one, as C would see them.
    #[must_use]
    pub fn cstr(&self, handle: Handle) -> Option<&CStr> {
        let entry = self.entry(handle)?;
        let start = entry.data_start();
        let data = &self.blocks[entry.block].data[start..=start + entry.length];
        CStr::from_bytes_until_nul(data).ok()
    }

    /// Length in bytes of the pooled string.
    #[must_use]
    pub fn length(&self, handle: Handle) -> Option<usize> {
        self.entry(handle).map(|entry| entry.length)
    }

    /// Hash stored alongside the pooled string.
    #[must_use]
    pub fn stored_hash(&self, handle: Handle) -> Option<u32> {
        self.entry(handle).map(|entry| self.stored_hash_of(entry))
    }

    /// Check if a handle refers to a pooled string.
    #[must_use]
    pub fn is_valid(&self, handle: Handle) -> bool {
        self.entry(handle).is_some()
    }

    /// Increment the reference count. Returns the new count, or 0 for
    /// invalid handles.
    pub fn incref(&mut self, handle: Handle) -> u32 {
        let Some(index) = self.handles.resolve(handle) else {
            return 0;
        };
        let entry = &mut self.entries[index];
        entry.refcount = entry.refcount.saturating_add(1);
        entry.refcount
    }

    /// Decrement the reference count. Returns the new count, or 0 for
    /// invalid handles. The count never goes below zero.
    pub fn decref(&mut self, handle: Handle) -> u32 {
        let Some(index) = self.handles.resolve(handle) else {
            return 0;
        };
        let entry = &mut self.entries[index];
        entry.refcount = entry.refcount.saturating_sub(1);
        entry.refcount
    }

    /// Current reference count, or 0 for invalid handles.
    #[must_use]
    pub fn refcount(&self, handle: Handle) -> u32 {
        self.entry(handle).map_or(0, |entry| entry.refcount)
    }

    /// Iterate over all pooled strings with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Handle, &[u8])> {
        self.entries.iter().filter_map(|entry| {
            self.handles
                .handle_at(entry.handle_index)
                .map(|handle| (handle, self.entry_bytes(entry)))
        })
    }

    /// Concatenate every pooled string, NUL-terminated, in entry order.
    #[must_use]
    pub fn collate(&self) -> Collated {
        let total: usize = self.entries.iter().map(|e| e.length + 1).sum();
        let mut bytes = Vec::with_capacity(total);
        for entry in &self.entries {
            bytes.extend_from_slice(self.entry_bytes(entry));
            bytes.push(0);
        }
        Collated {
            bytes,
            count: self.entries.len(),
        }
    }

    /// Storage statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            entries: self.entries.len(),
            hash_capacity: self.hash_slots.len(),
            handle_capacity: self.handles.capacity(),
            blocks: self.blocks.len(),
            block_bytes: self.blocks.iter().map(Block::capacity).sum(),
            used_bytes: self.blocks.iter().map(|b| b.tail).sum(),
            free_bytes: self.blocks.iter().map(Block::free_bytes).sum(),
        }
    }

    /// Whether a [`defrag()`](Self::defrag) would reclaim a meaningful amount
    /// of memory: more than half of the allocated payload bytes are free and
    /// the pool spans more than one block.
    #[must_use]
    pub fn should_defrag(&self) -> bool {
        let stats = self.stats();
        stats.blocks > 1 && stats.fragmentation_ratio() > 0.5
    }

    /// Compact storage.
    ///
    /// Entries with a reference count of zero are dropped and their handles
    /// invalidated. Surviving strings are copied into one fresh block and the
    /// hash table is rebuilt at a size proportional to the survivors. Handles
    /// of survivors remain valid.
    pub fn defrag(&mut self) {
        let before = self.entries.len();
        for entry in &self.entries {
            if entry.refcount == 0 {
                self.handles.release(entry.handle_index);
            }
        }

        let data_size: usize = self
            .entries
            .iter()
            .filter(|e| e.refcount > 0)
            .map(|e| e.size)
            .sum();
        let mut block = Block::new(self.block_size.max(data_size.next_power_of_two()));

        let survivors = self.entries.iter().filter(|e| e.refcount > 0).count();
        let mut entries = Vec::with_capacity(survivors.max(self.initial_entry_capacity));
        for entry in self.entries.iter().filter(|e| e.refcount > 0) {
            let used = HEADER_SIZE + entry.length + 1;
            let offset = block.tail;
            block.tail += entry.size;
            block.data[offset..offset + used]
                .copy_from_slice(&self.blocks[entry.block].data[entry.offset..entry.offset + used]);
            self.handles.retarget(entry.handle_index, entries.len());
            entries.push(Entry {
                block: 0,
                offset,
                ..*entry
            });
        }

        let mut blocks = Vec::with_capacity(self.initial_block_capacity);
        blocks.push(block);
        self.blocks = blocks;
        self.current_block = 0;
        self.entries = entries;

        let hash_capacity = (survivors + survivors / 2)
            .next_power_of_two()
            .max(self.initial_entry_capacity * 2);
        self.rebuild_hash_table(hash_capacity);

        emit_log(
            LogLevel::Debug,
            &format!(
                "string pool: defrag kept {survivors} of {before} entries, {} bytes",
                self.blocks[0].capacity()
            ),
        );
    }

    /// Remove every string. Handles issued before the clear stay invalid.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.handles.release_all();
        self.blocks.truncate(1);
        self.blocks[0] = Block::new(self.block_size);
        self.current_block = 0;
        self.hash_slots = vec![HashSlot::default(); self.initial_entry_capacity * 2];
    }
}
