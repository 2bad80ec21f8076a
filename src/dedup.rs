//! Per-slot decoded-message dedup table
//!
//! A bounded open-addressed set of payload hashes, indexed at
//! `hash % capacity` with linear probing, mirroring the callsign hash
//! table's storage discipline (`message/callsign_cache.rs`). The source's
//! `decoded_hashtable` loop assumes an empty slot always exists (spec §9);
//! this version guards against a full table instead of looping forever.

const DEFAULT_CAPACITY: usize = 50;

#[derive(Debug, Clone)]
struct Entry {
    hash: u32,
    payload: [u8; 10],
}

/// Bounded set of `(hash, payload)` pairs decoded during the current slot.
#[derive(Debug, Clone)]
pub struct DedupTable {
    slots: Vec<Option<Entry>>,
    capacity: usize,
    len: usize,
}

impl DedupTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "dedup table capacity must be > 0");
        Self {
            slots: vec![None; capacity],
            capacity,
            len: 0,
        }
    }

    /// Insert `(hash, payload)` if not already present. Returns `true` if
    /// this is a new entry (the caller should emit the decode) or `false`
    /// if it is a duplicate (same hash and identical payload bytes) or the
    /// table is full and has no room left to record it.
    pub fn insert(&mut self, hash: u32, payload: [u8; 10]) -> bool {
        let start = (hash as usize) % self.capacity;
        for step in 0..self.capacity {
            let idx = (start + step) % self.capacity;
            match &self.slots[idx] {
                Some(entry) if entry.hash == hash && entry.payload == payload => return false,
                Some(_) => continue,
                None => {
                    self.slots[idx] = Some(Entry { hash, payload });
                    self.len += 1;
                    return true;
                }
            }
        }
        // Table full: treat as a duplicate rather than looping indefinitely
        // or silently growing past the slot-scoped capacity bound.
        false
    }

    /// Reset for the next slot; called by the orchestrator alongside
    /// `waterfall.reset()`.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for DedupTable {
    fn default() -> Self {
        Self::new()
    }
}
