//! Callsign hash cache for resolving non-standard callsigns
//!
//! In FT8, non-standard callsigns (those that don't fit pack28) are handled
//! using a two-message protocol: the first message includes the full
//! callsign text plus a hash, and subsequent messages reference the
//! callsign by hash alone. This cache remembers the hash -> callsign
//! mapping across a decode session so later messages can be resolved.
//!
//! The table is a single bounded open-addressed array (no heap map, no
//! external hashing crate): each callsign occupies one slot, found by
//! linear probing from `((hash22 >> 12) & 0x3FF) * 23 mod capacity`, and
//! each slot carries an age counter so callers can evict stale entries
//! between slots with `cleanup`.

use std::string::{String, ToString};

use super::callsign::{hash10, hash12, hash22};

/// Default table capacity, matching WSJT-X's `NQSOPOSS` style bound on the
/// number of distinct stations tracked per session.
const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
struct Entry {
    /// 22-bit hash for this callsign (also used to derive the 10/12-bit keys)
    hash22: u32,
    callsign: String,
    /// Number of `cleanup` calls survived since last insert/touch
    age: u8,
}

#[derive(Debug, Clone)]
pub struct CallsignHashCache {
    slots: Vec<Option<Entry>>,
    capacity: usize,
}

impl CallsignHashCache {
    /// Create a new empty hash cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a new empty hash cache with an explicit slot capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "callsign hash cache capacity must be > 0");
        Self {
            slots: vec![None; capacity],
            capacity,
        }
    }

    fn start_slot(&self, hash22: u32) -> usize {
        (((hash22 >> 12) & 0x3FF) as usize * 23) % self.capacity
    }

    /// Insert (or refresh) a callsign into the table. If the callsign's
    /// 22-bit hash is already present, its age resets to 0 and the stored
    /// text is updated. If the table is full, the insert is silently
    /// dropped rather than looping forever or evicting an arbitrary entry.
    pub fn insert(&mut self, callsign: &str) {
        let h22 = hash22(callsign);
        let start = self.start_slot(h22);

        for step in 0..self.capacity {
            let idx = (start + step) % self.capacity;
            match &mut self.slots[idx] {
                Some(entry) if entry.hash22 == h22 => {
                    entry.callsign = callsign.to_string();
                    entry.age = 0;
                    return;
                }
                Some(_) => continue,
                None => {
                    self.slots[idx] = Some(Entry {
                        hash22: h22,
                        callsign: callsign.to_string(),
                        age: 0,
                    });
                    return;
                }
            }
        }
        // Table full: drop the insert rather than probe indefinitely.
    }

    fn find(&self, hash22: u32) -> Option<&Entry> {
        let start = self.start_slot(hash22);
        for step in 0..self.capacity {
            let idx = (start + step) % self.capacity;
            match &self.slots[idx] {
                Some(entry) if entry.hash22 == hash22 => return Some(entry),
                Some(_) => continue,
                None => return None,
            }
        }
        None
    }

    /// Look up a callsign by its 10-bit hash (DXpedition / Type 0.1 messages).
    pub fn lookup_10bit(&self, hash10_value: u16) -> Option<&str> {
        self.slots
            .iter()
            .flatten()
            .find(|entry| hash10(&entry.callsign) == hash10_value)
            .map(|entry| entry.callsign.as_str())
    }

    /// Look up a callsign by its 12-bit hash (Type 2 messages).
    pub fn lookup_12bit(&self, hash12_value: u16) -> Option<&str> {
        self.slots
            .iter()
            .flatten()
            .find(|entry| hash12(&entry.callsign) == hash12_value)
            .map(|entry| entry.callsign.as_str())
    }

    /// Look up a callsign by its 22-bit hash (Type 1 hash references).
    pub fn lookup_22bit(&self, hash22_value: u32) -> Option<&str> {
        self.find(hash22_value).map(|entry| entry.callsign.as_str())
    }

    /// Generic lookup used by the slot orchestrator to resolve a decoded
    /// message's embedded callsign hash, trying all three widths.
    pub fn lookup(&self, hash: u32) -> Option<&str> {
        self.lookup_22bit(hash)
            .or_else(|| self.lookup_12bit(hash as u16))
            .or_else(|| self.lookup_10bit(hash as u16))
    }

    /// Age every occupied slot by one, then drop any entry whose age has
    /// reached `max_age`. Called once per decoded time slot.
    pub fn cleanup(&mut self, max_age: u8) {
        for slot in self.slots.iter_mut() {
            if let Some(entry) = slot {
                entry.age = entry.age.saturating_add(1);
                if entry.age >= max_age {
                    *slot = None;
                }
            }
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for CallsignHashCache {
    fn default() -> Self {
        Self::new()
    }
}
