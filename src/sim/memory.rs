//! Per-pair contact memory
//!
//! Bodies resting against each other would otherwise get an elastic impulse
//! every tick, amplifying floating-point residue into visible jitter. Each
//! pair is resolved for a limited number of consecutive contact ticks, then
//! left alone until the contact breaks.

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};

use super::contact::PairKey;
use crate::consts::CONTACT_COOLDOWN_TICKS;

/// Consecutive-contact counts keyed by canonical pair
#[derive(Debug, Clone)]
pub struct ContactMemory {
    entries: HashMap<PairKey, u32>,
    cooldown_ticks: u32,
}

impl Default for ContactMemory {
    fn default() -> Self {
        Self::new(CONTACT_COOLDOWN_TICKS)
    }
}

impl ContactMemory {
    pub fn new(cooldown_ticks: u32) -> Self {
        Self {
            entries: HashMap::new(),
            cooldown_ticks,
        }
    }

    pub fn cooldown_ticks(&self) -> u32 {
        self.cooldown_ticks
    }

    /// Update memory with this tick's active pairs and return the pairs that
    /// should receive an impulse, in canonical order.
    pub fn observe(&mut self, active: &BTreeSet<PairKey>) -> Vec<PairKey> {
        self.entries.retain(|key, count| {
            let keep = active.contains(key);
            if !keep {
                log::debug!(
                    "contact {}-{} released after {} ticks",
                    key.low(),
                    key.high(),
                    count.saturating_add(1)
                );
            }
            keep
        });

        let mut resolve = Vec::with_capacity(active.len());
        for key in active {
            match self.entries.entry(*key) {
                Entry::Vacant(slot) => {
                    slot.insert(0);
                    resolve.push(*key);
                }
                Entry::Occupied(mut slot) => {
                    let count = slot.get_mut();
                    *count = count.saturating_add(1);
                    if *count < self.cooldown_ticks {
                        resolve.push(*key);
                    } else if *count == self.cooldown_ticks {
                        log::debug!(
                            "contact {}-{} settled, suppressing impulses",
                            key.low(),
                            key.high()
                        );
                    }
                }
            }
        }
        resolve
    }

    /// Consecutive ticks a pair has been in contact (0 on first contact)
    pub fn count(&self, key: &PairKey) -> Option<u32> {
        self.entries.get(key).copied()
    }

    /// Whether the pair's impulses are currently suppressed
    pub fn is_settled(&self, key: &PairKey) -> bool {
        self.count(key).is_some_and(|c| c >= self.cooldown_ticks)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
