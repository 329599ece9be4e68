//! Generation-checked slot arena backing the wait queue.
//!
//! Waiter records live in an arena so that queue links can be plain ids
//! instead of pointers. Every id carries the generation of the occupancy it
//! was minted for; once a slot is recycled, ids from earlier occupancies
//! stop resolving. That is what makes it safe to remember an id across a
//! control transfer: the worst a stale id can do is miss.
//!
//! # Design
//!
//! - Slots live in a `Vec`; vacated slots are chained into a free list
//! - The generation counter sits beside the slot and bumps on removal
//! - No unsafe code; resolution is a bounds check plus a generation match

use core::fmt;

/// Identifier of an occupied arena slot, valid for a single occupancy.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArenaIndex {
    slot: u32,
    generation: u32,
}

impl ArenaIndex {
    /// Builds an index from raw parts. Mostly useful in tests.
    #[must_use]
    pub const fn from_parts(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Raw slot number.
    #[must_use]
    pub const fn slot(self) -> u32 {
        self.slot
    }

    /// Generation this index was minted for.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for ArenaIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArenaIndex({}:{})", self.slot, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    state: SlotState<T>,
}

#[derive(Debug)]
enum SlotState<T> {
    Full(T),
    /// Vacant slot holding the free-list link to the next vacant slot.
    Free { next: Option<u32> },
}

/// Vec-backed arena handing out generation-checked ids.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Option<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: None,
            len: 0,
        }
    }

    /// Number of occupied slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no slot is occupied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value`, reusing a vacant slot when one exists.
    pub fn insert(&mut self, value: T) -> ArenaIndex {
        self.len += 1;

        if let Some(slot) = self.free {
            let record = &mut self.slots[slot as usize];
            match record.state {
                SlotState::Free { next } => {
                    self.free = next;
                    record.state = SlotState::Full(value);
                    ArenaIndex {
                        slot,
                        generation: record.generation,
                    }
                }
                SlotState::Full(_) => unreachable!("free list points at an occupied slot"),
            }
        } else {
            let slot = u32::try_from(self.slots.len()).expect("arena slot count exceeds u32");
            self.slots.push(Slot {
                generation: 0,
                state: SlotState::Full(value),
            });
            ArenaIndex {
                slot,
                generation: 0,
            }
        }
    }

    /// Removes and returns the value at `index`.
    ///
    /// Returns `None` when the index is stale or the slot is vacant. The
    /// slot's generation bumps here, so the removed index never resolves
    /// again.
    pub fn remove(&mut self, index: ArenaIndex) -> Option<T> {
        let record = self.slots.get_mut(index.slot as usize)?;
        if record.generation != index.generation || !matches!(record.state, SlotState::Full(_)) {
            return None;
        }

        record.generation = record.generation.wrapping_add(1);
        let state = core::mem::replace(&mut record.state, SlotState::Free { next: self.free });
        self.free = Some(index.slot);
        self.len -= 1;

        match state {
            SlotState::Full(value) => Some(value),
            SlotState::Free { .. } => unreachable!(),
        }
    }

    /// Resolves `index` to a shared reference.
    #[must_use]
    pub fn get(&self, index: ArenaIndex) -> Option<&T> {
        match self.slots.get(index.slot as usize) {
            Some(Slot {
                generation,
                state: SlotState::Full(value),
            }) if *generation == index.generation => Some(value),
            _ => None,
        }
    }

    /// Resolves `index` to an exclusive reference.
    pub fn get_mut(&mut self, index: ArenaIndex) -> Option<&mut T> {
        match self.slots.get_mut(index.slot as usize) {
            Some(Slot {
                generation,
                state: SlotState::Full(value),
            }) if *generation == index.generation => Some(value),
            _ => None,
        }
    }

    /// Whether `index` still resolves.
    #[must_use]
    pub fn contains(&self, index: ArenaIndex) -> bool {
        self.get(index).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_resolves() {
        let mut arena = Arena::new();
        let idx = arena.insert("first");
        assert_eq!(arena.get(idx), Some(&"first"));
        assert_eq!(arena.len(), 1);
        assert!(arena.contains(idx));
    }

    #[test]
    fn remove_returns_value_and_invalidates() {
        let mut arena = Arena::new();
        let idx = arena.insert(7);
        assert_eq!(arena.remove(idx), Some(7));
        assert!(arena.is_empty());
        assert_eq!(arena.get(idx), None);
        assert_eq!(arena.remove(idx), None);
    }

    #[test]
    fn slot_reuse_bumps_generation() {
        let mut arena = Arena::new();
        let first = arena.insert(1);
        arena.remove(first);
        let second = arena.insert(2);

        assert_eq!(first.slot(), second.slot());
        assert_ne!(first.generation(), second.generation());
        assert_eq!(arena.get(first), None);
        assert_eq!(arena.get(second), Some(&2));
    }

    #[test]
    fn free_list_reuses_most_recent_vacancy() {
        let mut arena = Arena::new();
        let a = arena.insert('a');
        let b = arena.insert('b');
        arena.remove(a);
        arena.remove(b);

        let c = arena.insert('c');
        assert_eq!(c.slot(), b.slot());
        let d = arena.insert('d');
        assert_eq!(d.slot(), a.slot());
        assert_eq!(arena.len(), 2);
    }

    #[test]
    fn get_mut_updates_in_place() {
        let mut arena = Arena::new();
        let idx = arena.insert(10);
        if let Some(value) = arena.get_mut(idx) {
            *value += 5;
        }
        assert_eq!(arena.get(idx), Some(&15));
    }

    #[test]
    fn stale_index_misses_after_many_cycles() {
        let mut arena = Arena::new();
        let original = arena.insert(0);
        arena.remove(original);
        for round in 1..10 {
            let idx = arena.insert(round);
            assert_eq!(idx.slot(), original.slot());
            assert_eq!(arena.get(original), None, "round {round}");
            arena.remove(idx);
        }
    }
}
