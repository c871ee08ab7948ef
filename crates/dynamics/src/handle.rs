//! Generation-counted handles and the arenas they index.
//!
//! Bodies and joints live in arenas with stable integer slots. Removing an
//! entry bumps the slot's generation, so a handle held across a removal is
//! detectably stale instead of silently aliasing whatever reuses the slot.
//! Iteration is always in slot order, which is creation order for a world
//! that never removes anything - the deterministic ordering the solver
//! relies on.

/// Handle to a rigid body in a [`crate::World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl BodyHandle {
    /// Slot index, stable for the lifetime of the body. Useful for logging.
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

/// Handle to a joint in a [`crate::World`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JointHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl JointHandle {
    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Generational arena with slot-order iteration.
#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots ever allocated, live or not. Upper bound for any
    /// slot index, used to size index maps.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Insert a value, reusing the lowest free slot if one exists.
    pub fn insert(&mut self, value: T) -> (u32, u32) {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            (index, slot.generation)
        } else {
            self.slots.push(Slot {
                generation: 0,
                value: Some(value),
            });
            ((self.slots.len() - 1) as u32, 0)
        }
    }

    pub fn get(&self, index: u32, generation: u32) -> Option<&T> {
        let slot = self.slots.get(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_ref()
    }

    pub fn get_mut(&mut self, index: u32, generation: u32) -> Option<&mut T> {
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Direct slot access for solver internals that already validated
    /// liveness during constraint assembly.
    pub fn get_at(&self, index: u32) -> Option<&T> {
        self.slots.get(index as usize)?.value.as_ref()
    }

    pub fn get_at_mut(&mut self, index: u32) -> Option<&mut T> {
        self.slots.get_mut(index as usize)?.value.as_mut()
    }

    /// Remove an entry, bumping the slot generation so stale handles fail.
    pub fn remove(&mut self, index: u32, generation: u32) -> Option<T> {
        let slot = self.slots.get_mut(index as usize)?;
        if slot.generation != generation || slot.value.is_none() {
            return None;
        }
        let value = slot.value.take();
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        // Keep free slots sorted descending so pop() reuses the lowest index
        // first; insertion order then stays reproducible across runs.
        self.free.sort_unstable_by(|a, b| b.cmp(a));
        self.len -= 1;
        value
    }

    /// Iterate live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, &T)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.value
                .as_ref()
                .map(|v| (i as u32, slot.generation, v))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (u32, u32, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| {
            let generation = slot.generation;
            slot.value.as_mut().map(move |v| (i as u32, generation, v))
        })
    }
}
