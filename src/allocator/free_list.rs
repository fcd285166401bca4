use super::block_store::BlockStore;
use super::slot::SlotId;
use crate::error::PoolError;
use std::mem::{replace, size_of};

// Block ids at or above this value are reserved for link markers.
pub const MAX_BLOCKS: usize = SlotLink::END as usize;
pub const MAX_BLOCK_SLOTS: usize = u32::MAX as usize;

// Out of line link for one slot. Slot storage itself is never written by the
// pool, so a free slot's successor lives here instead. Packed into two u32s,
// with the block half doubling as the in use / end of list marker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotLink {
    block: u32,
    index: u32,
}

impl SlotLink {
    const IN_USE: u32 = u32::MAX;
    const END: u32 = u32::MAX - 1;

    const USED: SlotLink = SlotLink {
        block: Self::IN_USE,
        index: 0,
    };

    fn free(next: Option<SlotId>) -> Self {
        match next {
            Some(slot) => Self {
                block: slot.block,
                index: slot.index,
            },
            None => Self {
                block: Self::END,
                index: 0,
            },
        }
    }

    fn is_free(self) -> bool {
        self.block != Self::IN_USE
    }

    // Successor of a free slot. An in use link has none.
    fn next(self) -> Option<SlotId> {
        if self.block >= Self::END {
            None
        } else {
            Some(SlotId::new(self.block, self.index))
        }
    }
}

// LIFO chain of unused slots across every block of the store.
pub struct SlotFreeList {
    head: Option<SlotId>,
    links: Vec<Vec<SlotLink>>,
    used_slots: usize,
    free_slots: usize,
}

impl SlotFreeList {
    pub fn new() -> Self {
        Self {
            head: None,
            links: vec![],
            used_slots: 0,
            free_slots: 0,
        }
    }

    pub fn link_table(slots: usize) -> Result<Vec<SlotLink>, PoolError> {
        let mut links = Vec::new();

        links
            .try_reserve_exact(slots)
            .map_err(|_| PoolError::OutOfMemory {
                bytes: slots.saturating_mul(size_of::<SlotLink>()),
            })?;

        Ok(links)
    }

    pub fn reserve_block(&mut self) -> Result<(), PoolError> {
        self.links
            .try_reserve(1)
            .map_err(|_| PoolError::OutOfMemory {
                bytes: size_of::<Vec<SlotLink>>(),
            })
    }

    // Slots are pushed in ascending address order, which leaves the last
    // slot of the new block at the head. Returns that head.
    pub fn thread_block(&mut self, block: u32, mut links: Vec<SlotLink>, slots: u32) -> SlotId {
        debug_assert_eq!(self.links.len(), block as usize);
        debug_assert!(slots > 0);

        for index in 0..slots {
            links.push(SlotLink::free(self.head));
            self.head = Some(SlotId::new(block, index));
        }

        self.links.push(links);
        self.free_slots += slots as usize;

        SlotId::new(block, slots - 1)
    }

    pub fn acquire(&mut self, store: &mut BlockStore) -> Result<SlotId, PoolError> {
        if let Some(slot) = self.head {
            return Ok(self.take(slot));
        }

        let head = store.expand(store.min_block_slots(), self)?;

        debug_assert_eq!(self.head, Some(head));

        Ok(self.take(head))
    }

    pub fn release(&mut self, slot: SlotId) -> Result<(), PoolError> {
        let link = self
            .links
            .get_mut(slot.block_idx())
            .and_then(|block| block.get_mut(slot.slot_idx()))
            .ok_or(PoolError::UnknownPointer)?;

        if link.is_free() {
            return Err(PoolError::DoubleRelease);
        }

        *link = SlotLink::free(self.head);
        self.head = Some(slot);
        self.used_slots -= 1;
        self.free_slots += 1;

        Ok(())
    }

    // Unlinks `slot`, which must be the current head.
    fn take(&mut self, slot: SlotId) -> SlotId {
        let link = replace(
            &mut self.links[slot.block_idx()][slot.slot_idx()],
            SlotLink::USED,
        );

        debug_assert!(link.is_free(), "free list head {slot:?} is in use");

        self.head = link.next();
        self.used_slots += 1;
        self.free_slots -= 1;

        slot
    }

    // Counts the slots actually reachable from the head, as opposed to
    // `free_slots` which is only bookkeeping.
    pub fn walk_len(&self) -> usize {
        let limit = self.used_slots + self.free_slots;
        let mut len = 0;
        let mut cursor = self.head;

        while let Some(slot) = cursor {
            if len > limit {
                break;
            }

            len += 1;
            cursor = self.links[slot.block_idx()][slot.slot_idx()].next();
        }

        len
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    pub fn used_slots(&self) -> usize {
        self.used_slots
    }

    pub fn free_slots(&self) -> usize {
        self.free_slots
    }

    pub fn clear(&mut self) {
        self.head = None;
        self.links.clear();
        self.used_slots = 0;
        self.free_slots = 0;
    }
}
