use super::block::Block;
use super::free_list::{SlotFreeList, MAX_BLOCKS, MAX_BLOCK_SLOTS};
use super::slot::{SlotId, SlotLayout};
use crate::error::PoolError;
use std::cmp;
use std::collections::BTreeMap;
use std::mem::size_of;
use std::ptr::NonNull;
use tracing::debug;

struct SlotBlock {
    block: Block,
    slots: usize,
}

// Owns every block that backs single element slots. Blocks only ever get
// added, until `release_all` drops the lot.
pub struct BlockStore {
    slot_layout: SlotLayout,
    min_block_slots: usize,
    blocks: Vec<SlotBlock>,
    // block base address -> index into `blocks`
    by_addr: BTreeMap<usize, usize>,
    total_slots: usize,
    expansions: u64,
}

impl BlockStore {
    pub fn new(slot_layout: SlotLayout, min_block_slots: usize) -> Self {
        debug_assert!(min_block_slots > 0);

        Self {
            slot_layout,
            min_block_slots,
            blocks: vec![],
            by_addr: BTreeMap::new(),
            total_slots: 0,
            expansions: 0,
        }
    }

    pub fn min_block_slots(&self) -> usize {
        self.min_block_slots
    }

    // Nothing is registered until the new block exists, so a failed expand
    // leaves the store and the free list exactly as they were. Returns the
    // new free list head, which is always a slot of the new block.
    pub fn expand(&mut self, min_slots: usize, free_list: &mut SlotFreeList) -> Result<SlotId, PoolError> {
        let slots = cmp::max(min_slots, self.min_block_slots);

        if slots > MAX_BLOCK_SLOTS || self.blocks.len() >= MAX_BLOCKS {
            return Err(PoolError::CapacityOverflow { count: slots });
        }

        let layout = self.slot_layout.for_count(slots)?;

        self.blocks
            .try_reserve(1)
            .map_err(|_| PoolError::OutOfMemory {
                bytes: size_of::<SlotBlock>(),
            })?;
        let links = SlotFreeList::link_table(slots)?;
        free_list.reserve_block()?;

        let block = Block::new(layout)?;
        let block_idx = self.blocks.len();

        self.by_addr.insert(block.addr(), block_idx);
        self.blocks.push(SlotBlock { block, slots });
        let head = free_list.thread_block(block_idx as u32, links, slots as u32);

        self.total_slots += slots;
        self.expansions += 1;

        debug!(
            block = block_idx,
            slots,
            bytes = layout.size(),
            total_slots = self.total_slots,
            "expanded slot pool"
        );

        Ok(head)
    }

    pub fn slot_ptr(&self, slot: SlotId) -> NonNull<u8> {
        let slot_block = &self.blocks[slot.block_idx()];

        debug_assert!(slot.slot_idx() < slot_block.slots);

        slot_block.block.at_offset(slot.slot_idx() * self.slot_layout.stride())
    }

    pub fn locate(&self, addr: usize) -> Option<SlotId> {
        let (&base, &block_idx) = self.by_addr.range(..=addr).next_back()?;
        let slot_block = &self.blocks[block_idx];

        if !slot_block.block.contains(addr) {
            return None;
        }

        let offset = addr - base;
        let stride = self.slot_layout.stride();

        if offset % stride != 0 {
            return None;
        }

        // both fit, `expand` never registers a block past the u32 limits
        Some(SlotId::new(block_idx as u32, (offset / stride) as u32))
    }

    pub fn release_all(&mut self) {
        self.blocks.clear();
        self.by_addr.clear();
        self.total_slots = 0;
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn expansions(&self) -> u64 {
        self.expansions
    }

    pub fn block_bytes(&self) -> usize {
        self.blocks
            .iter()
            .fold(0, |sum, slot_block| sum + slot_block.block.get_size())
    }
}
