use super::block::Block;
use super::slot::SlotLayout;
use crate::error::PoolError;
use std::collections::HashMap;
use std::mem::size_of;
use std::ptr::NonNull;
use tracing::{trace, warn};

struct LargeAllocation {
    block: Block,
    count: usize,
}

// Multi element requests skip the slot pool entirely and are tracked here by
// address until they are handed back.
pub struct LargeAllocationTable {
    slot_layout: SlotLayout,
    records: HashMap<usize, LargeAllocation>,
    bytes: usize,
}

impl LargeAllocationTable {
    pub fn new(slot_layout: SlotLayout) -> Self {
        Self {
            slot_layout,
            records: HashMap::new(),
            bytes: 0,
        }
    }

    pub fn allocate(&mut self, count: usize) -> Result<NonNull<u8>, PoolError> {
        let layout = self.slot_layout.for_count(count)?;

        self.records
            .try_reserve(1)
            .map_err(|_| PoolError::OutOfMemory {
                bytes: size_of::<LargeAllocation>(),
            })?;

        let block = Block::new(layout)?;
        let ptr = block.at_offset(0);

        self.bytes += block.get_size();
        self.records.insert(block.addr(), LargeAllocation { block, count });

        trace!(count, bytes = layout.size(), "large allocation");

        Ok(ptr)
    }

    pub fn deallocate(&mut self, addr: usize, count: usize) -> Result<(), PoolError> {
        let record = self.records.remove(&addr).ok_or(PoolError::UnknownPointer)?;

        if record.count != count {
            warn!(
                expected = record.count,
                given = count,
                "large allocation released with a different count"
            );
        }

        self.bytes -= record.block.get_size();
        trace!(count = record.count, "large deallocation");

        Ok(())
    }

    pub fn contains(&self, addr: usize) -> bool {
        self.records.contains_key(&addr)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn bytes(&self) -> usize {
        self.bytes
    }

    pub fn release_all(&mut self) {
        self.records.clear();
        self.bytes = 0;
    }
}
