use super::constants::slot_stride;
use crate::error::PoolError;
use std::alloc::Layout;
use std::mem::{align_of, size_of};

/// Handle of a single slot: the block it lives in and its position inside
/// that block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SlotId {
    pub block: u32,
    pub index: u32,
}

impl SlotId {
    pub fn new(block: u32, index: u32) -> Self {
        Self { block, index }
    }

    pub fn block_idx(&self) -> usize {
        self.block as usize
    }

    pub fn slot_idx(&self) -> usize {
        self.index as usize
    }
}

// Size and alignment of one element slot. Every block and every large
// allocation is a whole number of strides.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotLayout {
    stride: usize,
    align: usize,
}

impl SlotLayout {
    pub fn of<T>() -> Self {
        let align = align_of::<T>();

        Self {
            stride: slot_stride(size_of::<T>(), align),
            align,
        }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn for_count(&self, count: usize) -> Result<Layout, PoolError> {
        let bytes = self
            .stride
            .checked_mul(count)
            .ok_or(PoolError::CapacityOverflow { count })?;

        Layout::from_size_align(bytes, self.align).map_err(|_| PoolError::CapacityOverflow { count })
    }
}
