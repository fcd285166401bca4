use crate::error::PoolError;
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

// A single owned region of raw memory straight from the system allocator.
// Both slot blocks and large allocations are backed by one of these.
pub struct Block {
    ptr: NonNull<u8>,
    layout: Layout,
}

impl Block {
    pub fn new(layout: Layout) -> Result<Block, PoolError> {
        debug_assert!(layout.size() != 0);

        Ok(Block {
            ptr: Self::alloc_block(layout)?,
            layout,
        })
    }

    pub fn at_offset(&self, offset: usize) -> NonNull<u8> {
        debug_assert!(offset < self.layout.size());

        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(offset)) }
    }

    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    pub fn get_size(&self) -> usize {
        self.layout.size()
    }

    pub fn contains(&self, addr: usize) -> bool {
        addr >= self.addr() && addr < self.addr() + self.get_size()
    }

    fn alloc_block(layout: Layout) -> Result<NonNull<u8>, PoolError> {
        let ptr = unsafe { alloc(layout) };

        NonNull::new(ptr).ok_or(PoolError::OutOfMemory {
            bytes: layout.size(),
        })
    }
}

impl Drop for Block {
    fn drop(&mut self) {
        unsafe { dealloc(self.ptr.as_ptr(), self.layout) }
    }
}
