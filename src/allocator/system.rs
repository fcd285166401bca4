use super::allocate::Allocate;
use crate::error::PoolError;
use std::alloc::{alloc, dealloc, Layout};
use std::marker::PhantomData;
use std::ptr::NonNull;

/// Stateless [`Allocate`] implementation that forwards every request to the
/// global allocator. Useful as a baseline next to a pool.
pub struct SystemAllocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SystemAllocator<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn layout(count: usize) -> Result<Layout, PoolError> {
        Layout::array::<T>(count).map_err(|_| PoolError::CapacityOverflow { count })
    }
}

impl<T> Default for SystemAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Allocate for SystemAllocator<T> {
    type Value = T;
    type Error = PoolError;
    type Rebind<U> = SystemAllocator<U>;

    fn allocate(&mut self, count: usize) -> Result<NonNull<T>, PoolError> {
        let layout = Self::layout(count)?;

        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        let ptr = unsafe { alloc(layout) };

        NonNull::new(ptr.cast::<T>()).ok_or(PoolError::OutOfMemory {
            bytes: layout.size(),
        })
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) {
        let Ok(layout) = Self::layout(count) else {
            return;
        };

        if layout.size() != 0 {
            dealloc(ptr.as_ptr().cast::<u8>(), layout);
        }
    }

    fn same_pool(&self, _other: &Self) -> bool {
        true
    }

    fn empty_copy(&self) -> Self {
        Self::new()
    }

    fn rebind<U>(&self) -> Self::Rebind<U> {
        SystemAllocator::new()
    }
}
