use std::ptr::NonNull;

/// The allocator contract consumed by generic containers.
///
/// Implementors manage raw storage only. Writing values into the returned
/// memory and dropping them again is the container's job.
pub trait Allocate: Sized {
    type Value;
    type Error: std::error::Error;

    /// The same allocator, parameterized for another element type. A rebound
    /// allocator never shares storage with the one it came from.
    type Rebind<U>: Allocate<Value = U>;

    /// Allocates uninitialized storage for `count` values. A `count` of zero
    /// returns a dangling pointer which must not be read or written.
    fn allocate(&mut self, count: usize) -> Result<NonNull<Self::Value>, Self::Error>;

    /// Returns storage to the allocator.
    ///
    /// # Safety
    ///
    /// `ptr` must have come from `allocate(count)` on an allocator for which
    /// `same_pool` holds, with the very same `count`, and must not be used
    /// after this call.
    unsafe fn deallocate(&mut self, ptr: NonNull<Self::Value>, count: usize);

    /// True when memory from `self` may be released through `other`.
    fn same_pool(&self, other: &Self) -> bool;

    /// An allocator of the same kind and settings that owns no memory yet.
    /// This is what a container should hold after being copied.
    fn empty_copy(&self) -> Self;

    fn rebind<U>(&self) -> Self::Rebind<U>;
}
