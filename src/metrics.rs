/// A snapshot of a pool's bookkeeping.
///
/// Obtained by calling [`crate::PoolAllocator::metrics`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolMetrics {
    /// Number of blocks created over the lifetime of the pool. Unlike the
    /// other counters this is not reset by `release_all`.
    pub expansions: u64,

    /// Number of blocks currently owned.
    pub block_count: usize,

    /// Bytes held by slot blocks.
    pub block_bytes: usize,

    /// Sum of the capacities of all owned blocks.
    pub total_slots: usize,

    /// Slots currently handed out.
    pub used_slots: usize,

    /// Slots waiting on the free list.
    pub free_slots: usize,

    /// Multi element allocations currently handed out.
    pub large_allocations: usize,

    /// Bytes held by multi element allocations.
    pub large_bytes: usize,

    /// Calls to `deallocate` that were ignored because the pointer was not
    /// recognised or the slot was already free.
    pub ignored_deallocations: u64,
}

impl PoolMetrics {
    pub fn outstanding(&self) -> usize {
        self.used_slots + self.large_allocations
    }
}
