use crate::error::PoolError;

/// Configuration settings for a [`crate::PoolAllocator`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of slots reserved when the pool is built with
    /// [`crate::PoolAllocator::with_config`]. Zero means no block is created
    /// until the first single element allocation.
    pub initial_capacity: usize,

    /// The smallest block the pool will ever create, in slots. Expansion
    /// always allocates at least this many slots at once. Must be non zero.
    pub min_block_slots: usize,

    /// When set, handing an unknown pointer or an already free slot to
    /// `deallocate` panics instead of being logged and ignored.
    pub strict_deallocation: bool,

    /// When set, `release_all` (and so dropping the pool) panics in debug
    /// builds if slots or large allocations are still handed out.
    pub assert_empty_on_release: bool,
}

pub const POOL_CONFIG_DEFAULT_INITIAL_CAPACITY: usize = 0;
pub const POOL_CONFIG_DEFAULT_MIN_BLOCK_SLOTS: usize = crate::allocator::DEFAULT_BLOCK_SIZE;

impl PoolConfig {
    pub fn with_initial_capacity(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.min_block_slots == 0 {
            return Err(PoolError::InvalidConfig("min_block_slots must be at least 1"));
        }

        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            initial_capacity: POOL_CONFIG_DEFAULT_INITIAL_CAPACITY,
            min_block_slots: POOL_CONFIG_DEFAULT_MIN_BLOCK_SLOTS,
            strict_deallocation: false,
            assert_empty_on_release: false,
        }
    }
}
