use thiserror::Error;

/// Errors produced by a [`crate::PoolAllocator`].
///
/// `OutOfMemory` and `CapacityOverflow` are allocation failures: the request
/// could not be satisfied and the pool is left unchanged. The remaining
/// variants describe misuse of `deallocate`, which the infallible path
/// ignores and [`crate::PoolAllocator::try_deallocate`] reports.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    #[error("system allocator failed to provide {bytes} bytes")]
    OutOfMemory { bytes: usize },

    #[error("an allocation of {count} elements does not fit in the address space")]
    CapacityOverflow { count: usize },

    #[error("pointer is not tracked by this pool")]
    UnknownPointer,

    #[error("slot was released while already free")]
    DoubleRelease,

    #[error("invalid pool config: {0}")]
    InvalidConfig(&'static str),
}

impl PoolError {
    pub fn is_alloc_failure(&self) -> bool {
        matches!(
            self,
            PoolError::OutOfMemory { .. } | PoolError::CapacityOverflow { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PoolError>;
