//! A single threaded pool allocator that recycles fixed-size slots.
//!
//! A [`PoolAllocator<T>`] serves requests for one `T` from slots carved out
//! of blocks it grows on demand. Released slots go onto a LIFO free list and
//! are handed out again before any new block is created. Requests for more
//! than one `T` bypass the slots and go straight to the system allocator, the
//! pool only keeps track of them so they can be freed on teardown.
//!
//! ```rust
//! use slotpool::PoolAllocator;
//!
//! // reserve room for ten values up front
//! let mut pool: PoolAllocator<u64> = PoolAllocator::with_capacity(10).unwrap();
//! let one = pool.allocate(1).unwrap();
//! let many = pool.allocate(5).unwrap();
//!
//! assert_eq!(pool.used_slots(), 1);
//! assert_eq!(pool.large_allocations(), 1);
//!
//! unsafe {
//!     pool.deallocate(one, 1);
//!     pool.deallocate(many, 5);
//! }
//!
//! assert_eq!(pool.metrics().outstanding(), 0);
//! ```
//!
//! Containers that are generic over their storage use the [`Allocate`]
//! trait. Copying a container should give the copy
//! [`Allocate::empty_copy`] of the allocator: pools never share memory, and
//! [`Allocate::same_pool`] only holds for the very same pool.
//! ```rust
//! use slotpool::{Allocate, PoolAllocator};
//!
//! let ints: PoolAllocator<u32> = PoolAllocator::new();
//! let copy = Allocate::empty_copy(&ints);
//! let strings: PoolAllocator<String> = ints.rebind();
//!
//! assert!(ints.same_pool(&ints));
//! assert!(!ints.same_pool(&copy));
//! assert_eq!(strings.total_slots(), 0);
//! ```
mod allocator;
mod config;
mod error;
mod metrics;

pub use allocator::{Allocate, PoolAllocator, PoolId, SystemAllocator, DEFAULT_BLOCK_SIZE};
pub use config::{PoolConfig, POOL_CONFIG_DEFAULT_INITIAL_CAPACITY, POOL_CONFIG_DEFAULT_MIN_BLOCK_SLOTS};
pub use error::{PoolError, Result};
pub use metrics::PoolMetrics;
