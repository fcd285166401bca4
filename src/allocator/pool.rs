use super::allocate::Allocate;
use super::block_store::BlockStore;
use super::free_list::SlotFreeList;
use super::large::LargeAllocationTable;
use super::slot::SlotLayout;
use crate::config::PoolConfig;
use crate::error::PoolError;
use crate::metrics::PoolMetrics;
use std::fmt;
use std::marker::PhantomData;
use std::mem::replace;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(1);

/// Process unique identity of a pool. It travels with the pool's storage, so
/// a pool keeps its id when it is moved or taken from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PoolId(u64);

impl PoolId {
    fn next() -> Self {
        Self(NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single threaded pool allocator for values of type `T`.
///
/// Single element requests are served from fixed-size slots carved out of
/// blocks that the pool grows on demand and recycles through a LIFO free
/// list. Requests for more than one element go straight to the system
/// allocator and are tracked until they are handed back.
///
/// The pool never constructs or drops values. Everything it owns is freed on
/// [`PoolAllocator::release_all`] or drop, whether or not values still live
/// in it.
///
/// ```
/// use slotpool::PoolAllocator;
///
/// let mut pool: PoolAllocator<u32> = PoolAllocator::with_capacity(10).unwrap();
/// let ptr = pool.allocate(1).unwrap();
///
/// unsafe {
///     ptr.as_ptr().write(7);
///     assert_eq!(*ptr.as_ptr(), 7);
///     pool.deallocate(ptr, 1);
/// }
///
/// assert_eq!(pool.used_slots(), 0);
/// ```
pub struct PoolAllocator<T> {
    id: PoolId,
    config: PoolConfig,
    blocks: BlockStore,
    free_list: SlotFreeList,
    large: LargeAllocationTable,
    ignored_deallocations: u64,
    _marker: PhantomData<*const T>,
}

impl<T> PoolAllocator<T> {
    pub fn new() -> Self {
        Self::empty(PoolConfig::default())
    }

    /// Builds a pool with at least `initial_capacity` slots already reserved.
    pub fn with_capacity(initial_capacity: usize) -> Result<Self, PoolError> {
        Self::with_config(PoolConfig::with_initial_capacity(initial_capacity))
    }

    pub fn with_config(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;

        let mut pool = Self::empty(config);

        if config.initial_capacity > 0 {
            pool.reserve(config.initial_capacity)?;
        }

        Ok(pool)
    }

    // `config` must already be valid.
    fn empty(config: PoolConfig) -> Self {
        let slot_layout = SlotLayout::of::<T>();

        Self {
            id: PoolId::next(),
            config,
            blocks: BlockStore::new(slot_layout, config.min_block_slots),
            free_list: SlotFreeList::new(),
            large: LargeAllocationTable::new(slot_layout),
            ignored_deallocations: 0,
            _marker: PhantomData,
        }
    }

    /// Allocates uninitialized storage for `count` values.
    ///
    /// `count == 0` returns a dangling pointer and touches nothing,
    /// `count == 1` is served from the slot pool (growing it when the free
    /// list is empty), anything larger is a dedicated system allocation.
    pub fn allocate(&mut self, count: usize) -> Result<NonNull<T>, PoolError> {
        match count {
            0 => Ok(NonNull::dangling()),
            1 => {
                let slot = self.free_list.acquire(&mut self.blocks)?;

                Ok(self.blocks.slot_ptr(slot).cast())
            }
            _ => Ok(self.large.allocate(count)?.cast()),
        }
    }

    /// Returns storage to the pool, ignoring pointers it does not recognise.
    ///
    /// Ignored calls are logged and counted in
    /// [`PoolMetrics::ignored_deallocations`]. With
    /// [`PoolConfig::strict_deallocation`] set they panic instead.
    ///
    /// # Safety
    ///
    /// `ptr` must come from `allocate(count)` on this pool with the same
    /// `count`, and must not be used afterwards. Any value stored in it must
    /// already have been dropped or moved out.
    pub unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) {
        if let Err(err) = self.try_deallocate(ptr, count) {
            self.ignored_deallocations += 1;

            if self.config.strict_deallocation {
                panic!("pool {:?}: deallocate({:p}, {count}) failed: {err}", self.id, ptr);
            }

            warn!(pool = self.id.0, ptr = ?ptr, count, error = %err, "ignored deallocate");
        }
    }

    /// Like [`PoolAllocator::deallocate`], but reports unknown pointers and
    /// double releases instead of ignoring them. On error nothing changes.
    ///
    /// # Safety
    ///
    /// Same contract as [`PoolAllocator::deallocate`].
    pub unsafe fn try_deallocate(&mut self, ptr: NonNull<T>, count: usize) -> Result<(), PoolError> {
        let addr = ptr.as_ptr() as usize;

        match count {
            0 => Ok(()),
            1 => {
                let slot = self.blocks.locate(addr).ok_or(PoolError::UnknownPointer)?;

                self.free_list.release(slot)
            }
            _ => self.large.deallocate(addr, count),
        }
    }

    /// Grows the total slot capacity to at least `capacity`. Does nothing if
    /// the pool is already that large.
    pub fn reserve(&mut self, capacity: usize) -> Result<(), PoolError> {
        let total = self.blocks.total_slots();

        if capacity <= total {
            return Ok(());
        }

        self.blocks.expand(capacity - total, &mut self.free_list)?;

        debug!(pool = self.id.0, capacity, total_slots = self.blocks.total_slots(), "reserved slots");

        Ok(())
    }

    /// Frees every block and large allocation and resets the counters.
    /// Values still living in pool memory are not dropped.
    pub fn release_all(&mut self) {
        let outstanding = self.free_list.used_slots() + self.large.len();

        if self.config.assert_empty_on_release && !std::thread::panicking() {
            debug_assert!(
                outstanding == 0,
                "pool {:?} released with {outstanding} allocations outstanding",
                self.id
            );
        }

        if self.blocks.block_count() == 0 && self.large.is_empty() {
            return;
        }

        debug!(
            pool = self.id.0,
            blocks = self.blocks.block_count(),
            large = self.large.len(),
            outstanding,
            "releasing pool"
        );

        self.free_list.clear();
        self.blocks.release_all();
        self.large.release_all();
    }

    pub fn id(&self) -> PoolId {
        self.id
    }

    /// True iff `other` is this very pool, i.e. memory from one may be
    /// returned through the other.
    pub fn same_pool(&self, other: &PoolAllocator<T>) -> bool {
        self.id == other.id
    }

    /// A new, empty pool with the same configuration and its own identity.
    /// Nothing is reserved and no storage is shared with `self`.
    pub fn empty_copy(&self) -> Self {
        Self::empty(self.config)
    }

    /// Moves all storage, counters and the identity of this pool into the
    /// returned one, leaving `self` empty with a fresh identity.
    pub fn take(&mut self) -> Self {
        let fresh = Self::empty(self.config);

        replace(self, fresh)
    }

    /// An empty pool for another element type, configured like this one.
    pub fn rebind<U>(&self) -> PoolAllocator<U> {
        PoolAllocator::empty(self.config)
    }

    /// True if `ptr` currently points at a slot or a large allocation of this
    /// pool.
    pub fn owns(&self, ptr: NonNull<T>) -> bool {
        let addr = ptr.as_ptr() as usize;

        self.blocks.locate(addr).is_some() || self.large.contains(addr)
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn total_slots(&self) -> usize {
        self.blocks.total_slots()
    }

    pub fn used_slots(&self) -> usize {
        self.free_list.used_slots()
    }

    pub fn free_slots(&self) -> usize {
        self.free_list.free_slots()
    }

    /// Walks the free list and counts its nodes.
    pub fn count_free_list(&self) -> usize {
        self.free_list.walk_len()
    }

    pub fn large_allocations(&self) -> usize {
        self.large.len()
    }

    pub fn metrics(&self) -> PoolMetrics {
        PoolMetrics {
            expansions: self.blocks.expansions(),
            block_count: self.blocks.block_count(),
            block_bytes: self.blocks.block_bytes(),
            total_slots: self.blocks.total_slots(),
            used_slots: self.free_list.used_slots(),
            free_slots: self.free_list.free_slots(),
            large_allocations: self.large.len(),
            large_bytes: self.large.bytes(),
            ignored_deallocations: self.ignored_deallocations,
        }
    }
}

impl<T> Default for PoolAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for PoolAllocator<T> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<T> fmt::Debug for PoolAllocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("id", &self.id)
            .field("total_slots", &self.total_slots())
            .field("used_slots", &self.used_slots())
            .field("large_allocations", &self.large.len())
            .finish()
    }
}

impl<T> Allocate for PoolAllocator<T> {
    type Value = T;
    type Error = PoolError;
    type Rebind<U> = PoolAllocator<U>;

    fn allocate(&mut self, count: usize) -> Result<NonNull<T>, PoolError> {
        PoolAllocator::allocate(self, count)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) {
        PoolAllocator::deallocate(self, ptr, count)
    }

    fn same_pool(&self, other: &Self) -> bool {
        PoolAllocator::same_pool(self, other)
    }

    fn empty_copy(&self) -> Self {
        PoolAllocator::empty_copy(self)
    }

    fn rebind<U>(&self) -> Self::Rebind<U> {
        PoolAllocator::rebind(self)
    }
}
