mod allocate;
mod block;
mod block_store;
mod constants;
mod free_list;
mod large;
mod pool;
mod slot;
mod system;


pub use allocate::Allocate;
pub use constants::DEFAULT_BLOCK_SIZE;
pub use pool::{PoolAllocator, PoolId};
pub use system::SystemAllocator;
