mod common;

use common::Seq;
use slotpool::{Allocate, PoolAllocator, PoolConfig, SystemAllocator};
use std::cell::Cell;
use std::rc::Rc;

fn factorial(n: u64) -> u64 {
    (2..=n).product()
}

#[test]
fn pool_and_system_sequences_agree() {
    let mut with_system: Seq<u64, SystemAllocator<u64>> = Seq::new_in(SystemAllocator::new());
    let mut with_pool: Seq<u64, PoolAllocator<u64>> =
        Seq::new_in(PoolAllocator::with_capacity(10).unwrap());

    for i in 0..10 {
        with_system.push(factorial(i)).unwrap();
        with_pool.push(factorial(i)).unwrap();
    }

    assert_eq!(with_system.as_slice(), with_pool.as_slice());
    assert_eq!(with_pool.as_slice()[9], 362_880);
}

#[test]
fn growth_returns_old_storage() {
    let mut seq: Seq<u32, PoolAllocator<u32>> = Seq::new_in(PoolAllocator::new());

    for i in 0..100 {
        seq.push(i).unwrap();
        assert_eq!(seq.allocator().large_allocations(), 1);
    }

    assert_eq!(seq.capacity(), 128);
    assert_eq!(seq.as_slice().iter().sum::<u32>(), 4950);
    assert_eq!(seq.allocator().metrics().ignored_deallocations, 0);
}

#[test]
fn single_element_storage_comes_from_slots() {
    let mut seq: Seq<u32, PoolAllocator<u32>> =
        Seq::with_capacity_in(1, PoolAllocator::new()).unwrap();

    assert_eq!(seq.allocator().used_slots(), 1);
    assert_eq!(seq.allocator().large_allocations(), 0);

    seq.push(1).unwrap();
    seq.push(2).unwrap();

    // the one slot went back when the sequence grew past it
    assert_eq!(seq.allocator().used_slots(), 0);
    assert_eq!(seq.allocator().large_allocations(), 1);
    assert_eq!(seq.as_slice(), &[1, 2]);

    let metrics = seq.allocator().metrics();
    assert_eq!(metrics.free_slots, metrics.total_slots);
}

#[test]
fn explicit_reserve_uses_one_large_allocation() {
    let mut seq: Seq<i32, PoolAllocator<i32>> =
        Seq::new_in(PoolAllocator::with_capacity(10).unwrap());

    seq.reserve(10).unwrap();

    for i in 0..10 {
        seq.push(i).unwrap();
    }

    assert_eq!(seq.capacity(), 10);
    assert_eq!(seq.allocator().large_allocations(), 1);
    assert_eq!(seq.allocator().used_slots(), 0);
    assert_eq!(seq.allocator().metrics().expansions, 1);
}

#[derive(Clone)]
struct DropCounter(Rc<Cell<usize>>);

impl Drop for DropCounter {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

#[test]
fn values_are_dropped_once() {
    let drops = Rc::new(Cell::new(0));

    {
        let mut seq = Seq::new_in(PoolAllocator::<DropCounter>::new());

        for _ in 0..33 {
            seq.push(DropCounter(drops.clone())).unwrap();
        }

        drop(seq.pop());
        assert_eq!(drops.get(), 1);
    }

    assert_eq!(drops.get(), 33);
}

#[test]
fn strings_survive_reallocation() {
    let strings: PoolAllocator<String> = PoolAllocator::<u8>::new().rebind();
    let mut seq = Seq::new_in(strings);

    for i in 0..50 {
        seq.push(format!("item-{i}")).unwrap();
    }

    assert_eq!(seq.len(), 50);
    assert_eq!(seq.as_slice()[49], "item-49");
    assert_eq!(seq.as_slice()[0], "item-0");
}

#[test]
fn clone_gets_its_own_pool() {
    let mut seq = Seq::new_in(PoolAllocator::<u64>::new());

    for i in 0..20 {
        seq.push(i).unwrap();
    }

    let copy = seq.clone();

    assert_eq!(copy.as_slice(), seq.as_slice());
    assert!(!copy.allocator().same_pool(seq.allocator()));
    assert_eq!(copy.allocator().large_allocations(), 1);
    assert!(!seq.allocator().owns(std::ptr::NonNull::from(&copy.as_slice()[0])));
}

#[test]
fn moved_sequence_keeps_its_pool() {
    let mut seq = Seq::new_in(PoolAllocator::<u64>::new());
    seq.push(1).unwrap();
    let id = seq.allocator().id();

    let mut moved = seq;
    moved.push(2).unwrap();

    assert_eq!(moved.allocator().id(), id);
    assert_eq!(moved.as_slice(), &[1, 2]);
}

#[test]
fn strict_pool_accepts_well_behaved_container() {
    let config = PoolConfig {
        strict_deallocation: true,
        assert_empty_on_release: true,
        min_block_slots: 4,
        ..PoolConfig::default()
    };
    let mut seq = Seq::with_capacity_in(1, PoolAllocator::<u16>::with_config(config).unwrap()).unwrap();

    for i in 0..300 {
        seq.push(i).unwrap();
    }

    while seq.pop().is_some() {}

    assert!(seq.is_empty());
    assert_eq!(Allocate::empty_copy(seq.allocator()).config(), &config);
}
