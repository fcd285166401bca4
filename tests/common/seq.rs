use slotpool::Allocate;
use std::ptr::{self, NonNull};
use std::slice;

// Minimal growable sequence that gets all of its storage through an
// `Allocate` implementation. Starts at two elements and doubles.
pub struct Seq<T, A: Allocate<Value = T>> {
    alloc: A,
    data: NonNull<T>,
    len: usize,
    cap: usize,
}

impl<T, A: Allocate<Value = T>> Seq<T, A> {
    const INIT_CAP: usize = 2;
    const GROW_RATE: usize = 2;

    pub fn new_in(alloc: A) -> Self {
        Self {
            alloc,
            data: NonNull::dangling(),
            len: 0,
            cap: 0,
        }
    }

    pub fn with_capacity_in(cap: usize, alloc: A) -> Result<Self, A::Error> {
        let mut seq = Self::new_in(alloc);

        seq.reserve(cap)?;

        Ok(seq)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    pub fn allocator_mut(&mut self) -> &mut A {
        &mut self.alloc
    }

    pub fn as_slice(&self) -> &[T] {
        unsafe { slice::from_raw_parts(self.data.as_ptr(), self.len) }
    }

    pub fn push(&mut self, value: T) -> Result<(), A::Error> {
        if self.len == self.cap {
            let new_cap = if self.cap == 0 {
                Self::INIT_CAP
            } else {
                self.cap * Self::GROW_RATE
            };

            self.reserve(new_cap)?;
        }

        unsafe { self.data.as_ptr().add(self.len).write(value) };
        self.len += 1;

        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }

        self.len -= 1;

        Some(unsafe { self.data.as_ptr().add(self.len).read() })
    }

    pub fn reserve(&mut self, new_cap: usize) -> Result<(), A::Error> {
        if new_cap <= self.cap {
            return Ok(());
        }

        let new_data = self.alloc.allocate(new_cap)?;

        unsafe {
            ptr::copy_nonoverlapping(self.data.as_ptr(), new_data.as_ptr(), self.len);

            if self.cap > 0 {
                self.alloc.deallocate(self.data, self.cap);
            }
        }

        self.data = new_data;
        self.cap = new_cap;

        Ok(())
    }

    pub fn clear(&mut self) {
        let len = self.len;

        self.len = 0;

        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.data.as_ptr(), len));
        }
    }
}

impl<T, A: Allocate<Value = T>> Drop for Seq<T, A> {
    fn drop(&mut self) {
        self.clear();

        if self.cap > 0 {
            unsafe { self.alloc.deallocate(self.data, self.cap) };
        }
    }
}

impl<T: Clone, A: Allocate<Value = T>> Clone for Seq<T, A> {
    fn clone(&self) -> Self {
        let mut seq = Self::new_in(self.alloc.empty_copy());

        if let Err(err) = seq.reserve(self.len) {
            panic!("failed to clone sequence: {err}");
        }

        for item in self.as_slice() {
            if let Err(err) = seq.push(item.clone()) {
                panic!("failed to clone sequence: {err}");
            }
        }

        seq
    }
}
