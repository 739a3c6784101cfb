use core::{
    alloc::Layout,
    fmt,
    marker::PhantomData,
    mem::{self, align_of, size_of, MaybeUninit},
    ptr::NonNull,
};
use std::alloc;

use static_assertions::{assert_eq_size, assert_impl_all, assert_not_impl_any};

use crate::collections::{TryReserveError, LOG_CAT};


/// Low level owner of a block of uninitialized memory, sized for exactly `capacity` elements of `T`.
///
/// - Produces a dangling pointer for zero-length buffers and for zero-sized types, and never frees it.
/// - Catches all overflows in capacity computations (promotes them to "capacity overflow" errors).
/// - Never grows or shrinks: a buffer of a different size is a different `RawBuffer`.
///
/// This type does not in any way inspect the memory it manages.
/// When dropped it *will* free its memory, but it *won't* try to drop its contents.
/// It is up to the user of `RawBuffer` to handle the actual things *stored* inside of it.
///
/// A `RawBuffer` can't be cloned, as copying raw storage without knowing which slots are live is meaningless.
/// Ownership is transferred by moving it, or with [`swap`] and [`take`], all of which are *O*(1).
///
/// Unlike the std `RawVec`, the capacity of a zero-sized type is the requested capacity, not `usize::MAX`.
///
/// [`swap`]: RawBuffer::swap
/// [`take`]: RawBuffer::take
pub struct RawBuffer<T> {
    ptr:      NonNull<T>,
    capacity: usize,
    _phantom: PhantomData<T>,
}

// SAFETY: `RawBuffer` uniquely owns its memory, just like `Box<[MaybeUninit<T>]>` would.
unsafe impl<T: Send> Send for RawBuffer<T> {}
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

assert_eq_size!(RawBuffer<u32>, [usize; 2]);
assert_impl_all!(RawBuffer<u32>: Send, Sync, Default);
assert_not_impl_any!(RawBuffer<u32>: Clone, Copy);

impl<T> RawBuffer<T> {
    /// Creates an empty `RawBuffer` without allocating.
    #[must_use]
    pub const fn new() -> Self {
        Self { ptr: NonNull::dangling(), capacity: 0, _phantom: PhantomData }
    }

    /// Creates a `RawBuffer` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    /// This is equivalent to calling `RawBuffer::new` when `capacity` is `0`.
    ///
    /// Non-fallible version of `try_with_capacity`.
    ///
    /// # Panics
    ///
    /// Panics if the requested capacity exceeds `isize::MAX` bytes.
    ///
    /// # Aborts
    ///
    /// Aborts on OOM
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(buf) => buf,
            Err(err) => handle_error(err),
        }
    }

    /// Tries to create a `RawBuffer` with exactly the capacity and alignment requirements for a `[T; capacity]`.
    ///
    /// # Errors
    ///
    /// Returns [`TryReserveError::CapacityOverflow`] if the requested capacity exceeds `isize::MAX` bytes,
    /// and [`TryReserveError::AllocError`] if the allocator could not provide the memory.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        // Don't allocate here, because `drop` will not deallocate when capacity is 0.
        if capacity == 0 {
            return Ok(Self::new());
        }

        let layout = Layout::array::<T>(capacity).map_err(|_| TryReserveError::CapacityOverflow)?;
        if layout.size() == 0 {
            return Ok(Self { ptr: NonNull::dangling(), capacity, _phantom: PhantomData });
        }

        // SAFETY: `layout` has a non-zero size
        let ptr = unsafe { alloc::alloc(layout) };
        match NonNull::new(ptr.cast::<T>()) {
            Some(ptr) => Ok(Self { ptr, capacity, _phantom: PhantomData }),
            None => {
                log::error!(target: LOG_CAT, "failed to allocate {} bytes for {capacity} slots", layout.size());
                Err(TryReserveError::AllocError(layout))
            },
        }
    }

    /// Get the number of slots in the buffer.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a raw pointer to the start of the allocation.
    /// Note that this is a dangling pointer when either `capacity() == 0` or `T` is zero-sized.
    #[inline]
    pub const fn ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Same as [`ptr`](RawBuffer::ptr), but as a `NonNull`.
    #[inline]
    pub const fn non_null(&self) -> NonNull<T> {
        self.ptr
    }

    /// Get the slot at `index`.
    ///
    /// The slot may or may not hold a live value, the buffer does not know.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[inline]
    #[track_caller]
    pub fn at(&self, index: usize) -> &MaybeUninit<T> {
        if index >= self.capacity {
            slot_out_of_range(index, self.capacity);
        }
        // SAFETY: `index` is within the allocation and `MaybeUninit` has no validity requirements
        unsafe { &*self.ptr.as_ptr().add(index).cast::<MaybeUninit<T>>() }
    }

    /// Get the mutable slot at `index`.
    ///
    /// Writing to a slot which holds a live value will leak that value.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[inline]
    #[track_caller]
    pub fn at_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        if index >= self.capacity {
            slot_out_of_range(index, self.capacity);
        }
        // SAFETY: `index` is within the allocation and `MaybeUninit` has no validity requirements
        unsafe { &mut *self.ptr.as_ptr().add(index).cast::<MaybeUninit<T>>() }
    }

    /// Get the address of slot `offset`.
    ///
    /// `offset == capacity` is allowed and returns the one-past-the-end address, so that `offset(0)..offset(len)` describes a range of slots.
    ///
    /// # Panics
    ///
    /// Panics if `offset > capacity`.
    #[inline]
    #[track_caller]
    pub fn offset(&self, offset: usize) -> *mut T {
        if offset > self.capacity {
            offset_out_of_range(offset, self.capacity);
        }
        // SAFETY: at most one past the end of the allocation
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Exchanges the storage of `self` and `other`.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Takes the storage out of `self`, leaving an empty buffer behind.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    fn current_memory(&self) -> Option<(NonNull<u8>, Layout)> {
        if size_of::<T>() == 0 || self.capacity == 0 {
            None
        } else {
            // We could use Layout::array here, but this memory has already been allocated with it, so we know it can't overflow.
            debug_assert!(size_of::<T>() % align_of::<T>() == 0);
            unsafe {
                let size = size_of::<T>() * self.capacity;
                let layout = Layout::from_size_align_unchecked(size, align_of::<T>());
                Some((self.non_null().cast(), layout))
            }
        }
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if let Some((ptr, layout)) = self.current_memory() {
            // SAFETY: allocated with the global allocator and this exact layout in `try_with_capacity`
            unsafe { alloc::dealloc(ptr.as_ptr(), layout) };
        }
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}

/// Central function for reserve error handling
#[cold]
#[track_caller]
pub(crate) fn handle_error(e: TryReserveError) -> ! {
    match e {
        TryReserveError::CapacityOverflow => capacity_overflow(),
        TryReserveError::AllocError(layout) => alloc::handle_alloc_error(layout),
    }
}

#[track_caller]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[cold]
#[track_caller]
fn slot_out_of_range(index: usize, capacity: usize) -> ! {
    panic!("slot index (is {index}) should be < capacity (is {capacity})");
}

#[cold]
#[track_caller]
fn offset_out_of_range(offset: usize, capacity: usize) -> ! {
    panic!("slot offset (is {offset}) should be <= capacity (is {capacity})");
}
