use core::{
    convert::Infallible,
    fmt,
    hash::Hash,
    marker::PhantomData,
    mem::{self, ManuallyDrop},
    ops::{self, Index, IndexMut},
    ptr,
    slice::{self, SliceIndex},
};

use scopeguard::{guard, ScopeGuard};
use static_assertions::{assert_eq_size, assert_impl_all};

use super::{
    imp::raw_buffer::{handle_error, RawBuffer},
    impl_slice_partial_eq_generic, ConstructError, DoubleOrMinReserveStrategy, ReserveStrategy, TryReserveError, LOG_CAT,
};

mod into_iter;
mod to_dynarr;


pub use into_iter::IntoIter;
pub use to_dynarr::ToDynArr;

/// A contiguous growable array type, also known as a dynamic array, or DynArr.
///
/// Dynamic arrays have *O*(1) indexing, amortized *O*(1) push (to the end), and *O*(1) pop (from the back).
///
/// The array owns a single [`RawBuffer`] holding `capacity` slots, of which the first `len` hold live elements.
/// Whenever an operation needs more room, a new buffer is allocated, the live elements are moved over and the buffers are swapped,
/// so a failed allocation or a failed element constructor never leaves the array half-updated.
///
/// _Note: It was decided to not name this `Vec` as in the standard library, as this is easily confusable with a math vector_
///
/// # Examples
///
/// ```
/// use lumen_common::{collections::DynArr, dynarr};
///
/// let mut arr: DynArr<i32> = DynArr::new();
/// arr.push(1);
/// arr.push(2);
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr[0], 7);
///
/// arr.extend([1, 2, 3]);
/// assert_eq!(arr, dynarr![7, 2, 1, 2, 3]);
/// ```
///
/// # Capacity and reallocation
///
/// Capacity only grows, and only when needed.
/// Appending to a full array asks the reserve strategy `R` for the new capacity, [`DoubleOrMinReserveStrategy`] by default,
/// which doubles the capacity: `0, 1, 2, 4, 8, ...`.
/// [`reserve`] and [`resize`] on the other hand allocate exactly what they are asked for.
///
/// [`reserve`]: DynArr::reserve
/// [`resize`]: DynArr::resize
pub struct DynArr<T, R: ReserveStrategy = DoubleOrMinReserveStrategy> {
    buf:      RawBuffer<T>,
    len:      usize,
    _phantom: PhantomData<R>,
}

assert_eq_size!(DynArr<u32>, [usize; 3]);
assert_impl_all!(DynArr<u32>: Send, Sync, Clone, Default);

impl<T, R: ReserveStrategy> DynArr<T, R> {
    /// Constructs a new, empty `DynArr`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: RawBuffer::new(), len: 0, _phantom: PhantomData }
    }

    /// Constructs a new, empty `DynArr` with exactly the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: RawBuffer::with_capacity(capacity), len: 0, _phantom: PhantomData }
    }

    /// Tries to construct a new, empty `DynArr` with exactly the specified capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity exceeds `isize::MAX` _bytes_, or if the allocator reports a failure.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Ok(Self { buf: RawBuffer::try_with_capacity(capacity)?, len: 0, _phantom: PhantomData })
    }

    /// Constructs a `DynArr` with `len` elements, each one created by calling `f`.
    ///
    /// Both the length and the capacity of the returned array are exactly `len`.
    ///
    /// If `f` panics, the elements created so far are dropped and the storage is released before the panic continues.
    pub fn with_len_with<F>(len: usize, mut f: F) -> Self where
        F: FnMut() -> T
    {
        unwrap_infallible(Self::try_with_len_with(len, || Ok::<T, Infallible>(f())))
    }

    /// Tries to construct a `DynArr` with `len` elements, each one created by calling `f`.
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::Reserve`] when storage for `len` elements could not be allocated,
    /// and [`ConstructError::Construct`] with the first error returned by `f`.
    /// In the latter case, the elements created so far are dropped.
    pub fn try_with_len_with<E, F>(len: usize, mut f: F) -> Result<Self, ConstructError<E>> where
        F: FnMut() -> Result<T, E>
    {
        let mut arr = Self::try_with_capacity(len)?;
        for _ in 0..len {
            let value = f().map_err(ConstructError::Construct)?;
            // SAFETY: The array was created with a capacity of exactly `len`.
            unsafe { arr.write_next(value) };
        }
        Ok(arr)
    }

    /// Returns the number of elements the dynamic array can hold without reallocating.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Returns the number of elements in the dynamic array, also referred to as the 'length'.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the dynamic array contains no elements.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the underlying raw buffer.
    #[inline]
    pub fn raw_buffer(&self) -> &RawBuffer<T> {
        &self.buf
    }

    /// Makes sure the dynamic array can hold at least `new_capacity` elements.
    ///
    /// Unlike `Vec::reserve`, `new_capacity` is the *total* capacity, not an additional one.
    /// Does nothing if the capacity is already sufficient, otherwise the array is reallocated to hold exactly `new_capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    pub fn reserve(&mut self, new_capacity: usize) {
        if let Err(err) = self.try_reserve(new_capacity) {
            handle_error(err);
        }
    }

    /// Tries to make sure the dynamic array can hold at least `new_capacity` elements.
    ///
    /// # Errors
    ///
    /// If the capacity overflows, or the allocator reports a failure, an error is returned and the array is left untouched.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), TryReserveError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let new_buf = RawBuffer::try_with_capacity(new_capacity)?;
        // SAFETY: The new buffer is larger than `len`.
        unsafe { self.relocate_into(new_buf) };
        Ok(())
    }

    /// Shortens the dynamic array, keeping the first `len` elements and dropping the rest.
    ///
    /// If `len` is greater or equal to the dynamic array's current length, this has no effect.
    /// Note that this method has no effect on the allocated capacity of the dynamic array.
    pub fn truncate(&mut self, len: usize) {
        // SAFETY:
        // - The slice passed to `drop_in_place` is valid; the `len >= self.len` case avoids creating an invalid slice, and
        // - The `len` of the dynamic array is shrunk before calling `drop_in_place` such that no value will be dropped twice
        //   in case `drop_in_place` were to panic once (if it panics twice, the program aborts.)
        unsafe {
            if len >= self.len {
                return;
            }
            let remaining_len = self.len - len;
            let s = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(len), remaining_len);
            self.len = len;
            ptr::drop_in_place(s);
        }
    }

    /// Clears the dynamic array, removing all values.
    ///
    /// Note that this method has no effect on the allocated capacity of the dynamic array.
    #[inline]
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes the `DynArr` in-place so that `len` is equal to `new_len`, filling new slots by calling `f`.
    ///
    /// When growing, exactly `new_len` slots are reserved first.
    /// If `f` panics, the elements it created are dropped and the length stays unchanged, but the capacity may already have grown.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) where
        F: FnMut() -> T
    {
        unwrap_infallible(self.try_resize_with(new_len, || Ok::<T, Infallible>(f())))
    }

    /// Tries to resize the `DynArr` in-place so that `len` is equal to `new_len`, filling new slots by calling `f`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage could not be reserved, or if `f` fails.
    /// On a failing `f` the elements created so far are dropped and the length is left unchanged, the capacity might have grown though.
    pub fn try_resize_with<E, F>(&mut self, new_len: usize, mut f: F) -> Result<(), ConstructError<E>> where
        F: FnMut() -> Result<T, E>
    {
        let len = self.len;
        if new_len <= len {
            self.truncate(new_len);
            return Ok(());
        }

        self.try_reserve(new_len)?;

        let base = self.as_mut_ptr();
        let mut built = guard(len, |built| unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(len), built - len));
        });
        while *built < new_len {
            let value = f().map_err(ConstructError::Construct)?;
            // SAFETY: `new_len` slots were reserved above
            unsafe { ptr::write(base.add(*built), value) };
            *built += 1;
        }
        ScopeGuard::into_inner(built);

        self.len = new_len;
        Ok(())
    }

    /// Appends an element to the back of the collection.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_
    ///
    /// # Time complexity
    ///
    /// Takes amortized *O*(1) time.
    /// If the dynamic array's length would exceed its capacity after the push, *O*(*capacity*) time is taken to move the array's elements to a larger buffer.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.emplace_back(|| value);
    }

    /// Appends the element returned by `f` to the back of the collection, and returns a reference to it.
    ///
    /// When the array is full, the element is created directly in the new buffer before the existing elements are moved over.
    /// If `f` panics, the array is left as it was.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_
    pub fn emplace_back<F>(&mut self, f: F) -> &mut T where
        F: FnOnce() -> T
    {
        unwrap_infallible(self.try_emplace_back(|| Ok::<T, Infallible>(f())))
    }

    /// Tries to append the element returned by `f` to the back of the collection, and returns a reference to it.
    ///
    /// # Errors
    ///
    /// Returns an error if more storage was needed but could not be reserved, or if `f` fails.
    /// In both cases the array is left as it was.
    pub fn try_emplace_back<E, F>(&mut self, f: F) -> Result<&mut T, ConstructError<E>> where
        F: FnOnce() -> Result<T, E>
    {
        let len = self.len;
        if len == self.capacity() {
            let new_buf = self.grown_buffer()?;
            let value = f().map_err(ConstructError::Construct)?;
            // SAFETY: `new_buf` has room for at least `len + 1` elements
            unsafe {
                ptr::write(new_buf.offset(len), value);
                self.relocate_into(new_buf);
            }
        } else {
            let value = f().map_err(ConstructError::Construct)?;
            // SAFETY: `len < capacity`
            unsafe { ptr::write(self.as_mut_ptr().add(len), value) };
        }
        self.len = len + 1;
        // SAFETY: The element at `len` was just written
        Ok(unsafe { &mut *self.as_mut_ptr().add(len) })
    }

    /// Appends an element if there is sufficient spare capacity, otherwise the element is returned.
    ///
    /// Unlike [`push`], this method will never reallocate.
    ///
    /// [`push`]: DynArr::push
    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.len == self.capacity() {
            return Err(value);
        }
        // SAFETY: `len < capacity`
        unsafe { self.write_next(value) };
        Ok(())
    }

    /// Drops the last element of the dynamic array.
    ///
    /// # Panics
    ///
    /// Panics if the dynamic array is empty.
    #[track_caller]
    pub fn pop_back(&mut self) {
        #[cold]
        #[track_caller]
        fn assert_failed() -> ! {
            panic!("pop_back called on an empty dynamic array");
        }

        if self.len == 0 {
            assert_failed();
        }
        self.truncate(self.len - 1);
    }

    /// Removes the last element from the dynamic array and returns it, or [`None`] if it is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            // SAFETY: The element at the old `len - 1` is live, and no longer counted once `len` is decremented
            unsafe {
                self.len -= 1;
                Some(ptr::read(self.as_ptr().add(self.len)))
            }
        }
    }

    /// Inserts the element returned by `f` at position `index`, shifting all elements after it to the right.
    /// Returns a reference to the new element.
    ///
    /// Inserting at `index == len` is the same as [`emplace_back`](DynArr::emplace_back).
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the new capacity exceeds `isize::MAX` _bytes_.
    #[track_caller]
    pub fn emplace<F>(&mut self, index: usize, f: F) -> &mut T where
        F: FnOnce() -> T
    {
        unwrap_infallible(self.try_emplace(index, || Ok::<T, Infallible>(f())))
    }

    /// Tries to insert the element returned by `f` at position `index`, shifting all elements after it to the right.
    ///
    /// When the array is full, the new element is created in the new buffer first,
    /// after which the elements before and after `index` are moved around it.
    /// Otherwise the element is created before any element is shifted.
    ///
    /// # Errors
    ///
    /// Returns an error if more storage was needed but could not be reserved, or if `f` fails.
    /// In both cases the array is left as it was.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    #[track_caller]
    pub fn try_emplace<E, F>(&mut self, index: usize, f: F) -> Result<&mut T, ConstructError<E>> where
        F: FnOnce() -> Result<T, E>
    {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        let len = self.len;
        if index > len {
            assert_failed(index, len);
        }
        if index == len {
            return self.try_emplace_back(f);
        }

        if len == self.capacity() {
            let new_buf = self.grown_buffer()?;
            let value = f().map_err(ConstructError::Construct)?;
            // SAFETY: `new_buf` has room for at least `len + 1` elements, and does not overlap the current buffer
            unsafe {
                let src = self.as_mut_ptr();
                let dst = new_buf.ptr();
                ptr::write(dst.add(index), value);
                ptr::copy_nonoverlapping(src, dst, index);
                ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), len - index);
            }
            self.replace_buffer(new_buf);
        } else {
            let value = f().map_err(ConstructError::Construct)?;
            // SAFETY: `len < capacity`, so there is room to shift the tail by one
            unsafe {
                let p = self.as_mut_ptr().add(index);
                // Shift everything over to make space.
                // (Duplicating the `index`th element into two consecutive places.)
                ptr::copy(p, p.add(1), len - index);
                // Write it in, over writing the first copy of the `index`th element.
                ptr::write(p, value);
            }
        }
        self.len = len + 1;
        // SAFETY: The element at `index` was just written
        Ok(unsafe { &mut *self.as_mut_ptr().add(index) })
    }

    /// Inserts an element at position `index` within the dynamic array, shifting all elements after it to the right.
    /// Returns a reference to the inserted element.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`
    ///
    /// # Time complexity
    ///
    /// Takes *O*([`DynArr::len`]) time.
    /// All items after the insertion index must be shifted to the right.
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace(index, || value)
    }

    /// Removes and returns the element at position `index` within the dynamic array, shifting all elements after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            let ret;
            {
                // the place we are taking from
                let ptr = self.as_mut_ptr().add(index);
                // copy it out, unsafely having a copy of the value on the stack and in the array at the same time
                ret = ptr::read(ptr);

                // Shift everything down to fill in that spot
                ptr::copy(ptr.add(1), ptr, len - index - 1);
            }
            self.len = len - 1;
            ret
        }
    }

    /// Removes and drops the element at position `index`, shifting all elements after it to the left.
    ///
    /// Returns `index`, which now refers to the element that followed the erased one (or the end of the array).
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Exchanges the contents of `self` and `other`, without moving any element.
    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Takes the contents out of `self`, leaving an empty dynamic array without any capacity behind.
    #[inline]
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Extracts a slice containing the entire dynamic array.
    ///
    /// Equivalent to `&s[..]`.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self
    }

    /// Extracts a mutable slice of the entire dynamic array.
    ///
    /// Equivalent to `&mut s[..]`
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    /// Returns a raw pointer to the dynamic array's buffer, or a dangling raw pointer valid for zero sized reads if the dynamic array didn't allocate.
    ///
    /// Modifying the dynamic array may cause its buffer to be reallocated, which would also make any pointer to it invalid.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.buf.ptr()
    }

    /// Returns an unsafe mutable pointer to the dynamic array's buffer, or a dangling raw pointer valid for zero sized reads if the dynamic array didn't allocate.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.ptr()
    }

    /// # Safety
    ///
    /// `len < capacity`
    #[inline]
    unsafe fn write_next(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        ptr::write(self.as_mut_ptr().add(self.len), value);
        self.len += 1;
    }

    /// Allocate a buffer for at least one more element than `len`, sized by the reserve strategy.
    fn grown_buffer(&self) -> Result<RawBuffer<T>, TryReserveError> {
        let required = self.len.checked_add(1).ok_or(TryReserveError::CapacityOverflow)?;
        let new_capacity = R::calculate(self.capacity(), required).ok_or(TryReserveError::CapacityOverflow)?;
        RawBuffer::try_with_capacity(new_capacity)
    }

    /// Move all live elements into `new_buf` and make it the array's buffer.
    ///
    /// # Safety
    ///
    /// `new_buf.capacity() >= len`
    unsafe fn relocate_into(&mut self, new_buf: RawBuffer<T>) {
        ptr::copy_nonoverlapping(self.as_ptr(), new_buf.ptr(), self.len);
        self.replace_buffer(new_buf);
    }

    /// Swap in a buffer that already holds the live elements, releasing the old one without touching its slots.
    fn replace_buffer(&mut self, mut new_buf: RawBuffer<T>) {
        log::trace!(target: LOG_CAT, "dynarr grows from {} to {} slots ({} live)", self.capacity(), new_buf.capacity(), self.len);
        self.buf.swap(&mut new_buf);
    }
}

impl<T: Default, R: ReserveStrategy> DynArr<T, R> {
    /// Constructs a `DynArr` with `len` default elements, with a capacity of exactly `len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_common::collections::DynArr;
    ///
    /// let arr = DynArr::<u32>::with_len(3);
    /// assert_eq!(arr, [0, 0, 0]);
    /// assert_eq!(arr.capacity(), 3);
    /// ```
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self::with_len_with(len, T::default)
    }

    /// Resizes the `DynArr` in-place so that `len` is equal to `new_len`.
    ///
    /// If `new_len` is greater than `len`, the `DynArr` is extended by the difference, with each additional slot filled with `T::default()`.
    /// If `new_len` is less than `len`, the `DynArr` is simply truncated.
    pub fn resize(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default)
    }
}

#[track_caller]
fn unwrap_infallible<T>(res: Result<T, ConstructError<Infallible>>) -> T {
    match res {
        Ok(value) => value,
        Err(ConstructError::Reserve(err)) => handle_error(err),
        Err(ConstructError::Construct(never)) => match never {},
    }
}

#[doc(hidden)]
pub fn from_elem<T: Clone>(elem: T, n: usize) -> DynArr<T> {
    let mut arr = DynArr::with_capacity(n);
    if n > 0 {
        // SAFETY: The capacity is exactly `n`
        unsafe {
            for _ in 1..n {
                arr.write_next(elem.clone());
            }
            arr.write_next(elem);
        }
    }
    arr
}

/// Creates a [`DynArr`] containing the arguments.
///
/// - Create a [`DynArr`] containing a given list of elements:
///
/// ```
/// use lumen_common::dynarr;
///
/// let arr = dynarr![1, 2, 3];
/// assert_eq!(arr[0], 1);
/// assert_eq!(arr.capacity(), 3);
/// ```
///
/// - Create a [`DynArr`] from a given element and size:
///
/// ```
/// use lumen_common::dynarr;
///
/// let arr = dynarr![1; 3];
/// assert_eq!(arr, [1, 1, 1]);
/// ```
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::collections::DynArr::<_>::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {{
        let mut arr = $crate::collections::DynArr::<_>::with_capacity($crate::count_exprs!($($x),+));
        $(arr.push($x);)+
        arr
    }};
}

//------------------------------------------------------------------------------------------------------------------------------

impl<T, R: ReserveStrategy> ops::Deref for DynArr<T, R> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &Self::Target {
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }
}

impl<T, R: ReserveStrategy> ops::DerefMut for DynArr<T, R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }
}

impl<T: Clone, R: ReserveStrategy> Clone for DynArr<T, R> {
    /// Clones the dynamic array, the clone has a capacity of exactly `len`.
    fn clone(&self) -> Self {
        self.as_slice().to_dynarr()
    }

    /// Overwrites the contents of `self` with a clone of the contents of `source`.
    ///
    /// If `self` can hold all of `source`'s elements, its buffer is reused:
    /// the common prefix is clone-assigned and the remainder is either cloned in, or dropped.
    /// A panicking clone then leaves `self` valid, but with only part of `source` copied over.
    ///
    /// Otherwise `source` is cloned into a new array which is then swapped in, leaving `self` untouched if a clone panics.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut tmp = source.clone();
            self.swap(&mut tmp);
            return;
        }

        let common = self.len.min(source.len);
        self[..common].clone_from_slice(&source[..common]);
        if source.len < self.len {
            self.truncate(source.len);
        } else {
            for value in &source[common..] {
                // SAFETY: `source.len <= capacity`
                unsafe { self.write_next(value.clone()) };
            }
        }
    }
}

impl<T, R: ReserveStrategy> Drop for DynArr<T, R> {
    fn drop(&mut self) {
        unsafe {
            // use drop for [T]
            // uses a raw slice to refer to the elements of the dynamic array as the weakest necessary type
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len))
        }
        // RawBuffer handles deallocation
    }
}

impl<T, R: ReserveStrategy> Default for DynArr<T, R> {
    /// Creates an empty `DynArr<T>`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash, R: ReserveStrategy> Hash for DynArr<T, R> {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, I: SliceIndex<[T]>, R: ReserveStrategy> Index<I> for DynArr<T, R> {
    type Output = I::Output;

    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>, R: ReserveStrategy> IndexMut<I> for DynArr<T, R> {
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<T, R: ReserveStrategy> FromIterator<T> for DynArr<T, R> {
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut arr = Self::new();
        arr.extend(iter);
        arr
    }
}

impl<T, R: ReserveStrategy> IntoIterator for DynArr<T, R> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    /// Creates a consuming iterator, that is, one that moves each value out of the dynamic array (from start to end).
    /// The dynamic array cannot be used after calling this
    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        let mut me = ManuallyDrop::new(self);
        // The empty buffer left behind owns no memory, so not dropping it is fine
        let buf = me.buf.take();
        IntoIter::new(buf, me.len)
    }
}

impl<'a, T, R: ReserveStrategy> IntoIterator for &'a DynArr<T, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, R: ReserveStrategy> IntoIterator for &'a mut DynArr<T, R> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, R: ReserveStrategy> Extend<T> for DynArr<T, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        if lower > self.capacity() - self.len {
            let required = self.len.saturating_add(lower);
            match R::calculate(self.capacity(), required) {
                Some(new_capacity) => self.reserve(new_capacity),
                None => handle_error(TryReserveError::CapacityOverflow),
            }
        }
        for value in iter {
            self.push(value);
        }
    }
}

/// Extend implementation that copies elements out of references before pushing them onto the DynArr.
impl<'a, T: Copy + 'a, R: ReserveStrategy> Extend<&'a T> for DynArr<T, R> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied())
    }
}

impl_slice_partial_eq_generic!([R0: ReserveStrategy, R1: ReserveStrategy] DynArr<T, R0>, DynArr<U, R1>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] DynArr<T, R>, &[U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] DynArr<T, R>, &mut [U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] &[T], DynArr<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] &mut [T], DynArr<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy] DynArr<T, R>, [U]);
impl_slice_partial_eq_generic!([R: ReserveStrategy] [T], DynArr<U, R>);
impl_slice_partial_eq_generic!([R: ReserveStrategy, const N: usize] DynArr<T, R>, [U; N]);
impl_slice_partial_eq_generic!([R: ReserveStrategy, const N: usize] [T; N], DynArr<U, R>);

impl<T, R0, R1> PartialOrd<DynArr<T, R1>> for DynArr<T, R0> where
    T: PartialOrd,
    R0: ReserveStrategy,
    R1: ReserveStrategy
{
    #[inline]
    fn partial_cmp(&self, other: &DynArr<T, R1>) -> Option<core::cmp::Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }
}

impl<T: Eq, R: ReserveStrategy> Eq for DynArr<T, R> {}

impl<T: Ord, R: ReserveStrategy> Ord for DynArr<T, R> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        Ord::cmp(&**self, &**other)
    }
}

impl<T: fmt::Debug, R: ReserveStrategy> fmt::Debug for DynArr<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T, R: ReserveStrategy> AsRef<DynArr<T, R>> for DynArr<T, R> {
    fn as_ref(&self) -> &DynArr<T, R> {
        self
    }
}

impl<T, R: ReserveStrategy> AsMut<DynArr<T, R>> for DynArr<T, R> {
    fn as_mut(&mut self) -> &mut DynArr<T, R> {
        self
    }
}

impl<T, R: ReserveStrategy> AsRef<[T]> for DynArr<T, R> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, R: ReserveStrategy> AsMut<[T]> for DynArr<T, R> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, R: ReserveStrategy> From<&[T]> for DynArr<T, R> {
    /// Allocate a `DynArr<T>` and fill it by cloning `s`'s items.
    fn from(s: &[T]) -> Self {
        s.to_dynarr()
    }
}

impl<T: Clone, R: ReserveStrategy, const N: usize> From<&[T; N]> for DynArr<T, R> {
    fn from(s: &[T; N]) -> Self {
        Self::from(s.as_slice())
    }
}

impl<T, R: ReserveStrategy, const N: usize> From<[T; N]> for DynArr<T, R> {
    /// Allocate a `DynArr<T>` and move `value`'s items into it.
    fn from(value: [T; N]) -> Self {
        let mut res = Self::with_capacity(N);
        unsafe {
            let value = ManuallyDrop::new(value);
            ptr::copy_nonoverlapping(value.as_ptr(), res.as_mut_ptr(), N);
            res.len = N;
        }
        res
    }
}
