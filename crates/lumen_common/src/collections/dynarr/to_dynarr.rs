use crate::collections::ReserveStrategy;

use super::DynArr;

pub trait ToDynArr<T> {
    /// Clone the contents into a new dynamic array, with a capacity of exactly the number of elements.
    fn to_dynarr<R: ReserveStrategy>(&self) -> DynArr<T, R>;
}

impl<T: Clone> ToDynArr<T> for [T] {
    /// Clones `self` into a new `DynArr`.
    ///
    /// If a clone panics, the elements cloned so far are dropped and the new buffer is released.
    ///
    /// # Examples
    ///
    /// ```
    /// use lumen_common::collections::{DynArr, ToDynArr};
    ///
    /// let s = [10, 40, 30];
    /// let x: DynArr<i32> = s.to_dynarr();
    /// // Here, 's' and 'x' can be modified independently.
    /// assert_eq!(x, s);
    /// assert_eq!(x.capacity(), 3);
    /// ```
    fn to_dynarr<R: ReserveStrategy>(&self) -> DynArr<T, R> {
        let mut arr = DynArr::with_capacity(self.len());
        for value in self {
            // SAFETY: The array was allocated with room for every element of `self`
            unsafe { arr.write_next(value.clone()) };
        }
        arr
    }
}
