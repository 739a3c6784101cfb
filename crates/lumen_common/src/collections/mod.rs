mod imp;

mod dynarr;

use core::alloc::Layout;

use thiserror::Error;

pub use imp::raw_buffer::RawBuffer;
pub use dynarr::*;

/// Log target used by the collections in this module.
pub(crate) const LOG_CAT: &str = "lumen::collections";

//--------------------------------------------------------------

macro_rules! impl_slice_partial_eq_generic {
    ([$($vars:tt)*] $lhs:ty, $rhs:ty $(where $ty:ty: $bound:ident)?) => {
        impl<T, U, $($vars)*> PartialEq<$rhs> for $lhs  where
            T : PartialEq<U>,
            $($ty: $bound)?
        {
            #[inline]
            fn eq(&self, other: &$rhs) -> bool { self[..] == other[..] }
            #[allow(clippy::partialeq_ne_impl)]
            #[inline]
            fn ne(&self, other: &$rhs) -> bool { self[..] != other[..] }
        }
    };
}
use impl_slice_partial_eq_generic;

//--------------------------------------------------------------

/// Error returned when a collection could not obtain the storage it needed.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum TryReserveError {
    /// The requested capacity exceeds `isize::MAX` bytes, or the capacity computation overflowed.
    #[error("capacity overflow")]
    CapacityOverflow,
    /// The allocator reported a failure for the given layout.
    #[error("memory allocation of {} bytes (align {}) failed", .0.size(), .0.align())]
    AllocError(Layout),
}

/// Error returned by the fallible construct-in-place operations, e.g. [`DynArr::try_emplace_back`].
///
/// Whatever the variant, the collection is left as it was before the call (see the documentation of the individual operations for the exceptions).
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum ConstructError<E> {
    /// Storage for the new element(s) could not be reserved.
    #[error(transparent)]
    Reserve(#[from] TryReserveError),
    /// The element constructor returned an error.
    #[error("element construction failed: {0}")]
    Construct(E),
}

//--------------------------------------------------------------

/// A trait used to define a strategy to reserve additional memory for containers.
pub trait ReserveStrategy {
    /// Calculate the new capacity for a container.
    ///
    /// `cur_capacity` represents the current capacity of the container.
    ///
    /// `min_capacity` represents the minimum required capacity to be able to resize.
    ///
    /// Returns `None` if the capacity were to overflow
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize>;
}

/// A reserve strategy that will try to either return double the current capacity, or the minimum required capacity, whichever is bigger.
///
/// Growing one element at a time from an empty container results in the capacities `1, 2, 4, 8, ...`.
pub struct DoubleOrMinReserveStrategy;

impl ReserveStrategy for DoubleOrMinReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize> {
        let double_cap = cur_capacity.checked_mul(2)?;
        let new_cap = if double_cap > min_capacity { double_cap } else { min_capacity };
        if new_cap <= isize::MAX as usize {
            Some(new_cap)
        } else {
            None
        }
    }
}

/// A reserve strategy that will return a power of 2 capacity
pub struct Pow2ReserveStrategy;

impl ReserveStrategy for Pow2ReserveStrategy {
    fn calculate(_cur_capacity: usize, min_capacity: usize) -> Option<usize> {
        min_capacity.checked_next_power_of_two()
            .filter(|&cap| cap <= isize::MAX as usize)
    }
}

/// A reserve stategy that grows the capacity by 1.5
pub struct ThreeHalvesReserveStrategy;

impl ReserveStrategy for ThreeHalvesReserveStrategy {
    fn calculate(cur_capacity: usize, min_capacity: usize) -> Option<usize> {
        // 1.5 * 0 is still 0, start from a single slot
        let mut cap = cur_capacity.max(1);
        while cap < min_capacity {
            cap = (cap << 1) - (cap >> 1);
            if cap >= isize::MAX as usize {
                return None;
            }
        }
        Some(cap)
    }
}
