//! lumen: a raw buffer and a value-semantic dynamic array.
//!
//! ```
//! use lumen::prelude::*;
//!
//! let mut arr = dynarr![10, 20, 30];
//! arr.insert(1, 99);
//! assert_eq!(arr, [10, 99, 20, 30]);
//! assert_eq!(arr.erase(1), 1);
//! assert_eq!(arr, [10, 20, 30]);
//! ```

pub use lumen_base as base;
pub use lumen_common as common;

pub mod prelude {
    pub use lumen_common::prelude::*;
}
