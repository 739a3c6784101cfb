pub use crate::collections::{DynArr, ToDynArr};
pub use crate::dynarr;
