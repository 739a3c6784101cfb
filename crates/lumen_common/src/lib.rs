//! Common building blocks for lumen.
//!
//! Currently this is the collections module: a raw, uninitialized [`RawBuffer`](collections::RawBuffer)
//! and the [`DynArr`](collections::DynArr) dynamic array built on top of it.

pub use lumen_base::count_exprs;

pub mod collections;
pub mod prelude;
