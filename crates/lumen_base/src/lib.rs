//! Library defining cross library utilities that can be implemented using `#![no_std]`
#![cfg_attr(not(test), no_std)]

mod helper_macros;
