//! Benchmarks for infracat.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
