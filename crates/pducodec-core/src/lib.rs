#![cfg_attr(doc, doc = include_str!("../README.md"))]
#![cfg_attr(not(feature = "std"), no_std)]
#![warn(clippy::std_instead_of_alloc)]
#![warn(clippy::std_instead_of_core)]
#![cfg_attr(doc, warn(missing_docs))]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod macros;

mod bits;
mod endian;
#[cfg(feature = "alloc")]
mod value;

// Flat API hierarchy of common traits and types, mirroring ironrdp-core's layout.

pub use self::bits::*;
pub use self::endian::*;
#[cfg(feature = "alloc")]
pub use self::value::*;
