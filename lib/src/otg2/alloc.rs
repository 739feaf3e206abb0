//! Allocation facade so the rest of the crate compiles under either the `std` or the
//! `alloc`-only feature set, mirroring the no_std posture the teacher crate aims for.

#[cfg(feature = "std")]
pub use std::{boxed, format, string, vec};

#[cfg(all(not(feature = "std"), feature = "alloc"))]
extern crate alloc as alloc_crate;
#[cfg(all(not(feature = "std"), feature = "alloc"))]
pub use alloc_crate::{boxed, format, string, vec};
