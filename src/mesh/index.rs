//! Index types for mesh elements.
//!
//! Vertices, half-edges, and faces live in flat arenas and are addressed by
//! `u32` indices. Each element kind gets its own wrapper so they cannot be
//! mixed up; absent links (a boundary edge has no twin) are `Option`s rather
//! than sentinel values.

use std::fmt::{self, Debug};

use crate::error::{Result, StripError};

/// Largest element count addressable by the `u32` index types.
pub const MAX_INDEX_COUNT: usize = u32::MAX as usize;

/// Reject `count` elements of kind `name` if they cannot all be indexed
/// with `u32`.
pub fn check_index_range(name: &'static str, count: usize) -> Result<()> {
    if count > MAX_INDEX_COUNT {
        return Err(StripError::invalid_param(
            name,
            count,
            "exceeds the 32-bit index range",
        ));
    }
    Ok(())
}

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe half-edge index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            ///
            /// # Panics
            /// Panics in debug builds if the value does not fit in 32 bits.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "index {} too large for u32", index);
                Self(index as u32)
            }

            /// Get the index as a `usize`, for addressing arenas.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw 32-bit value.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
impl_index_type!(FaceId, "F");
