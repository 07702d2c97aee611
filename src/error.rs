//! Error types for stripify.
//!
//! Every failure in the loading and stripification passes is fatal: the
//! algorithms are deterministic, so nothing here is worth retrying.

use thiserror::Error;

/// Result type alias using [`StripError`].
pub type Result<T> = std::result::Result<T, StripError>;

/// Errors that can occur while loading a mesh or building strips.
#[derive(Error, Debug)]
pub enum StripError {
    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A face references an invalid texture-coordinate index.
    #[error("face {face} references invalid texture coordinate index {tex_coord}")]
    InvalidTexCoordIndex {
        /// The face index.
        face: usize,
        /// The invalid texture-coordinate index.
        tex_coord: usize,
    },

    /// A face has duplicate vertex indices (degenerate triangle).
    #[error("face {face} is degenerate (has duplicate vertices)")]
    DegenerateFace {
        /// The face index.
        face: usize,
    },

    /// Consecutive faces of a strip do not share the vertices the
    /// linearizer needs to stitch them together.
    #[error("strip {strip} is broken at face position {position}: adjacent faces do not share an edge")]
    BrokenStrip {
        /// Index of the strip in the strip set.
        strip: usize,
        /// Position of the offending face within the strip.
        position: usize,
    },

    /// An output buffer could not be allocated.
    #[error("out of memory while allocating {what}")]
    OutOfMemory {
        /// The buffer being allocated.
        what: &'static str,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl StripError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        StripError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StripError::BrokenStrip { strip: 2, position: 5 };
        assert_eq!(
            err.to_string(),
            "strip 2 is broken at face position 5: adjacent faces do not share an edge"
        );

        let err = StripError::invalid_param("max_strip_length", 0, "must be at least 1");
        assert_eq!(
            err.to_string(),
            "invalid parameter: max_strip_length = 0 (must be at least 1)"
        );
    }
}
