//! Error types.

use thiserror::Error;

/// Reasons an edge sequence cannot form a knot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnotError {
    /// The edge list was empty.
    #[error("a knot needs at least one edge")]
    Empty,

    /// An edge carried the `Zero` direction.
    #[error("edge {index} has no direction")]
    ZeroDirection { index: usize },

    /// Fewer edges than the smallest closed loop on the lattice.
    #[error("a knot needs at least {min} edges, got {got}")]
    TooFewEdges { min: usize, got: usize },

    /// Following all edges does not return to the start.
    #[error("edges do not form a closed loop (ends at {x}, {y}, {z})")]
    NotClosed { x: i32, y: i32, z: i32 },

    /// The same edge (by id) appears twice in the sequence.
    #[error("edge {index} repeats an earlier edge")]
    DuplicateEdge { index: usize },

    /// Two edges run over the same lattice segment.
    #[error("edges {first} and {second} overlap")]
    Overlapping { first: usize, second: usize },
}

/// Errors while reading or writing the knot text format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The input had no name line.
    #[error("missing knot name")]
    MissingName,

    #[error("line {line}: unknown direction character {found:?}")]
    BadDirection { line: usize, found: char },

    #[error("line {line}: invalid color {found:?}")]
    BadColor { line: usize, found: String },

    #[error("line {line}: invalid rectangle tag {found:?}")]
    BadTag { line: usize, found: String },

    /// The decoded edges were rejected by [`crate::Knot::new`].
    #[error("invalid knot: {0}")]
    Knot(#[from] KnotError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
