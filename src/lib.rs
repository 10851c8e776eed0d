//! # knot3
//!
//! `knot3` is the topology core of the Knot3 puzzle: a closed knot made of unit
//! edges on a 3D integer lattice, which the player reshapes by moving selected
//! edges. It is written for use from Rust as well as compiled to WebAssembly
//! (WASM).
//!
//! ## Features
//!
//! - **Knots as cyclic edge sequences**: moves splice detours around the
//!   selected edges and straighten the result, rejecting anything that would
//!   collapse or overlap the loop.
//! - **Grid mapping**: edges are mapped to lattice nodes; pipes and junctions
//!   are reused across updates by edge identity and stale records are swept.
//! - **Surface patches**: rectangles that close the tube surface at turns are
//!   found by a terminating fixpoint over real and synthesized edges.
//! - **Text format**: knots are read and written in a line-based format.
//! - **WASM-first**: the [`KnotScene`] wrapper exposes everything with flat arrays.
//!
//! ## Main Interface
//!
//! The primary entry points are [`Knot`] for the edge sequence and moves, and
//! [`Grid`] for node positions and junctions.

mod direction;
mod edge;
mod error;
mod grid;
mod knot;
pub mod knot_io;
mod node;
mod rectangle;
mod scramble;
mod wasm;

pub use direction::Axis;
pub use direction::Direction;
pub use edge::Color;
pub use edge::Edge;
pub use edge::EdgeId;
pub use error::FormatError;
pub use error::KnotError;
pub use grid::Grid;
pub use grid::GridConfig;
pub use grid::Junction;
pub use grid::JunctionKind;
pub use grid::Pipe;
pub use grid::PipeEnd;
pub use knot::Knot;
pub use knot::KnotEquality;
pub use knot::KnotEvent;
pub use knot::KnotListener;
pub use knot::KnotMetaData;
pub use knot::MAX_MOVE_DISTANCE;
pub use knot::MIN_EDGE_COUNT;
pub use knot::validate;
pub use node::Node;
pub use node::SCALE;
pub use rectangle::PossibleRectanglePosition;
pub use rectangle::RectangleMap;
pub use rectangle::SurfacePatches;
pub use rectangle::ValidRectanglePosition;
pub use rectangle::close_surface;
pub use scramble::get_seed;
pub use scramble::scramble;
pub use scramble::scramble_with;
pub use wasm::KnotScene;
