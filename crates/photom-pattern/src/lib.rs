//! photom-pattern: scan-pattern geometry for laser photomanipulation
//! (sans-IO).
//!
//! Turns a hand-drawn region of interest into the ordered list of points
//! a steering mirror visits:
//!
//! - **bidirectional**: a rectangular lattice clipped to the shape,
//!   visited as a snake-ordered raster or breadth-first from the centre;
//! - **spiral**: an Archimedean spiral stretched over the shape's
//!   bounding box and resampled at equal arc-length intervals.
//!
//! Every returned point lies inside the polygon, except when nothing
//! fits: then the bounding-box centre is returned alone, with a
//! [`PatternWarning::CentroidFallback`].
//!
//! This crate has **no I/O dependencies**. Hardware sits behind the
//! traits in [`actuation`]; serialization to files lives in
//! `photom-export`.

pub mod actuation;
pub mod bidirectional;
pub mod collection;
pub mod diagnostics;
pub mod input;
pub mod pattern;
pub mod polygon;
pub mod spiral;
pub mod trace;
pub mod types;

pub use actuation::{
    AffineTransform, CoordinateTransform, InvalidDelay, MirrorActuator, Pacer, RunError,
    RunOptions, ThreadPacer, run_trace,
};
pub use bidirectional::{BidirectionalStrategy, LatticeFill, Spacing};
pub use collection::ShapeCollection;
pub use diagnostics::{Axis, PatternMetrics, PatternWarning, Warnings};
pub use input::{parse_point_count, parse_spacing};
pub use pattern::{
    BidirectionalParams, PatternKind, PatternOutput, PatternSpec, SpiralParams, generate,
};
pub use polygon::Polygon;
pub use spiral::{SpiralSampling, spiral_turns};
pub use trace::{ShapeId, ShapeTrace, TraceState};
pub use types::{BoundingBox, EngineConfig, PatternError, Point};
