//! photom-export: Pure preview serializers (sans-IO)
//!
//! Converts shape traces into viewable formats. Currently supports SVG.

pub mod svg;

pub use svg::{Dimensions, SvgMetadata, build_path_data, to_svg};
