//! World geometry: topology decoding and projection.

mod projection;
mod topology;

pub use projection::{Fit, ProjectedShape, project_world};
#[cfg(test)]
pub use topology::CountryShape;
pub use topology::WorldMap;
