//! Fixed-length timeline split evenly across the generated images.

pub(crate) mod plan;

pub use plan::{Segment, TimelinePlan};
