// Public library interface for tagcloud-rs.
// The binaries (CLI + layout diagnostics) are thin front ends over these modules.

pub mod cloud;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod visualizer;

pub use error::{CloudError, ErrorKind};
pub use visualizer::Visualizer;
