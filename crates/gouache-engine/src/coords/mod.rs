//! Coordinate conventions shared by the renderers.
//!
//! CPU space is logical pixels, origin top-left, +X right, +Y down.
//! Shaders convert to NDC with a viewport uniform.

mod viewport;

pub use viewport::Viewport;
