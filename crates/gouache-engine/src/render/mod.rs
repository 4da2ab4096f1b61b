//! GPU rendering.
//!
//! Stamps are drawn into a persistent float [`Canvas`] by the instanced
//! [`StampRenderer`]; the canvas is composited onto the swapchain each frame.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod canvas;
mod common;
mod ctx;
mod stamp;

pub use canvas::{Canvas, CanvasConfig, CANVAS_FORMAT};
pub use ctx::{RenderCtx, RenderTarget};
pub use stamp::StampRenderer;
