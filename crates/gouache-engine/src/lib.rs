//! Platform and GPU runtime for **gouache**.
//!
//! This crate owns the window, the wgpu device, input translation and the two
//! renderers (persistent canvas and instanced stamps). Stroke logic and
//! history live in `gouache-brush`; [`render::StampRenderer`] is the
//! [`StampSink`](gouache_brush::StampSink) that connects them.

pub mod core;
pub mod device;
pub mod input;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod render;
