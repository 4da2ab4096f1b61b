//! Stroke dynamics, stamp batching and event-sourced history for **gouache**.
//!
//! This crate is platform-free: it never touches wgpu or winit, so everything
//! here can be exercised from plain unit tests. The engine crate owns the GPU
//! side and plugs in through [`StampSink`].
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`sample`] | `PointerSample`, `DynamicsState` |
//! | [`config`] | `BrushConfig` (live brush settings) |
//! | [`sampler`] | `StrokeSampler`, `StampRequest` |
//! | [`batch`] | `StampBatch`, `StampSink` |
//! | [`shape`] | radial falloff model, `CubicBezier`, noise hash |
//! | [`history`] | `Event`, `Mode`, `EventLog`, `History`, `Dispatcher` |
//! | [`painter`] | `Painter`, the document facade tying it together |
//!
//! # Quick start
//!
//! ```rust
//! use gouache_brush::{BrushConfig, Painter, PointerSample, StampBatch};
//!
//! let mut config = BrushConfig::default();
//! config.set_size(32.0);
//! config.set_density(4.0);
//! config.set_smoothing(0.0);
//!
//! let mut painter = Painter::new(config);
//! let mut batch = StampBatch::new();
//!
//! painter.checkpoint(&mut batch);
//! painter.move_to(PointerSample::new(0.0, 0.0), &mut batch);
//! painter.stroke_to(PointerSample::new(100.0, 0.0), &mut batch);
//! assert_eq!(batch.len(), 12);
//! ```

pub mod batch;
pub mod color;
pub mod config;
pub mod error;
pub mod history;
pub mod math;
pub mod painter;
pub mod sample;
pub mod sampler;
pub mod shape;

pub use batch::{StampBatch, StampSink};
pub use color::Rgba;
pub use config::BrushConfig;
pub use error::ColorParseError;
pub use history::{Dispatcher, Event, EventKind, EventLog, EventStats, History, Mode, Subscriber};
pub use painter::Painter;
pub use sample::{DynamicsState, PointerSample};
pub use sampler::{StampRequest, StrokeSampler};
pub use shape::{CubicBezier, Falloff};
