//! Contract between the runtime loop and the application.
//!
//! The runtime owns the platform and GPU state; the application sees a
//! per-frame [`FrameCtx`] and answers with an [`AppControl`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
