use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{Context, Result};
use gouache_brush::{BrushConfig, EventStats, Painter, PointerSample, Rgba};
use gouache_engine::core::{App, AppControl, FrameCtx};
use gouache_engine::device::GpuInit;
use gouache_engine::input::{
    InputEvent, InputFrame, KeyState, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent, Tilt,
};
use gouache_engine::logging::{init_logging, LoggingConfig};
use gouache_engine::render::{Canvas, CanvasConfig, StampRenderer};
use gouache_engine::window::{Runtime, RuntimeConfig};

mod bindings;

use bindings::Action;

/// Frames between telemetry lines.
const STATS_INTERVAL: u64 = 600;

/// Initial brush color, e.g. `#1e90ff` or `rgb(30, 144, 255)`.
const BRUSH_COLOR_VAR: &str = "GOUACHE_BRUSH_COLOR";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let brush = brush_config(std::env::var(BRUSH_COLOR_VAR).ok().as_deref())?;
    let studio = Studio::new(brush, CanvasConfig::default());
    Runtime::run(RuntimeConfig::default(), GpuInit::low_latency(), studio)
}

fn brush_config(color: Option<&str>) -> Result<BrushConfig> {
    let mut brush = BrushConfig::default();
    if let Some(color) = color.map(str::trim).filter(|c| !c.is_empty()) {
        let rgba = Rgba::parse(color).with_context(|| format!("{BRUSH_COLOR_VAR}={color:?}"))?;
        log::info!("brush color {rgba:?}");
        brush.set_color(rgba);
    }
    Ok(brush)
}

struct Studio {
    painter: Painter,
    stamps: StampRenderer,
    canvas: Option<Canvas>,
    canvas_config: CanvasConfig,
    stats: Rc<RefCell<EventStats>>,
    drawing: bool,
}

impl Studio {
    fn new(brush: BrushConfig, canvas_config: CanvasConfig) -> Self {
        let stats = Rc::new(RefCell::new(EventStats::new()));
        let mut painter = Painter::new(brush);
        painter.subscribe(Rc::clone(&stats));

        Self {
            painter,
            stamps: StampRenderer::new(),
            canvas: None,
            canvas_config,
            stats,
            drawing: false,
        }
    }

    /// Feeds this frame's input to the painter in arrival order.
    fn handle_input(&mut self, frame: &InputFrame) -> AppControl {
        for ev in &frame.events {
            match ev {
                InputEvent::PointerButton(PointerButtonEvent {
                    button: MouseButton::Left,
                    state,
                    x,
                    y,
                    pressure,
                    tilt,
                    ..
                }) => match state {
                    MouseButtonState::Pressed => {
                        self.painter.checkpoint(&mut self.stamps);
                        self.painter.move_to(sample(*x, *y, *pressure, *tilt), &mut self.stamps);
                        self.drawing = true;
                    }
                    MouseButtonState::Released => self.drawing = false,
                },

                InputEvent::PointerMoved(PointerMoveEvent { x, y, pressure, tilt }) if self.drawing => {
                    self.painter.stroke_to(sample(*x, *y, *pressure, *tilt), &mut self.stamps);
                }

                InputEvent::Focused(false) => self.drawing = false,

                InputEvent::Key { key, state: KeyState::Pressed, modifiers, .. } => {
                    if let Some(action) = Action::for_key(*key, *modifiers) {
                        if self.perform(action) == AppControl::Exit {
                            return AppControl::Exit;
                        }
                    }
                }

                InputEvent::MouseWheel { delta, .. } => {
                    if let Some(action) = Action::for_wheel(delta.lines_y()) {
                        self.perform(action);
                    }
                }

                _ => {}
            }
        }
        AppControl::Continue
    }

    /// History actions end any drag in progress; the next stroke needs a fresh press.
    fn perform(&mut self, action: Action) -> AppControl {
        if matches!(action, Action::Undo | Action::Redo | Action::Clear) {
            self.drawing = false;
        }
        match action {
            Action::Undo => {
                let n = self.painter.undo(&mut self.stamps);
                log::debug!("undo replayed {n} events");
            }
            Action::Redo => {
                let n = self.painter.redo(&mut self.stamps);
                log::debug!("redo replayed {n} events");
            }
            Action::Clear => {
                self.painter.checkpoint(&mut self.stamps);
                self.painter.clear(&mut self.stamps);
            }
            Action::Exit => return AppControl::Exit,
            other => {
                if other.apply(self.painter.config_mut()) {
                    let c = self.painter.config();
                    log::debug!(
                        "brush size={:.1} hardness={:.2} opacity={:.2} smoothing={:.2}",
                        c.size(),
                        c.hardness(),
                        c.opacity(),
                        c.smoothing()
                    );
                }
            }
        }
        AppControl::Continue
    }
}

fn sample(x: f32, y: f32, pressure: f32, tilt: Tilt) -> PointerSample {
    PointerSample::new(x, y)
        .with_pressure(pressure)
        .with_tilt(tilt.angle, tilt.magnitude)
}

impl App for Studio {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.handle_input(ctx.input_frame) == AppControl::Exit {
            return AppControl::Exit;
        }

        if self.canvas.is_none() {
            let viewport = ctx.window.viewport();
            if !viewport.is_valid() {
                return AppControl::Continue;
            }
            match Canvas::new(ctx.gpu, self.canvas_config, viewport, ctx.window.scale_factor()) {
                Ok(canvas) => self.canvas = Some(canvas),
                Err(err) => {
                    ctx.runtime.fail(err);
                    return AppControl::Continue;
                }
            }
        }

        if ctx.time.frame_index % STATS_INTERVAL == 0 {
            log::debug!("{:.1} fps, {}", ctx.time.fps(), self.stats.borrow());
        }

        let Self { painter, stamps, canvas, canvas_config, .. } = self;
        let Some(canvas) = canvas.as_mut() else {
            return AppControl::Continue;
        };
        let brush = painter.config();

        ctx.render(canvas_config.background, |rctx, target| {
            canvas.resize(rctx, target.encoder);
            stamps.draw(rctx, target.encoder, canvas, brush);
            canvas.composite(rctx, target);
        })
    }
}
