//! Elastic Arena entry point
//!
//! Native: headless demo run that scatters bodies and reports conservation
//! figures. Web: Canvas 2D sandbox driven by mouse gestures.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_sandbox {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use elastic_arena::SimConfig;
    use elastic_arena::input::{GestureController, Preview};
    use elastic_arena::scheduler::Scheduler;
    use elastic_arena::sim::Arena;

    /// Arrow head length in arena units
    const ARROW_HEAD: f64 = 20.0;

    /// Sandbox instance holding all state
    struct Sandbox {
        arena: Arena,
        input: GestureController,
        scheduler: Scheduler,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        /// Arena units per CSS pixel
        resize_ratio: f32,
        last_time: f64,
    }

    impl Sandbox {
        fn new(
            config: &SimConfig,
            canvas: HtmlCanvasElement,
            ctx: CanvasRenderingContext2d,
        ) -> Result<Self, JsValue> {
            let arena =
                Arena::from_config(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
            let size = config.arena_size as u32;
            canvas.set_width(size);
            canvas.set_height(size);
            let mut sandbox = Self {
                arena,
                input: GestureController::new(config),
                scheduler: Scheduler::new(config),
                canvas,
                ctx,
                resize_ratio: 1.0,
                last_time: 0.0,
            };
            sandbox.resize();
            Ok(sandbox)
        }

        /// Fit the canvas to the viewport and recompute the pointer scale
        fn resize(&mut self) {
            let Some(root) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element())
            else {
                return;
            };
            let css_size = 0.98 * root.client_width().min(root.client_height()) as f32;
            if css_size <= 0.0 {
                return;
            }
            let style = format!("width: {css_size}px; height: {css_size}px;");
            let _ = self.canvas.set_attribute("style", &style);
            self.resize_ratio = self.arena.size() / css_size;
        }

        /// Convert a mouse event to arena coordinates
        fn arena_pos(&self, event: &MouseEvent) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(
                self.resize_ratio * (event.client_x() as f32 - rect.left() as f32),
                self.resize_ratio * (event.client_y() as f32 - rect.top() as f32),
            )
        }

        fn release(&mut self) {
            if let Err(e) = self.input.pointer_up(&mut self.arena) {
                log::warn!("Gesture ignored: {}", e);
            }
        }

        /// Run simulation ticks for the time since the last frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            self.last_time = time;
            self.scheduler.update(dt, &mut self.arena);
        }

        fn render(&self) {
            let ctx = &self.ctx;
            let size = self.arena.size() as f64;
            ctx.clear_rect(0.0, 0.0, size, size);

            let hovered = self.input.hovered();
            let focused = self.input.focused();
            self.arena.for_each_body(|body| {
                ctx.begin_path();
                let _ = ctx.arc(
                    body.pos.x as f64,
                    body.pos.y as f64,
                    body.radius() as f64,
                    0.0,
                    std::f64::consts::TAU,
                );
                let highlight = hovered == Some(body.id()) || focused == Some(body.id());
                ctx.set_fill_style_str(if highlight { "yellow" } else { "black" });
                ctx.fill();
                ctx.stroke();
            });

            match self.input.preview(&self.arena) {
                Some(Preview::SpawnCircle { center, radius }) => {
                    let (cx, cy) = (center.x as f64, center.y as f64);
                    ctx.begin_path();
                    let _ = ctx.arc(cx, cy, 2.0, 0.0, std::f64::consts::TAU);
                    ctx.fill();
                    ctx.begin_path();
                    ctx.move_to(cx, cy);
                    let pointer = self.input.pointer();
                    ctx.line_to(pointer.x as f64, pointer.y as f64);
                    ctx.stroke();
                    ctx.begin_path();
                    let _ = ctx.arc(cx, cy, radius as f64, 0.0, std::f64::consts::TAU);
                    ctx.stroke();
                }
                Some(Preview::LaunchArrow { from, to }) => {
                    draw_arrow(ctx, from, to);
                }
                None => {}
            }
        }
    }

    fn draw_arrow(ctx: &CanvasRenderingContext2d, from: Vec2, to: Vec2) {
        let (fx, fy, tx, ty) = (from.x as f64, from.y as f64, to.x as f64, to.y as f64);
        let angle = (ty - fy).atan2(tx - fx);
        let wing = std::f64::consts::PI / 6.0;
        ctx.begin_path();
        ctx.move_to(fx, fy);
        ctx.line_to(tx, ty);
        ctx.line_to(
            tx - ARROW_HEAD * (angle - wing).cos(),
            ty - ARROW_HEAD * (angle - wing).sin(),
        );
        ctx.move_to(tx, ty);
        ctx.line_to(
            tx - ARROW_HEAD * (angle + wing).cos(),
            ty - ARROW_HEAD * (angle + wing).sin(),
        );
        ctx.stroke();
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();

        log::info!("Elastic Arena starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("play-area")
            .ok_or("no #play-area canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("2d context unavailable")?
            .dyn_into()?;

        let config = SimConfig::load();
        let sandbox = Rc::new(RefCell::new(Sandbox::new(&config, canvas.clone(), ctx)?));

        setup_input_handlers(&canvas, sandbox.clone());
        setup_window_handlers(sandbox.clone());
        request_animation_frame(sandbox);

        log::info!("Elastic Arena running!");
        Ok(())
    }

    fn on_canvas<F>(canvas: &HtmlCanvasElement, event: &str, handler: F)
    where
        F: FnMut(MouseEvent) + 'static,
    {
        let closure = Closure::<dyn FnMut(_)>::new(handler);
        let _ = canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, sandbox: Rc<RefCell<Sandbox>>) {
        {
            let sandbox = sandbox.clone();
            on_canvas(canvas, "mousemove", move |event| {
                let mut s = sandbox.borrow_mut();
                let pos = s.arena_pos(&event);
                let Sandbox { arena, input, .. } = &mut *s;
                input.pointer_move(arena, pos);
            });
        }
        {
            let sandbox = sandbox.clone();
            on_canvas(canvas, "mousedown", move |event| {
                let mut s = sandbox.borrow_mut();
                let pos = s.arena_pos(&event);
                let Sandbox { arena, input, .. } = &mut *s;
                input.pointer_move(arena, pos);
                input.pointer_down(arena, pos);
            });
        }
        {
            let sandbox = sandbox.clone();
            on_canvas(canvas, "mouseup", move |_event| {
                sandbox.borrow_mut().release();
            });
        }
        on_canvas(canvas, "mouseout", move |_event| {
            let mut s = sandbox.borrow_mut();
            let Sandbox { arena, input, .. } = &mut *s;
            if let Err(e) = input.pointer_leave(arena) {
                log::warn!("Gesture ignored: {}", e);
            }
        });
    }

    fn setup_window_handlers(sandbox: Rc<RefCell<Sandbox>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize changes only the pointer scale, never arena coordinates
        {
            let sandbox = sandbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                sandbox.borrow_mut().resize();
            });
            let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Space toggles pause
        {
            let sandbox = sandbox.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == " " {
                    sandbox.borrow_mut().scheduler.toggle();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Auto-pause when the tab is hidden
        if let Some(document) = window.document() {
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut s = sandbox.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    s.scheduler.pause();
                    log::info!("Auto-paused (tab hidden)");
                } else {
                    s.last_time = 0.0;
                }
            });
            let _ = document
                .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(sandbox: Rc<RefCell<Sandbox>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            frame(sandbox, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame(sandbox: Rc<RefCell<Sandbox>>, time: f64) {
        {
            let mut s = sandbox.borrow_mut();
            s.update(time);
            s.render();
        }
        request_animation_frame(sandbox);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_sandbox::run()
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use clap::Parser;

    use elastic_arena::SimConfig;
    use elastic_arena::scheduler::Scheduler;
    use elastic_arena::sim::{Arena, ScatterParams, scatter};

    #[derive(Parser, Debug)]
    #[command(about = "Headless elastic disk collision run")]
    pub struct Args {
        /// JSON config file (defaults are used when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Arena snapshot to resume instead of scattering new bodies
        #[arg(long)]
        snapshot: Option<PathBuf>,
        /// Scatter seed
        #[arg(short, long, default_value_t = 1)]
        seed: u64,
        /// Number of bodies to scatter
        #[arg(short, long, default_value_t = 12)]
        bodies: usize,
        /// Number of ticks to simulate
        #[arg(short, long, default_value_t = 900)]
        ticks: u64,
        /// Print the final arena snapshot as JSON
        #[arg(long)]
        json: bool,
    }

    pub fn run(args: Args) -> Result<()> {
        let config = match &args.config {
            Some(path) => SimConfig::load_from_path(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => SimConfig::load(),
        };

        let mut arena = match &args.snapshot {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading snapshot {}", path.display()))?;
                Arena::from_snapshot(&json, &config)
                    .with_context(|| format!("loading snapshot {}", path.display()))?
            }
            None => {
                let mut arena = Arena::from_config(&config)?;
                let params = ScatterParams {
                    count: args.bodies,
                    ..Default::default()
                };
                scatter(&mut arena, &params, args.seed)?;
                arena
            }
        };

        let momentum = arena.total_momentum();
        let energy = arena.total_energy();

        // Feed exact tick intervals so the run length is deterministic
        let mut scheduler = Scheduler::new(&config);
        let mut resolved = 0;
        let mut settled = 0;
        while scheduler.ticks_run() < args.ticks {
            for report in scheduler.update(scheduler.interval(), &mut arena) {
                resolved += report.resolved_pairs;
                settled += report.settled_pairs();
            }
        }

        log::info!(
            "{} bodies, {} ticks: {} impulses, {} suppressed by cooldown",
            arena.len(),
            arena.time_ticks,
            resolved,
            settled
        );
        log::info!(
            "momentum ({:.2}, {:.2}) -> ({:.2}, {:.2})",
            momentum.x,
            momentum.y,
            arena.total_momentum().x,
            arena.total_momentum().y
        );
        log::info!("energy {:.2} -> {:.2}", energy, arena.total_energy());

        if args.json {
            println!("{}", serde_json::to_string_pretty(&arena)?);
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use clap::Parser;

    env_logger::init();
    log::info!("Elastic Arena (native) starting...");
    headless::run(headless::Args::parse())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
