//! Terminal front end for the MyGL matrix pipeline
//!
//! Drives a `GlContext` from mouse and keyboard input and rasterizes a cube
//! with the matrices it reads back.

use crossterm::{
    cursor,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal,
};
use mygl_core::{GlContext, GlResult, Matrix, MatrixMode};
use std::fmt::Write as _;
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};

pub mod config;
pub mod input;
pub mod renderer;
pub mod scene;

pub use config::{Args, ViewerConfig};
pub use input::{InputState, KeyAction};
pub use renderer::AsciiRenderer;
pub use scene::{Mesh, ViewState};

/// Projection and model-view matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameMatrices {
    pub projection: Matrix,
    pub model_view: Matrix,
}

/// Issues one frame's call sequence against `ctx` and reads back both tops.
///
/// The mesh scale is pushed and popped, so afterwards the model-view top is
/// the bare view transform.
pub fn frame_matrices(
    ctx: &mut GlContext,
    view: &ViewState,
    config: &ViewerConfig,
    aspect: f64,
) -> GlResult<FrameMatrices> {
    ctx.set_mode(MatrixMode::Projection);
    ctx.load_identity();
    ctx.perspective(config.fovy, aspect, config.near, config.far)?;
    let projection = ctx.top();

    view.apply_model_view(ctx)?;
    ctx.push()?;
    ctx.scale(config.size, config.size, config.size);
    let model_view = ctx.top();
    ctx.pop()?;

    Ok(FrameMatrices {
        projection,
        model_view,
    })
}

/// One column per line, matching the in-memory order.
pub fn format_matrix(m: &Matrix) -> String {
    let mut out = String::new();
    for col in 0..4 {
        let [a, b, c, d] = m.column(col);
        let _ = writeln!(out, "{a:>12.6} {b:>12.6} {c:>12.6} {d:>12.6}");
    }
    out
}

/// Interactive viewer state
pub struct TerminalApp {
    ctx: GlContext,
    mesh: Mesh,
    view: ViewState,
    input: InputState,
    config: ViewerConfig,
    renderer: AsciiRenderer,
    status: Option<String>,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: ViewerConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;

        Ok(Self {
            ctx: GlContext::new(),
            // unit cube, sized by the model-view scale each frame
            mesh: Mesh::cube(1.0),
            view: ViewState::default(),
            input: InputState::new(),
            config,
            renderer: AsciiRenderer::new(width as usize, height.saturating_sub(1) as usize),
            status: None,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();

        // Cleanup
        execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / 30); // 30 FPS target

        while self.running {
            let frame_start = Instant::now();

            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            self.render()?;

            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, kind, .. }) if kind == KeyEventKind::Press => {
                if input::handle_key(code, &mut self.view, &self.config) == KeyAction::Quit {
                    self.running = false;
                }
            }
            Event::Mouse(mouse) => self.input.handle_mouse(mouse, &mut self.view, &self.config),
            Event::Resize(width, height) => {
                tracing::debug!(width, height, "terminal resized");
                self.renderer.resize(width as usize, height.saturating_sub(1) as usize);
            }
            _ => {}
        }
    }

    fn aspect(&self) -> f64 {
        // cells are roughly twice as tall as they are wide
        self.renderer.width().max(1) as f64 / (2.0 * self.renderer.height().max(1) as f64)
    }

    fn render(&mut self) -> io::Result<()> {
        let aspect = self.aspect();
        self.renderer.clear();
        match frame_matrices(&mut self.ctx, &self.view, &self.config, aspect) {
            Ok(frame) => {
                self.status = None;
                self.renderer
                    .render_mesh(&self.mesh, &frame.projection, &frame.model_view);
            }
            Err(err) => {
                // keep the depth consistent for the next frame
                self.ctx.set_mode(MatrixMode::ModelView);
                while self.ctx.depth() > 1 {
                    let _ = self.ctx.pop();
                }
                self.status = Some(err.to_string());
            }
        }
        if let Some(err) = self.ctx.take_error() {
            self.status = Some(err.to_string());
        }

        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.renderer.draw(&mut stdout)?;

        let status = self.status.as_deref().unwrap_or("ok");
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "MyGL | FPS: {:.1} | rot ({:.0}, {:.0}) dist ({:.2}, {:.2}, {:.2}) | {} | \
                 L-drag rotate, M-drag pan, R-drag/wheel zoom, r reset, q quit",
                self.fps,
                self.view.angle_x,
                self.view.angle_y,
                self.view.distance_x,
                self.view.distance_y,
                self.view.distance_z,
                status,
            )),
            ResetColor
        )?;

        stdout.flush()
    }
}
