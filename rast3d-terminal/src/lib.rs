/// Terminal viewer: flies a camera around one mesh and draws it with colour half blocks
use crossterm::{
    cursor, execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use rast3d_core::{Camera, Mesh, Quaternion, RenderStats, Renderable, Renderer, Transform};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod canvas;
pub mod config;
pub mod input;

pub use canvas::Canvas;
pub use config::AppConfig;
pub use input::FrameInput;

/// Main application struct for the terminal viewer
pub struct TerminalApp {
    mesh: Mesh,
    object: Transform,
    spin: Quaternion,
    camera: Camera,
    renderer: Renderer,
    canvas: Canvas,
    target_frame_time: Duration,
    frame_limit: Option<u64>,
    frames_rendered: u64,
    running: bool,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
    last_stats: RenderStats,
}

impl TerminalApp {
    /// Create an app sized to the current terminal
    pub fn new(mesh: Mesh, config: &AppConfig) -> anyhow::Result<Self> {
        let (columns, rows) = terminal::size()?;
        Self::with_size(mesh, config, columns, rows)
    }

    /// Create an app for a terminal of `columns` × `rows` cells
    pub fn with_size(
        mesh: Mesh,
        config: &AppConfig,
        columns: u16,
        rows: u16,
    ) -> anyhow::Result<Self> {
        let canvas = Canvas::new(columns, rows, config.background());
        let renderer = Renderer::new(canvas.viewport()?);

        Ok(Self {
            mesh,
            object: config.object_transform(),
            spin: config.spin(),
            camera: config.camera()?,
            renderer,
            canvas,
            target_frame_time: Duration::from_secs(1) / config.display.target_fps.max(1),
            frame_limit: None,
            frames_rendered: 0,
            running: true,
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            last_stats: RenderStats::default(),
        })
    }

    /// Stop after `frames` frames instead of waiting for a quit key
    pub fn with_frame_limit(mut self, frames: Option<u64>) -> Self {
        self.frame_limit = frames;
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn object(&self) -> &Transform {
        &self.object
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(stdout(), terminal::EnterAlternateScreen, cursor::Hide)?;
        info!(
            width = self.canvas.width(),
            height = self.canvas.height(),
            triangles = self.mesh.triangle_count(),
            "viewer started"
        );

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(stdout(), terminal::LeaveAlternateScreen, cursor::Show)?;
        info!(frames = self.frames_rendered, "viewer stopped");

        result
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let mut stdout = stdout();

        while self.running {
            let frame_start = Instant::now();

            self.render_frame();
            self.present(&mut stdout)?;

            self.frames_rendered += 1;
            self.frame_count += 1;
            if self.frame_limit.is_some_and(|limit| self.frames_rendered >= limit) {
                self.running = false;
                break;
            }

            // Input is gathered while waiting out the rest of this frame
            let budget = self.target_frame_time.saturating_sub(frame_start.elapsed());
            let input = FrameInput::poll(budget)?;
            self.handle_input(&input);

            // A keypress ends the poll early; sleep off what is left
            let elapsed = frame_start.elapsed();
            if elapsed < self.target_frame_time {
                std::thread::sleep(self.target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    /// Apply one frame of user input
    pub fn handle_input(&mut self, input: &FrameInput) {
        if input.quit {
            self.running = false;
            return;
        }
        if let Some((columns, rows)) = input.resized {
            self.resize(columns, rows);
        }
        if input.spin {
            self.object.rotate_local(self.spin);
        }
        if !input.movements.is_empty() {
            self.camera.apply(&input.movements);
        }
    }

    fn resize(&mut self, columns: u16, rows: u16) {
        self.canvas.resize(columns, rows);
        match self.canvas.viewport() {
            Ok(viewport) => {
                debug!(columns, rows, "terminal resized");
                self.renderer.set_viewport(viewport);
            }
            Err(e) => warn!("keeping previous viewport: {e}"),
        }
    }

    /// Rasterize the object into the canvas
    pub fn render_frame(&mut self) -> RenderStats {
        self.canvas.clear();
        let renderable = Renderable::new(&self.mesh, self.object);
        self.last_stats = self
            .renderer
            .render_object(&renderable, &self.camera, &mut self.canvas);
        self.last_stats
    }

    /// One-line summary drawn over the top row
    pub fn status_line(&self) -> String {
        let p = self.camera.position;
        let stats = &self.last_stats;
        format!(
            "rast3d | FPS: {:.1} | cam [{:.2} {:.2} {:.2}] | drawn {} culled {} | arrows/space/c move, ijkl look, b spin, q quit",
            self.fps,
            p.x,
            p.y,
            p.z,
            stats.emitted,
            stats.frustum_culled + stats.screen_culled,
        )
    }

    fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.canvas.draw(out)?;

        // Draw UI overlay
        let status: String = self.status_line().chars().take(self.canvas.width()).collect();
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetBackgroundColor(Color::Black),
            SetForegroundColor(Color::Yellow),
            Print(status),
            ResetColor
        )?;

        out.flush()
    }
}
