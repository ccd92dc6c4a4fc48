//! Terminal-based mesh viewer with mouse picking
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tinymesh_core::{Camera, Mesh, MeshHit, RenderBuffers};
use tracing::{debug, info};

pub mod renderer;

pub use renderer::AsciiRenderer;

/// Terminal cells are about twice as tall as they are wide.
const CELL_ASPECT: f64 = 0.5;

/// Orbit step per key press, in radians.
const ORBIT_STEP: f64 = 0.1;

/// Zoom factor per key press.
const ZOOM_STEP: f64 = 0.9;

/// Main application struct for terminal mesh viewing
pub struct TerminalApp {
    mesh: Mesh,
    buffers: RenderBuffers,
    camera: Camera,
    renderer: AsciiRenderer,
    picked: Option<MeshHit>,
    auto_rotate: bool,
    running: bool,
    frame_time: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    /// Viewer sized to the current terminal, capped at `max_fps`.
    pub fn new(mesh: Mesh, max_fps: u32) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(mesh, width as usize, height as usize, max_fps))
    }

    /// Viewer for a `width` by `height` cell viewport.
    pub fn with_size(mesh: Mesh, width: usize, height: usize, max_fps: u32) -> Self {
        let buffers = mesh.render_buffers();
        let mut camera = Camera::new(width as u32, height as u32);
        camera.aspect *= CELL_ASPECT;
        camera.frame(&mesh.bounding_box());

        Self {
            mesh,
            buffers,
            camera,
            renderer: AsciiRenderer::new(width, height),
            picked: None,
            auto_rotate: true,
            running: true,
            frame_time: Duration::from_millis(1000 / u64::from(max_fps.max(1))),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn picked(&self) -> Option<MeshHit> {
        self.picked
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        // Cleanup
        terminal::disable_raw_mode()?;
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }

            // Update
            self.update();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
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

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => self.pick(column as usize, row as usize),
            Event::Resize(width, height) => self.resize(width as usize, height as usize),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => {
                self.camera.orbit(0.0, ORBIT_STEP);
            }
            KeyCode::Char('s') | KeyCode::Down => {
                self.camera.orbit(0.0, -ORBIT_STEP);
            }
            KeyCode::Char('a') | KeyCode::Left => {
                self.camera.orbit(-ORBIT_STEP, 0.0);
            }
            KeyCode::Char('d') | KeyCode::Right => {
                self.camera.orbit(ORBIT_STEP, 0.0);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.camera.zoom(ZOOM_STEP);
            }
            KeyCode::Char('-') => {
                self.camera.zoom(1.0 / ZOOM_STEP);
            }
            KeyCode::Char('f') => {
                self.camera.frame(&self.mesh.bounding_box());
            }
            KeyCode::Char(' ') => {
                self.auto_rotate = !self.auto_rotate;
            }
            _ => {}
        }
    }

    /// Pick the triangle under cell `(column, row)`.
    pub fn pick(&mut self, column: usize, row: usize) {
        let ray = self.camera.pixel_to_ray(
            column as f64 + 0.5,
            row as f64 + 0.5,
            self.renderer.width() as u32,
            self.renderer.height() as u32,
        );
        self.picked = self.mesh.intersect(&ray);

        match self.picked {
            Some(hit) => info!(column, row, triangle = hit.triangle, t = hit.t, "picked triangle"),
            None => debug!(column, row, "pick missed"),
        }
    }

    fn resize(&mut self, width: usize, height: usize) {
        self.renderer.resize(width, height);
        self.camera.aspect = width as f64 / height.max(1) as f64 * CELL_ASPECT;
    }

    fn update(&mut self) {
        // Continuous slow orbit for demo effect
        if self.auto_rotate {
            self.camera.orbit(0.015, 0.0);
        }
    }

    /// Status line: triangle count, bounding box and the picked triangle.
    pub fn status(&self) -> String {
        let picked = match self.picked {
            Some(hit) => format!("#{} at t={:.3}", hit.triangle, hit.t),
            None => "none".to_string(),
        };
        format!(
            "TinyMesh | {} triangles | {} | picked: {} | FPS: {:.1}",
            self.mesh.triangle_count(),
            self.mesh.bounding_box(),
            picked,
            self.fps
        )
    }

    fn render(&mut self) -> io::Result<()> {
        // Clear renderer
        self.renderer.clear();

        // Render mesh
        let highlight = self.picked.map(|hit| hit.triangle);
        self.renderer.render_mesh(&self.buffers, &self.camera, highlight);

        // Output to terminal
        let mut stdout = stdout();
        queue!(stdout, cursor::MoveTo(0, 0))?;

        self.renderer.draw(&mut stdout)?;

        // Draw UI overlay
        let bottom = self.renderer.height().saturating_sub(1) as u16;
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status()),
            cursor::MoveTo(0, bottom),
            terminal::Clear(ClearType::CurrentLine),
            Print("WASD/Arrows=Orbit +/-=Zoom F=Frame Space=Spin Click=Pick Q=Quit"),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinymesh_core::BoundingBox;

    fn app() -> TerminalApp {
        let mut app = TerminalApp::with_size(Mesh::from_box(&BoundingBox::cube(1.0)), 80, 40, 30);
        app.auto_rotate = false;
        app
    }

    #[test]
    fn test_frames_mesh_on_start() {
        let app = app();
        assert_eq!(app.camera().at, BoundingBox::cube(1.0).center());
        assert!(app.camera().aspect < 80.0 / 40.0);
    }

    #[test]
    fn test_pick_center_and_miss() {
        let mut app = app();
        app.pick(37, 18);
        let hit = app.picked().expect("center cell should hit the cube");
        assert_eq!(app.mesh.normal(app.mesh.normal_index(hit.triangle, 0)).z, 1.0);

        app.pick(0, 0);
        assert!(app.picked().is_none());
    }

    #[test]
    fn test_mouse_click_picks() {
        let mut app = app();
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 37,
            row: 18,
            modifiers: event::KeyModifiers::NONE,
        }));
        assert!(app.picked().is_some());
        assert!(app.status().contains("picked: #"));
    }

    #[test]
    fn test_keys() {
        let mut app = app();
        let eye = app.camera().eye;

        app.handle_key(KeyCode::Left);
        assert_ne!(app.camera().eye, eye);

        let distance = (app.camera().eye - app.camera().at).norm();
        app.handle_key(KeyCode::Char('+'));
        let closer = (app.camera().eye - app.camera().at).norm();
        assert!(closer < distance);

        app.handle_key(KeyCode::Char('q'));
        assert!(!app.is_running());
    }

    #[test]
    fn test_status_line() {
        let app = app();
        let status = app.status();
        assert!(status.contains("12 triangles"));
        assert!(status.contains("Box((-1, -1, -1), (1, 1, 1))"));
        assert!(status.contains("picked: none"));
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut app = app();
        app.handle_event(Event::Resize(100, 25));
        assert_eq!(app.renderer.width(), 100);
        assert!((app.camera().aspect - 2.0).abs() < 1e-12);
    }
}
