//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;
use std::time::Duration;

use ratatui::layout::Rect;

use crate::config::{AppConfig, TICK_INTERVAL_MAX, TICK_INTERVAL_MIN};
use crate::core::material::Material;
use crate::core::renderer::Renderer;
use crate::ui::canvas::CanvasGeometry;
use crate::ui::controls::PanelStats;
use crate::ui::layout::AppLayout;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Canvas,
    SettingsMenu,
    KeyBindingsSubmenu,
}

/// Top-level application state.
pub struct AppState {
    /// The simulation behind the canvas.
    pub renderer: Renderer,
    /// While set, frames are painted but no simulation step is requested.
    pub paused: bool,
    /// Frames per simulation step.
    pub tick_interval: u32,
    /// Frame counter modulo `tick_interval`; a tick runs when it wraps to 0.
    pub current_tick: u32,
    /// Frames painted since startup.
    pub frames: u64,
    /// Work time of the last frame.
    pub frame_time: Duration,
    /// Frame rate measured from the last frame period.
    pub fps: f64,
    /// Material painted by the pointer.
    pub material: Material,
    /// Left button held down over the canvas.
    pub mouse_down: bool,
    /// Last pointer position over the canvas, in terminal cells.
    pub pointer: Option<(u16, u16)>,
    /// Left button held down on the tick-interval slider.
    pub dragging_slider: bool,
    /// Full terminal area, used for mouse hit-testing.
    pub terminal_area: Rect,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// User-configurable keybindings and preferences.
    pub config: AppConfig,
    /// Currently highlighted item in the settings menu.
    pub settings_selected: usize,
    /// Currently highlighted item in the key-binding submenu.
    pub controls_selected: usize,
    /// When `true`, the key-binding submenu is waiting for the user to press
    /// a key to rebind the action at `controls_selected`.
    pub awaiting_rebind: bool,
}

impl AppState {
    pub fn new(renderer: Renderer, config: AppConfig) -> Self {
        Self {
            renderer,
            paused: false,
            tick_interval: config.tick_interval.clamp(TICK_INTERVAL_MIN, TICK_INTERVAL_MAX),
            current_tick: 0,
            frames: 0,
            frame_time: Duration::ZERO,
            fps: 0.0,
            material: config.material,
            mouse_down: false,
            pointer: None,
            dragging_slider: false,
            terminal_area: Rect::default(),
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            config,
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
        }
    }

    pub fn layout(&self) -> AppLayout {
        AppLayout::from_area(self.terminal_area)
    }

    /// How the grid is laid onto the canvas pane right now.
    pub fn canvas_geometry(&self) -> Option<CanvasGeometry> {
        CanvasGeometry::fit(
            self.layout().canvas_inner,
            self.renderer.width(),
            self.renderer.height(),
        )
    }

    // ── frame loop ──────────────────────────────────────────────

    /// Work done before a frame is painted: keep pouring material while the
    /// pointer is held over the canvas.
    pub fn begin_frame(&mut self) {
        if self.mouse_down {
            self.paint_at_pointer();
        }
    }

    /// Work done after a frame is painted: request at most one simulation
    /// step, honouring pause and the tick interval.
    pub fn end_frame(&mut self) {
        self.frames += 1;
        if self.paused {
            return;
        }
        self.current_tick = (self.current_tick + 1) % self.tick_interval.max(1);
        if self.current_tick == 0 {
            self.renderer.tick();
        }
    }

    /// Record how long the last frame took (`work`) and how far apart the
    /// last two frames started (`period`).
    pub fn record_frame_timing(&mut self, work: Duration, period: Duration) {
        self.frame_time = work;
        if !period.is_zero() {
            self.fps = 1.0 / period.as_secs_f64();
        }
    }

    /// Counters for the controls panel, when enabled.
    pub fn panel_stats(&self) -> Option<PanelStats> {
        self.config.show_stats.then(|| PanelStats {
            ticks: self.renderer.ticks(),
            frames: self.frames,
            frame_time: self.frame_time,
            fps: self.fps,
        })
    }

    // ── controls ────────────────────────────────────────────────

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        self.status_message = Some(if self.paused { "Paused" } else { "Running" }.into());
    }

    /// Runs one tick regardless of pause and interval.
    pub fn step_once(&mut self) {
        self.renderer.tick();
        self.current_tick = 0;
    }

    pub fn set_tick_interval(&mut self, interval: u32) {
        self.tick_interval = interval.clamp(TICK_INTERVAL_MIN, TICK_INTERVAL_MAX);
        // Restart the count so a shorter interval takes effect immediately.
        self.current_tick %= self.tick_interval;
    }

    /// Select the material `delta` places away in the selector, wrapping.
    pub fn cycle_material(&mut self, delta: isize) {
        let all = Material::ALL;
        let idx = all.iter().position(|&m| m == self.material).unwrap_or(0);
        let next = (idx as isize + delta).rem_euclid(all.len() as isize) as usize;
        self.select_material(all[next]);
    }

    pub fn select_material(&mut self, material: Material) {
        self.material = material;
        self.status_message = Some(format!("Material: {}", material.label()));
    }

    pub fn clear_canvas(&mut self) {
        self.renderer.clear();
        self.status_message = Some("Canvas cleared".into());
    }

    /// Writes the current frame to a timestamped PNG in the working directory.
    pub fn save_snapshot(&mut self) {
        let name = format!("sandspiel-{}.png", chrono::Local::now().format("%Y%m%d-%H%M%S"));
        let path = PathBuf::from(name);
        self.status_message = Some(match self.renderer.save_snapshot(&path) {
            Ok(()) => {
                tracing::info!("snapshot written to {}", path.display());
                format!("Saved {}", path.display())
            }
            Err(e) => {
                tracing::warn!("{e}");
                format!("Snapshot failed: {e}")
            }
        });
    }

    // ── painting ────────────────────────────────────────────────

    /// Inject the selected material under the pointer, widened by the brush.
    pub fn paint_at_pointer(&mut self) {
        let Some((col, row)) = self.pointer else {
            return;
        };
        let Some(span) = self
            .canvas_geometry()
            .and_then(|g| g.cell_footprint(col, row))
        else {
            tracing::debug!("pointer at {col}:{row} is outside the canvas");
            return;
        };

        let span = span.grow(
            usize::from(self.config.brush_radius),
            self.renderer.width(),
            self.renderer.height(),
        );
        let name = self.material.name();
        for (x, y) in span.cells() {
            if let Err(e) = self.renderer.add_material(name, x as isize, y as isize) {
                tracing::debug!("paint skipped: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::Scene;
    use crate::core::universe::Position;

    fn state(width: usize, height: usize) -> AppState {
        let renderer = Renderer::with_scene(width, height, Scene::Empty, Some(3)).unwrap();
        let mut state = AppState::new(renderer, AppConfig::default());
        // Canvas pane of 10x5 cells at (1, 1) once borders are removed.
        state.terminal_area = Rect::new(0, 0, 12 + crate::ui::layout::PANEL_WIDTH, 8);
        state
    }

    fn material_at(state: &AppState, x: usize, y: usize) -> Material {
        state
            .renderer
            .simulation()
            .material_at(Position::new(x, y))
            .unwrap()
    }

    #[test]
    fn ticks_follow_the_interval() {
        let mut s = state(4, 4);
        s.set_tick_interval(3);
        for _ in 0..9 {
            s.end_frame();
        }
        assert_eq!(s.frames, 9);
        assert_eq!(s.renderer.ticks(), 3);
    }

    #[test]
    fn paused_frames_do_not_tick() {
        let mut s = state(4, 4);
        s.toggle_pause();
        for _ in 0..5 {
            s.end_frame();
        }
        assert_eq!(s.renderer.ticks(), 0);
        s.step_once();
        assert_eq!(s.renderer.ticks(), 1);
        s.toggle_pause();
        s.end_frame();
        assert_eq!(s.renderer.ticks(), 2);
    }

    #[test]
    fn shrinking_the_interval_keeps_the_frame_count() {
        let mut s = state(4, 4);
        s.set_tick_interval(10);
        for _ in 0..7 {
            s.end_frame();
        }
        assert_eq!(s.current_tick, 7);
        assert_eq!(s.renderer.ticks(), 0);

        s.set_tick_interval(3);
        assert_eq!(s.current_tick, 1);
        s.end_frame();
        assert_eq!(s.renderer.ticks(), 0);
        s.end_frame();
        assert_eq!(s.renderer.ticks(), 1);
        for _ in 0..3 {
            s.end_frame();
        }
        assert_eq!(s.renderer.ticks(), 2);
    }

    #[test]
    fn frame_timing_feeds_the_stats() {
        let mut s = state(4, 4);
        s.record_frame_timing(Duration::from_micros(800), Duration::from_millis(40));
        let stats = s.panel_stats().unwrap();
        assert_eq!(stats.frame_time, Duration::from_micros(800));
        assert!((stats.fps - 25.0).abs() < 1e-9);

        s.record_frame_timing(Duration::from_micros(900), Duration::ZERO);
        assert!((s.fps - 25.0).abs() < 1e-9);

        s.config.show_stats = false;
        assert!(s.panel_stats().is_none());
    }

    #[test]
    fn interval_is_clamped() {
        let mut s = state(4, 4);
        s.set_tick_interval(0);
        assert_eq!(s.tick_interval, TICK_INTERVAL_MIN);
        s.set_tick_interval(1000);
        assert_eq!(s.tick_interval, TICK_INTERVAL_MAX);
    }

    #[test]
    fn material_cycling_wraps() {
        let mut s = state(4, 4);
        s.select_material(Material::ALL[0]);
        s.cycle_material(-1);
        assert_eq!(s.material, *Material::ALL.last().unwrap());
        s.cycle_material(1);
        assert_eq!(s.material, Material::ALL[0]);
    }

    #[test]
    fn holding_the_pointer_paints_each_frame() {
        let mut s = state(10, 10);
        s.select_material(Material::Wood);
        s.mouse_down = true;
        s.pointer = Some((3, 2));
        s.begin_frame();
        // Terminal cell (3, 2) covers grid column 2, rows 2 and 3.
        assert_eq!(material_at(&s, 2, 2), Material::Wood);
        assert_eq!(material_at(&s, 2, 3), Material::Wood);
        assert_eq!(s.renderer.simulation().count(Material::Wood), 2);

        s.mouse_down = false;
        s.pointer = Some((5, 2));
        s.begin_frame();
        assert_eq!(s.renderer.simulation().count(Material::Wood), 2);
    }

    #[test]
    fn brush_radius_widens_the_stroke() {
        let mut s = state(10, 10);
        s.config.brush_radius = 1;
        s.select_material(Material::Wood);
        s.pointer = Some((1, 1));
        s.paint_at_pointer();
        // Grid (0, 0)..(1, 2) grown by one and clamped at the corner.
        assert_eq!(s.renderer.simulation().count(Material::Wood), 2 * 3);
    }

    #[test]
    fn pointer_outside_canvas_paints_nothing() {
        let mut s = state(10, 10);
        s.pointer = Some((30, 2));
        s.paint_at_pointer();
        assert_eq!(s.renderer.simulation().count(Material::Air), 100);
    }
}
