//! Controls panel: pause checkbox, tick-interval slider and material
//! selector.
//!
//! Row positions come from [`PanelZones`], which the mouse handler uses for
//! hit-testing as well, so drawing and clicking always agree.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use std::time::Duration;

use crate::config::{TICK_INTERVAL_MAX, TICK_INTERVAL_MIN};
use crate::core::material::Material;
use crate::core::renderer;

use super::canvas::composite;
use super::layout::{inset, point_in_rect};
use super::theme::Theme;

// ───────────────────────────────────────── zones ─────────────

/// Clickable rows inside the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelZones {
    pub pause: Rect,
    pub interval_label: Rect,
    pub slider: Rect,
    pub material_label: Rect,
    /// One row per entry of [`Material::ALL`].
    pub materials: Rect,
    pub stats: Rect,
}

impl PanelZones {
    /// Zones for a panel occupying `panel` (border included).
    pub fn compute(panel: Rect) -> Self {
        let inner = inset(panel);
        let bottom = inner.y + inner.height;
        let row = |offset: u16, height: u16| {
            let y = (inner.y + offset).min(bottom);
            Rect::new(inner.x, y, inner.width, height.min(bottom - y))
        };

        let materials_height = Material::ALL.len() as u16;
        Self {
            pause: row(0, 1),
            interval_label: row(2, 1),
            slider: row(3, 1),
            material_label: row(5, 1),
            materials: row(6, materials_height),
            stats: row(7 + materials_height, 4),
        }
    }

    /// Tick interval for a click at column `col` of the slider.
    pub fn slider_value_at(&self, col: u16) -> u32 {
        let width = self.slider.width.saturating_sub(1).max(1);
        let offset = u32::from(col.saturating_sub(self.slider.x).min(width));
        let span = TICK_INTERVAL_MAX - TICK_INTERVAL_MIN;
        TICK_INTERVAL_MIN + (offset * span + u32::from(width) / 2) / u32::from(width)
    }

    /// Material listed on terminal row `row`, if any.
    pub fn material_at(&self, col: u16, row: u16) -> Option<Material> {
        if !point_in_rect(self.materials, col, row) {
            return None;
        }
        Material::ALL.get(usize::from(row - self.materials.y)).copied()
    }
}

/// Number of filled slider cells for `interval` on a slider `width` cells wide.
fn slider_fill(interval: u32, width: u16) -> u16 {
    let span = TICK_INTERVAL_MAX - TICK_INTERVAL_MIN;
    let steps = u32::from(width.saturating_sub(1));
    let pos = (interval.clamp(TICK_INTERVAL_MIN, TICK_INTERVAL_MAX) - TICK_INTERVAL_MIN) * steps / span;
    pos as u16 + 1
}

// ───────────────────────────────────────── widget ────────────

/// Counters shown under the material selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelStats {
    pub ticks: u64,
    pub frames: u64,
    /// Time spent painting, drawing and ticking the last frame.
    pub frame_time: Duration,
    /// Measured frames per second over the last frame period.
    pub fps: f64,
}

impl PanelStats {
    fn lines(&self) -> [String; 4] {
        [
            format!("ticks  {}", self.ticks),
            format!("frames {}", self.frames),
            format!("frame  {}µs", self.frame_time.as_micros()),
            format!("fps    {:.1}", self.fps),
        ]
    }
}

pub struct ControlsPanel {
    pub paused: bool,
    pub tick_interval: u32,
    pub material: Material,
    /// Optional stats lines shown under the selector.
    pub stats: Option<PanelStats>,
}

impl Widget for ControlsPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Controls ")
            .title_style(Theme::title_style())
            .borders(Borders::ALL)
            .border_style(Theme::border_style());
        block.render(area, buf);

        let zones = PanelZones::compute(area);

        // ── pause checkbox ─────────────────────────────────────
        let (mark, mark_style) = if self.paused {
            ("[x]", Theme::checked_style())
        } else {
            ("[ ]", Theme::unchecked_style())
        };
        Paragraph::new(Line::from(vec![
            Span::styled(mark, mark_style),
            Span::styled(" Paused", Theme::label_style()),
        ]))
        .render(zones.pause, buf);

        // ── tick interval slider ───────────────────────────────
        let unit = if self.tick_interval == 1 { "frame" } else { "frames" };
        Paragraph::new(Line::from(vec![
            Span::styled("Tick every ", Theme::label_style()),
            Span::styled(self.tick_interval.to_string(), Theme::value_style()),
            Span::styled(format!(" {unit}"), Theme::label_style()),
        ]))
        .render(zones.interval_label, buf);

        let filled = slider_fill(self.tick_interval, zones.slider.width);
        let track = zones.slider.width.saturating_sub(filled);
        Paragraph::new(Line::from(vec![
            Span::styled("━".repeat(usize::from(filled.saturating_sub(1))), Theme::slider_fill_style()),
            Span::styled("●", Theme::value_style()),
            Span::styled("─".repeat(usize::from(track)), Theme::slider_track_style()),
        ]))
        .render(zones.slider, buf);

        // ── material selector ──────────────────────────────────
        Paragraph::new(Span::styled("Material", Theme::label_style())).render(zones.material_label, buf);

        let lines: Vec<Line> = Material::ALL
            .iter()
            .map(|&m| {
                let swatch = composite(renderer::color(m), Theme::CANVAS_BG);
                let selected = m == self.material;
                let (prefix, style) = if selected {
                    (" ▸ ", Theme::selected_style())
                } else {
                    ("   ", Theme::label_style())
                };
                Line::from(vec![
                    Span::styled(prefix, style),
                    Span::styled("██", ratatui::style::Style::default().fg(swatch)),
                    Span::styled(format!(" {}", m.label()), style),
                ])
            })
            .collect();
        Paragraph::new(lines).render(zones.materials, buf);

        if let Some(stats) = self.stats {
            let lines: Vec<Line> = stats
                .lines()
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Theme::dim_style())))
                .collect();
            Paragraph::new(lines).render(zones.stats, buf);
        }
    }
}
