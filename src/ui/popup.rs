//! Popup overlay widgets for the settings menu and key-binding submenu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::settings::{SettingsItem, SETTINGS_ITEMS};
use crate::app::state::AppState;
use crate::config::{Action, AppConfig};

// ───────────────────────────────────────── settings popup ────

/// Settings menu popup overlay.
pub struct SettingsPopup<'a> {
    pub state: &'a AppState,
    pub selected: usize,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (SETTINGS_ITEMS.len() as u16) + 6;
        let popup = centered_fixed(44, height, area);
        Clear.render(popup, buf);

        let inner = popup_block(" Settings ").inner(popup);
        popup_block(" Settings ").render(popup, buf);

        let mut lines = Vec::new();
        lines.push(Line::raw(""));
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let (prefix, style) = if i == self.selected {
                (" ▸ ", selected_style())
            } else {
                ("   ", Style::default().fg(Color::White))
            };

            let label = Span::styled(format!("{prefix}{:<24}", item.label()), style);
            let value = match item {
                SettingsItem::Submenu { .. } => None,
                SettingsItem::Toggle { get, .. } => Some(if get(self.state) {
                    Span::styled("[ON]", Style::default().fg(Color::Green))
                } else {
                    Span::styled("[OFF]", Style::default().fg(Color::DarkGray))
                }),
                SettingsItem::Cycle { value, .. } => {
                    Some(Span::styled(value(self.state), Style::default().fg(Color::Yellow)))
                }
            };

            lines.push(match value {
                Some(value) => Line::from(vec![label, value]),
                None => Line::from(label),
            });
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter/Space: change  Esc: close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── key bindings ──────

/// Interactive key-binding popup overlay.
pub struct KeyBindingsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl Widget for KeyBindingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + 2 blanks + 1 reset + 1 hint + 2 border
        let height = (Action::ALL.len() as u16) + 7;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let inner = popup_block(" Key Bindings ").inner(popup);
        popup_block(" Key Bindings ").render(popup, buf);

        let dim = Style::default().fg(Color::DarkGray);
        let mut lines = Vec::new();

        lines.push(Line::raw(""));

        // ── Action rows ─────────────────────────────────────────
        for (i, &action) in Action::ALL.iter().enumerate() {
            let is_selected = i == self.selected;
            let prefix = if is_selected { " ▸ " } else { "   " };
            let rebinding = is_selected && self.awaiting_rebind;

            let keys_display = if rebinding {
                "Press a key…".to_string()
            } else {
                self.config.display_bindings(action)
            };

            let base_style = if is_selected {
                selected_style()
            } else {
                Style::default().fg(Color::White)
            };
            let mut key_style = Style::default().fg(Color::Yellow);
            if is_selected {
                key_style = key_style.bg(Color::DarkGray);
            }
            if rebinding {
                key_style = key_style.add_modifier(Modifier::BOLD);
            }

            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("{prefix}{:<22}", action.label());
            let keys_width = (inner.width as usize)
                .saturating_sub(label_col.chars().count())
                .max(1);
            let keys_col = format!("{keys_display:>keys_width$}");

            lines.push(Line::from(vec![
                Span::styled(label_col, base_style),
                Span::styled(keys_col, key_style),
            ]));
        }

        // ── Reset option ────────────────────────────────────────
        let is_reset_selected = self.selected == Action::ALL.len();
        lines.push(Line::raw(""));
        let (reset_prefix, reset_style) = if is_reset_selected {
            (" ▸ ", selected_style())
        } else {
            ("   ", Style::default().fg(Color::White))
        };
        lines.push(Line::from(Span::styled(
            format!("{reset_prefix}⟳ Reset to defaults"),
            reset_style,
        )));

        // ── Hint bar ────────────────────────────────────────────
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Enter: add key  Del: clear  Esc: back",
            dim,
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray))
}

fn selected_style() -> Style {
    Style::default()
        .fg(Color::White)
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
