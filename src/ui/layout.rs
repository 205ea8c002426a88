//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the controls panel, borders included.
pub const PANEL_WIDTH: u16 = 24;

/// Primary screen layout: canvas on the left, controls panel on the right,
/// and a bottom status bar.
pub struct AppLayout {
    /// Canvas pane including its border.
    pub canvas_area: Rect,
    /// Canvas pane without its border; this is where pixels are drawn.
    pub canvas_inner: Rect,
    pub panel_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // canvas + panel
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(4), Constraint::Length(PANEL_WIDTH)])
            .split(rows[0]);

        let canvas_area = cols[0];
        Self {
            canvas_area,
            canvas_inner: inset(canvas_area),
            panel_area: cols[1],
            status_area: rows[1],
        }
    }
}

/// `area` shrunk by a one-cell border on every side.
pub fn inset(area: Rect) -> Rect {
    Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    )
}

/// Whether the terminal cell (`col`, `row`) lies inside `rect`.
pub fn point_in_rect(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x && col < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panel_sits_right_of_the_canvas() {
        let layout = AppLayout::from_area(Rect::new(0, 0, 100, 40));
        assert_eq!(layout.panel_area.width, PANEL_WIDTH);
        assert_eq!(layout.panel_area.x, 100 - PANEL_WIDTH);
        assert_eq!(layout.canvas_area.width, 100 - PANEL_WIDTH);
        assert_eq!(layout.status_area, Rect::new(0, 39, 100, 1));
        assert_eq!(layout.canvas_inner, Rect::new(1, 1, 100 - PANEL_WIDTH - 2, 37));
    }

    #[test]
    fn point_in_rect_excludes_far_edges() {
        let r = Rect::new(2, 3, 4, 2);
        assert!(point_in_rect(r, 2, 3));
        assert!(point_in_rect(r, 5, 4));
        assert!(!point_in_rect(r, 6, 4));
        assert!(!point_in_rect(r, 5, 5));
    }
}
