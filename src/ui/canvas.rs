//! Canvas pane: paints the renderer's RGBA buffer with half-block cells and
//! maps terminal cells back to grid coordinates for the pointer.
//!
//! Every terminal cell shows two pixels stacked vertically: the upper one as
//! the foreground of `▀`, the lower one as the background.  The grid is
//! scaled with nearest-neighbour sampling so that it fits the pane while
//! keeping square pixels.
//!
//! The sampling lives in [`CanvasGeometry`] rather than going through
//! `image::imageops::resize`: painting and pointer hit-testing must agree on
//! exactly which grid cell sits under each terminal cell.

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::Color,
    widgets::{Block, Widget},
};

use super::theme::Theme;

// ───────────────────────────────────────── geometry ──────────

/// How a `grid_w` × `grid_h` grid is laid onto a terminal area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    area: Rect,
    grid_w: usize,
    grid_h: usize,
    /// Grid pixels per screen pixel.
    scale: f64,
    /// Drawn size in screen pixels (columns, half-rows).
    px_w: u32,
    px_h: u32,
}

/// Rectangle of grid cells, `x0..x1` × `y0..y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSpan {
    pub x0: usize,
    pub x1: usize,
    pub y0: usize,
    pub y1: usize,
}

impl GridSpan {
    /// Grows the span by `radius` on every side, clamped to the grid.
    pub fn grow(self, radius: usize, grid_w: usize, grid_h: usize) -> Self {
        Self {
            x0: self.x0.saturating_sub(radius),
            x1: (self.x1 + radius).min(grid_w),
            y0: self.y0.saturating_sub(radius),
            y1: (self.y1 + radius).min(grid_h),
        }
    }

    /// All cells in the span, row by row.
    pub fn cells(self) -> impl Iterator<Item = (usize, usize)> {
        (self.y0..self.y1).flat_map(move |y| (self.x0..self.x1).map(move |x| (x, y)))
    }
}

impl CanvasGeometry {
    /// Fit the grid into `area`.  `None` when either side is empty.
    pub fn fit(area: Rect, grid_w: usize, grid_h: usize) -> Option<Self> {
        if area.width == 0 || area.height == 0 || grid_w == 0 || grid_h == 0 {
            return None;
        }

        let cap_w = f64::from(area.width);
        let cap_h = f64::from(area.height) * 2.0;
        let scale = (grid_w as f64 / cap_w).max(grid_h as f64 / cap_h);

        let px_w = ((grid_w as f64 / scale).floor() as u32).clamp(1, u32::from(area.width));
        let px_h = ((grid_h as f64 / scale).floor() as u32).clamp(1, u32::from(area.height) * 2);

        Some(Self {
            area,
            grid_w,
            grid_h,
            scale,
            px_w,
            px_h,
        })
    }

    /// Terminal cells actually covered by the grid.
    pub fn drawn_rect(&self) -> Rect {
        Rect::new(
            self.area.x,
            self.area.y,
            self.px_w as u16,
            self.px_h.div_ceil(2) as u16,
        )
    }

    /// Grid cell shown at screen pixel (`sx`, `sy`).
    fn sample(&self, sx: u32, sy: u32) -> (usize, usize) {
        let x = ((f64::from(sx) * self.scale) as usize).min(self.grid_w - 1);
        let y = ((f64::from(sy) * self.scale) as usize).min(self.grid_h - 1);
        (x, y)
    }

    /// Grid cells under the terminal cell (`col`, `row`), or `None` when the
    /// cell is outside the drawn canvas.
    pub fn cell_footprint(&self, col: u16, row: u16) -> Option<GridSpan> {
        if col < self.area.x || row < self.area.y {
            return None;
        }
        let sx = u32::from(col - self.area.x);
        let sy0 = u32::from(row - self.area.y) * 2;
        if sx >= self.px_w || sy0 >= self.px_h {
            return None;
        }
        let sy1 = (sy0 + 2).min(self.px_h);

        let span = |lo: u32, hi: u32, limit: usize| {
            let a = ((f64::from(lo) * self.scale) as usize).min(limit - 1);
            let b = ((f64::from(hi) * self.scale) as usize).clamp(a + 1, limit);
            (a, b)
        };
        let (x0, x1) = span(sx, sx + 1, self.grid_w);
        let (y0, y1) = span(sy0, sy1, self.grid_h);
        Some(GridSpan { x0, x1, y0, y1 })
    }
}

// ───────────────────────────────────────── widget ────────────

/// Draws an RGBA pixel buffer.
pub struct CanvasWidget<'a> {
    data: &'a [u8],
    grid_w: usize,
    grid_h: usize,
    block: Option<Block<'a>>,
}

impl<'a> CanvasWidget<'a> {
    pub fn new(data: &'a [u8], grid_w: usize, grid_h: usize) -> Self {
        Self {
            data,
            grid_w,
            grid_h,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn pixel(&self, x: usize, y: usize) -> Color {
        let i = (y * self.grid_w + x) * 4;
        match self.data.get(i..i + 4) {
            Some(&[r, g, b, a]) => composite([r, g, b, a], Theme::CANVAS_BG),
            _ => Color::Reset,
        }
    }
}

impl Widget for CanvasWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = match &self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.clone().render(area, buf);
                inner
            }
            None => area,
        };

        let Some(geometry) = CanvasGeometry::fit(inner, self.grid_w, self.grid_h) else {
            return;
        };
        let drawn = geometry.drawn_rect();

        for row in 0..drawn.height {
            let top = u32::from(row) * 2;
            let bottom = top + 1;
            for col in 0..drawn.width {
                let sx = u32::from(col);
                let (x, y) = geometry.sample(sx, top);
                let fg = self.pixel(x, y);
                let bg = if bottom < geometry.px_h {
                    let (x, y) = geometry.sample(sx, bottom);
                    self.pixel(x, y)
                } else {
                    Color::Reset
                };
                if let Some(cell) = buf.cell_mut(Position::new(drawn.x + col, drawn.y + row)) {
                    cell.set_char('▀').set_fg(fg).set_bg(bg);
                }
            }
        }
    }
}

/// Blend an RGBA pixel over an opaque backdrop.
pub fn composite([r, g, b, a]: [u8; 4], backdrop: [u8; 3]) -> Color {
    let mix = |src: u8, dst: u8| -> u8 {
        let a = u16::from(a);
        ((u16::from(src) * a + u16::from(dst) * (255 - a)) / 255) as u8
    };
    Color::Rgb(mix(r, backdrop[0]), mix(g, backdrop[1]), mix(b, backdrop[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_that_fits_is_drawn_one_to_one() {
        let g = CanvasGeometry::fit(Rect::new(1, 1, 10, 5), 10, 10).unwrap();
        assert_eq!(g.drawn_rect(), Rect::new(1, 1, 10, 5));
        assert_eq!(
            g.cell_footprint(3, 2),
            Some(GridSpan { x0: 2, x1: 3, y0: 2, y1: 4 })
        );
        assert_eq!(g.cell_footprint(0, 2), None);
        assert_eq!(g.cell_footprint(11, 2), None);
    }

    #[test]
    fn large_grids_are_scaled_down() {
        let g = CanvasGeometry::fit(Rect::new(0, 0, 10, 5), 40, 20).unwrap();
        // Width limits: 4 grid pixels per screen pixel.
        assert_eq!(g.drawn_rect(), Rect::new(0, 0, 10, 3));
        let span = g.cell_footprint(9, 2).unwrap();
        assert_eq!((span.x0, span.x1), (36, 40));
        assert_eq!((span.y0, span.y1), (16, 20));
        assert_eq!(g.cell_footprint(0, 3), None);
    }

    #[test]
    fn footprint_never_leaves_the_grid() {
        let g = CanvasGeometry::fit(Rect::new(0, 0, 7, 3), 13, 11).unwrap();
        let drawn = g.drawn_rect();
        for row in 0..drawn.height {
            for col in 0..drawn.width {
                let span = g.cell_footprint(col, row).unwrap();
                assert!(span.x0 < span.x1 && span.x1 <= 13);
                assert!(span.y0 < span.y1 && span.y1 <= 11);
            }
        }
    }

    #[test]
    fn brush_growth_is_clamped() {
        let span = GridSpan { x0: 0, x1: 1, y0: 4, y1: 6 }.grow(2, 3, 7);
        assert_eq!(span, GridSpan { x0: 0, x1: 3, y0: 2, y1: 7 });
        assert_eq!(span.cells().count(), 15);
    }

    #[test]
    fn transparent_pixels_show_the_backdrop() {
        assert_eq!(composite([0xff, 0xff, 0xff, 0], [1, 2, 3]), Color::Rgb(1, 2, 3));
        assert_eq!(composite([9, 8, 7, 0xff], [1, 2, 3]), Color::Rgb(9, 8, 7));
    }

    #[test]
    fn widget_paints_half_blocks() {
        // 1x2 grid: red above blue.
        let data = [0xff, 0, 0, 0xff, 0, 0, 0xff, 0xff];
        let area = Rect::new(0, 0, 1, 1);
        let mut buf = Buffer::empty(area);
        CanvasWidget::new(&data, 1, 2).render(area, &mut buf);
        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(0xff, 0, 0));
        assert_eq!(cell.bg, Color::Rgb(0, 0, 0xff));
    }
}
