use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresentationMode {
    Grid,
    Single,
    Contiguous,
}

/// How tall each item is drawn in contiguous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightFit {
    /// Every item is `window_height * zoom` tall.
    Uniform,
    /// Items are `window_width * zoom` wide, height from their aspect ratio.
    AspectWidth,
}

// ---------------------------------------------------------------------------
// Grid page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPage {
    pub rows: usize,
    pub columns: usize,
    /// First visible row.
    pub row_scroll: usize,
}

impl Default for GridPage {
    fn default() -> Self {
        Self {
            rows: 1,
            columns: 1,
            row_scroll: 0,
        }
    }
}

impl GridPage {
    /// Rows and columns that fit in the window, at least one of each.
    pub fn fit(
        &mut self,
        window_width: u32,
        window_height: u32,
        thumbnail_size: u32,
        padding: u32,
    ) {
        let cell = thumbnail_size.saturating_add(padding).max(1);
        let margin = padding.saturating_mul(2);
        let inner_w = window_width.saturating_sub(margin);
        let inner_h = window_height.saturating_sub(margin);
        self.columns = ((inner_w / cell) as usize).max(1);
        self.rows = ((inner_h / cell) as usize).max(1);
    }

    /// Scroll just enough to keep the row of `current` on the page.
    pub fn follow(&mut self, current: usize) {
        let row = current / self.columns.max(1);
        if row >= self.row_scroll + self.rows {
            self.row_scroll = row + 1 - self.rows;
        } else if row < self.row_scroll {
            self.row_scroll = row;
        }
    }

    /// Visible index range for a collection of `len` items. Empty when the
    /// page starts past the end.
    pub fn window(&self, len: usize) -> Range<usize> {
        let start = self.row_scroll.saturating_mul(self.columns);
        if start >= len {
            return len..len;
        }
        let end = start.saturating_add(self.rows.saturating_mul(self.columns)).min(len);
        start..end
    }

    /// Top-left pixel of the cell at `index`, relative to the window.
    pub fn cell_origin(&self, index: usize, thumbnail_size: u32, padding: u32) -> (i32, i32) {
        let columns = self.columns.max(1);
        let row = (index / columns) as i64 - self.row_scroll as i64;
        let col = (index % columns) as i64;
        let step = thumbnail_size as i64 + padding as i64;
        let to_px = |v: i64| v.clamp(i32::MIN as i64, i32::MAX as i64) as i32;
        (
            to_px(padding as i64 + col * step),
            to_px(padding as i64 + row * step),
        )
    }
}

// ---------------------------------------------------------------------------
// Viewport
// ---------------------------------------------------------------------------

/// Per-tick view state handed to the loader policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub current: usize,
    /// Vertical pan in pixels. Positive means the view has scrolled down past
    /// the centered position of `current`.
    pub pan_y: f32,
    pub zoom: f32,
    pub grid: GridPage,
    pub window_width: f32,
    pub window_height: f32,
    pub fit: HeightFit,
}

impl ViewportGeometry {
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            current: 0,
            pan_y: 0.0,
            zoom: 1.0,
            grid: GridPage::default(),
            window_width: window_width as f32,
            window_height: window_height as f32,
            fit: HeightFit::Uniform,
        }
    }

    /// Rendered height of an item with the given height/width ratio.
    pub fn item_height(&self, aspect_ratio: f32) -> f32 {
        match self.fit {
            HeightFit::Uniform => self.window_height * self.zoom,
            HeightFit::AspectWidth => self.window_width * self.zoom * aspect_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_window_clamps_to_len() {
        let page = GridPage { rows: 2, columns: 3, row_scroll: 0 };
        assert_eq!(page.window(10), 0..6);
        let page = GridPage { rows: 2, columns: 3, row_scroll: 2 };
        assert_eq!(page.window(10), 6..10);
    }

    #[test]
    fn page_past_end_is_empty() {
        let page = GridPage { rows: 2, columns: 3, row_scroll: 4 };
        assert!(page.window(10).is_empty());
        assert!(GridPage::default().window(0).is_empty());
    }

    #[test]
    fn fit_uses_thumbnail_and_padding() {
        let mut page = GridPage::default();
        page.fit(1280, 720, 100, 20);
        assert_eq!(page.columns, 10);
        assert_eq!(page.rows, 5);

        page.fit(10, 10, 100, 20);
        assert_eq!((page.rows, page.columns), (1, 1));
    }

    #[test]
    fn huge_padding_saturates() {
        let mut page = GridPage::default();
        page.fit(1280, 720, 400, u32::MAX);
        assert_eq!((page.rows, page.columns), (1, 1));
        page.fit(1280, 720, u32::MAX, u32::MAX);
        assert_eq!((page.rows, page.columns), (1, 1));

        let (x, y) = page.cell_origin(0, u32::MAX, u32::MAX);
        assert_eq!((x, y), (i32::MAX, i32::MAX));
    }

    #[test]
    fn follow_keeps_current_row_visible() {
        let mut page = GridPage { rows: 2, columns: 3, row_scroll: 0 };
        page.follow(7);
        assert_eq!(page.row_scroll, 1);
        page.follow(13);
        assert_eq!(page.row_scroll, 3);
        page.follow(1);
        assert_eq!(page.row_scroll, 0);
    }

    #[test]
    fn item_height_by_fit() {
        let mut geo = ViewportGeometry::new(800, 600);
        geo.zoom = 0.5;
        assert_eq!(geo.item_height(2.0), 300.0);
        geo.fit = HeightFit::AspectWidth;
        assert_eq!(geo.item_height(2.0), 800.0);
    }
}
