use crate::geometry::{HeightFit, PresentationMode};

pub const MIN_THUMBNAIL_SIZE: u32 = 30;
pub const MAX_THUMBNAIL_SIZE: u32 = 400;
pub const THUMBNAIL_STEP: u32 = 20;
pub const ZOOM_FACTOR: f32 = 1.2;
pub const MIN_ZOOM: f32 = 0.05;
pub const PAN_STEP: f32 = 100.0;
pub const DEFAULT_FPS: u32 = 24;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Everything the browser needs to know at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub thumbnail_size: u32,
    pub padding: u32,
    pub zoom: f32,
    pub start_mode: PresentationMode,
    pub start_index: usize,
    pub fit: HeightFit,
    /// Limit on scroll-snap steps per tick, `None` settles immediately.
    pub snap_steps_per_tick: Option<usize>,
    /// Redraw rate while nothing is animating.
    pub fps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            thumbnail_size: 100,
            padding: 20,
            zoom: 1.0,
            start_mode: PresentationMode::Grid,
            start_index: 0,
            fit: HeightFit::Uniform,
            snap_steps_per_tick: None,
            fps: DEFAULT_FPS,
        }
    }
}

impl Settings {
    /// Grow or shrink the thumbnail size by one step, within bounds.
    /// Returns the new size.
    pub fn step_thumbnail_size(&mut self, grow: bool) -> u32 {
        let size = if grow {
            self.thumbnail_size.saturating_add(THUMBNAIL_STEP)
        } else {
            self.thumbnail_size.saturating_sub(THUMBNAIL_STEP)
        };
        self.thumbnail_size = size.clamp(MIN_THUMBNAIL_SIZE, MAX_THUMBNAIL_SIZE);
        self.thumbnail_size
    }

    /// Start index clamped to a collection of `len` items.
    pub fn start_index_for(&self, len: usize) -> usize {
        self.start_index.min(len.saturating_sub(1))
    }
}
