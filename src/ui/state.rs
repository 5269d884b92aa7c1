use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use winit::keyboard::NamedKey;
use winit::window::Window;

use ivgrid::config::{MIN_ZOOM, PAN_STEP, ZOOM_FACTOR};
use ivgrid::layout::ContiguousLayout;
use ivgrid::selection::emit_paths;
use ivgrid::{
    DecodedImage, HeightFit, ImageLoader, IndexError, LoaderPolicy, MediaCollection,
    PresentationMode, Selection, Settings, TickReport, ViewportGeometry,
};

use crate::ui::render::{
    BG_COLOR, CURRENT_BORDER, CURRENT_BORDER_WIDTH, SELECTED_BORDER, SELECTED_BORDER_WIDTH,
    blit_scaled, fit_scale, outline_rect, rgb,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Nav {
    Next,
    Prev,
    Down,
    Up,
}

fn format_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    let b = bytes as f64;
    if b >= KB * KB * KB {
        format!("{:.2} GB", b / (KB * KB * KB))
    } else if b >= KB * KB {
        format!("{:.2} MB", b / (KB * KB))
    } else if b >= KB {
        format!("{:.2} KB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

// ---------------------------------------------------------------------------
// Browser state
// ---------------------------------------------------------------------------

pub struct BrowserState {
    pub collection: MediaCollection<DecodedImage>,
    pub decoder: ImageLoader,
    pub policy: LoaderPolicy,
    pub settings: Settings,
    pub mode: PresentationMode,
    /// Viewer mode to return to when leaving the grid.
    pub viewer_mode: PresentationMode,
    pub geometry: ViewportGeometry,
    pub last_report: Option<TickReport>,
    /// Frame rate of the animation on screen, if any.
    pub animation_fps: Option<u32>,
    pub title: String,
    pub selection: Selection,
    /// Where `m` appends marked paths; stdout when unset.
    pub marked_file_output: Option<PathBuf>,

    // Key-hold repeat state
    pub initial_delay: f64,
    pub repeat_delay: f64,
    pub nav_hold_timer: f64,
    pub nav_past_initial: bool,
    pub last_frame: Instant,

    pub keys_down: HashSet<NamedKey>,
    pub chars_down: HashSet<char>,
    pub keys_pressed: HashSet<NamedKey>,
    pub chars_pressed: HashSet<char>,
    pub wheel_y: f32,
}

impl BrowserState {
    pub fn new(
        collection: MediaCollection<DecodedImage>,
        settings: Settings,
        initial_delay: f64,
        repeat_delay: f64,
        marked_file_output: Option<PathBuf>,
    ) -> Self {
        let mut geometry = ViewportGeometry::new(1280, 720);
        geometry.current = settings.start_index_for(collection.len());
        geometry.zoom = settings.zoom;
        geometry.fit = settings.fit;

        let viewer_mode = match settings.start_mode {
            PresentationMode::Grid => PresentationMode::Single,
            m => m,
        };

        Self {
            policy: LoaderPolicy::new(
                collection.len(),
                settings.thumbnail_size,
                settings.snap_steps_per_tick,
            ),
            collection,
            decoder: ImageLoader,
            mode: settings.start_mode,
            viewer_mode,
            settings,
            geometry,
            last_report: None,
            animation_fps: None,
            title: String::new(),
            selection: Selection::new(),
            marked_file_output,
            initial_delay,
            repeat_delay,
            nav_hold_timer: 0.0,
            nav_past_initial: false,
            last_frame: Instant::now(),
            keys_down: HashSet::new(),
            chars_down: HashSet::new(),
            keys_pressed: HashSet::new(),
            chars_pressed: HashSet::new(),
            wheel_y: 0.0,
        }
    }

    pub fn is_key_pressed_named(&self, k: NamedKey) -> bool {
        self.keys_pressed.contains(&k)
    }

    pub fn is_char_pressed(&self, c: char) -> bool {
        self.chars_pressed.contains(&c)
    }

    pub fn is_key_down_named(&self, k: NamedKey) -> bool {
        self.keys_down.contains(&k)
    }

    pub fn is_char_down(&self, c: char) -> bool {
        self.chars_down.contains(&c)
    }

    fn nav_pressed(&self) -> Option<Nav> {
        if self.is_key_pressed_named(NamedKey::ArrowRight) || self.is_char_pressed('l') {
            Some(Nav::Next)
        } else if self.is_key_pressed_named(NamedKey::ArrowLeft) || self.is_char_pressed('h') {
            Some(Nav::Prev)
        } else if self.is_key_pressed_named(NamedKey::ArrowDown) || self.is_char_pressed('j') {
            Some(Nav::Down)
        } else if self.is_key_pressed_named(NamedKey::ArrowUp) || self.is_char_pressed('k') {
            Some(Nav::Up)
        } else {
            None
        }
    }

    fn nav_down(&self) -> Option<Nav> {
        if self.is_key_down_named(NamedKey::ArrowRight) || self.is_char_down('l') {
            Some(Nav::Next)
        } else if self.is_key_down_named(NamedKey::ArrowLeft) || self.is_char_down('h') {
            Some(Nav::Prev)
        } else if self.is_key_down_named(NamedKey::ArrowDown) || self.is_char_down('j') {
            Some(Nav::Down)
        } else if self.is_key_down_named(NamedKey::ArrowUp) || self.is_char_down('k') {
            Some(Nav::Up)
        } else {
            None
        }
    }

    pub fn is_nav_held(&self) -> bool {
        self.nav_down().is_some()
    }

    /// Whether another tick should follow without waiting for input. Ticks
    /// that only retried failing decodes do not count as progress.
    pub fn wants_tick(&self) -> bool {
        if self.animation_fps.is_some() {
            return true;
        }
        let Some(report) = self.last_report.as_ref() else {
            return true;
        };
        report.thumbnail.is_some()
            || report.snap.is_some_and(|s| s.steps > 0)
            || report
                .reconciliation
                .as_ref()
                .is_some_and(|r| !r.loaded.is_empty() || !r.evicted.is_empty())
    }

    /// Delay until the next tick while loading or animating.
    pub fn tick_interval(&self) -> Duration {
        let fps = self.animation_fps.unwrap_or(self.settings.fps).max(1);
        Duration::from_millis(1000 / fps as u64)
    }

    fn select(&mut self, index: usize) {
        let last = self.collection.len().saturating_sub(1);
        let index = index.min(last);
        if index != self.geometry.current {
            log::debug!("[nav] move {} -> {}", self.geometry.current, index);
            self.geometry.current = index;
            self.geometry.pan_y = 0.0;
        }
    }

    fn apply_nav(&mut self, nav: Nav) {
        let current = self.geometry.current;
        let row = self.geometry.grid.columns.max(1);
        match (self.mode, nav) {
            (_, Nav::Next) => self.select(current + 1),
            (_, Nav::Prev) => self.select(current.saturating_sub(1)),
            (PresentationMode::Grid, Nav::Down) => self.select(current + row),
            (PresentationMode::Grid, Nav::Up) => {
                if current >= row {
                    self.select(current - row);
                }
            }
            (PresentationMode::Single, Nav::Down) => self.select(current + 1),
            (PresentationMode::Single, Nav::Up) => self.select(current.saturating_sub(1)),
            (PresentationMode::Contiguous, Nav::Down) => self.geometry.pan_y += PAN_STEP,
            (PresentationMode::Contiguous, Nav::Up) => self.geometry.pan_y -= PAN_STEP,
        }
    }

    fn handle_navigation(&mut self, dt: f64) {
        if self.is_key_pressed_named(NamedKey::Home) {
            self.select(0);
        } else if self.is_key_pressed_named(NamedKey::End) {
            self.select(usize::MAX);
        }

        if let Some(nav) = self.nav_pressed() {
            self.apply_nav(nav);
            self.nav_hold_timer = 0.0;
            self.nav_past_initial = false;
        } else if let Some(nav) = self.nav_down() {
            self.nav_hold_timer += dt;
            if !self.nav_past_initial {
                if self.nav_hold_timer >= self.initial_delay {
                    self.apply_nav(nav);
                    self.nav_hold_timer = 0.0;
                    self.nav_past_initial = true;
                }
            } else if self.nav_hold_timer >= self.repeat_delay {
                self.apply_nav(nav);
                self.nav_hold_timer -= self.repeat_delay;
            }
        } else {
            self.nav_hold_timer = 0.0;
            self.nav_past_initial = false;
        }

        let wheel = self.wheel_y;
        if wheel.abs() > 0.1 {
            match self.mode {
                PresentationMode::Contiguous => self.geometry.pan_y -= wheel * PAN_STEP,
                PresentationMode::Single => self.zoom(wheel > 0.0),
                PresentationMode::Grid => {
                    let nav = if wheel > 0.0 { Nav::Up } else { Nav::Down };
                    self.apply_nav(nav);
                }
            }
        }
    }

    fn zoom(&mut self, zoom_in: bool) {
        let z = if zoom_in {
            self.geometry.zoom * ZOOM_FACTOR
        } else {
            self.geometry.zoom / ZOOM_FACTOR
        };
        self.geometry.zoom = z.max(MIN_ZOOM);
    }

    fn mark_selection(&self) {
        let indices = self.selection.marked(self.geometry.current);
        let output = self.marked_file_output.as_deref();
        match emit_paths(&self.collection, &indices, output) {
            Ok(n) => log::info!("Marked {} images", n),
            Err(e) => log::error!("Failed to write marked paths: {}", e),
        }
    }

    fn handle_toggles(&mut self) {
        if self.is_key_pressed_named(NamedKey::Space) && !self.collection.is_empty() {
            let current = self.geometry.current;
            let selected = self.selection.toggle(current);
            log::debug!("[select] {} selected={}", current, selected);
            self.select(current + 1);
        }

        if self.is_char_pressed('m') {
            self.mark_selection();
        }

        if self.is_char_pressed('t') {
            self.mode = match self.mode {
                PresentationMode::Grid => self.viewer_mode,
                _ => PresentationMode::Grid,
            };
            self.geometry.pan_y = 0.0;
            log::debug!("[mode] {:?}", self.mode);
        }

        if self.is_char_pressed('c') && self.mode != PresentationMode::Grid {
            self.mode = match self.mode {
                PresentationMode::Contiguous => PresentationMode::Single,
                _ => PresentationMode::Contiguous,
            };
            self.viewer_mode = self.mode;
            self.geometry.pan_y = 0.0;
            log::debug!("[mode] {:?}", self.mode);
        }

        if self.is_char_pressed('w') {
            self.geometry.fit = match self.geometry.fit {
                HeightFit::Uniform => HeightFit::AspectWidth,
                HeightFit::AspectWidth => HeightFit::Uniform,
            };
            self.geometry.pan_y = 0.0;
        }

        let grow = self.is_char_pressed('+') || self.is_char_pressed('=');
        let shrink = self.is_char_pressed('-');
        if grow || shrink {
            if self.mode == PresentationMode::Grid {
                let before = self.settings.thumbnail_size;
                let size = self.settings.step_thumbnail_size(grow);
                if size != before {
                    log::debug!("[grid] thumbnail size {} -> {}", before, size);
                    self.policy.reset_thumbnails(size);
                }
            } else {
                self.zoom(grow);
            }
        }
    }

    /// Run the per-frame logic: input handling, then one residency tick.
    /// Returns true if the app should quit.
    pub fn update(&mut self, window: &Window) -> Result<bool, IndexError> {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        let dt = elapsed.as_secs_f64();
        self.last_frame = now;

        if self.is_key_pressed_named(NamedKey::Escape) || self.is_char_pressed('q') {
            return Ok(true);
        }

        let size = window.inner_size();
        self.geometry.window_width = size.width.max(1) as f32;
        self.geometry.window_height = size.height.max(1) as f32;
        self.geometry.grid.fit(
            size.width,
            size.height,
            self.settings.thumbnail_size,
            self.settings.padding,
        );

        self.handle_navigation(dt);
        self.handle_toggles();

        self.keys_pressed.clear();
        self.chars_pressed.clear();
        self.wheel_y = 0.0;

        if self.collection.is_empty() {
            return Ok(false);
        }

        if self.mode == PresentationMode::Grid {
            self.geometry.grid.follow(self.geometry.current);
        }

        // the frame shown last tick moves on before residency changes
        self.animation_fps = match self.mode {
            PresentationMode::Grid => None,
            _ => self.collection.play_animation(self.geometry.current, elapsed),
        };

        let report = self.policy.tick(
            &mut self.collection,
            &self.decoder,
            self.mode,
            &mut self.geometry,
        )?;
        if !report.is_idle() {
            log::debug!("[tick] {:?}", report);
        }
        self.last_report = Some(report);

        self.refresh_title(window);
        Ok(false)
    }

    fn refresh_title(&mut self, window: &Window) {
        let current = self.geometry.current;
        let Ok(item) = self.collection.get(current) else {
            return;
        };

        let mut title = match (item.byte_size(), item.dimensions()) {
            (Some(bytes), Some((w, h))) => format!("size: {}, {}x{}", format_bytes(bytes), w, h),
            _ => "size: ?".to_string(),
        };
        title.push_str(&format!(", address: {} | ", item.path().display()));
        if let Some(anim) = item.animation() {
            title.push_str(&format!("{}/{}, ", anim.cursor(), anim.frame_count() - 1));
        }
        if self.selection.contains(current) {
            title.push_str("[selected] ");
        }
        title.push_str(&format!(
            "{}/{} | selected {} | resident {}",
            current,
            self.collection.len() - 1,
            self.selection.len(),
            format_bytes(self.collection.resident_bytes()),
        ));

        if title != self.title {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn resident_image(&self, index: usize) -> Option<&DecodedImage> {
        self.collection
            .resident_full(index)
            .or_else(|| self.collection.resident_animation_frame(index))
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    /// Render into the softbuffer framebuffer (u32 per pixel, 0x00RRGGBB).
    pub fn render(&self, frame: &mut [u32], fb_w: u32, fb_h: u32) {
        frame.fill(rgb(BG_COLOR[0], BG_COLOR[1], BG_COLOR[2]));
        if self.collection.is_empty() {
            return;
        }

        match self.mode {
            PresentationMode::Grid => self.render_grid(frame, fb_w, fb_h),
            PresentationMode::Single => self.render_single(frame, fb_w, fb_h),
            PresentationMode::Contiguous => self.render_contiguous(frame, fb_w, fb_h),
        }
    }

    fn render_grid(&self, frame: &mut [u32], fb_w: u32, fb_h: u32) {
        let size = self.settings.thumbnail_size;
        let padding = self.settings.padding;
        let grid = &self.geometry.grid;

        let (cx, cy) = grid.cell_origin(self.geometry.current, size, padding);
        let border = CURRENT_BORDER_WIDTH;
        let outer = size.saturating_add(2 * border);
        outline_rect(
            frame,
            fb_w,
            fb_h,
            cx.saturating_sub(border as i32),
            cy.saturating_sub(border as i32),
            outer,
            outer,
            border,
            CURRENT_BORDER,
        );

        for index in grid.window(self.collection.len()) {
            let (x, y) = grid.cell_origin(index, size, padding);
            if let Some(thumb) = self.collection.resident_thumbnail(index) {
                let scale =
                    fit_scale(thumb.width as f32, thumb.height as f32, size as f32, size as f32);
                blit_scaled(frame, fb_w, fb_h, thumb, x as f32, y as f32, scale);
            }
            if self.selection.contains(index) {
                outline_rect(
                    frame,
                    fb_w,
                    fb_h,
                    x,
                    y,
                    size,
                    size,
                    SELECTED_BORDER_WIDTH,
                    SELECTED_BORDER,
                );
            }
        }
    }

    fn render_single(&self, frame: &mut [u32], fb_w: u32, fb_h: u32) {
        let Some(img) = self.resident_image(self.geometry.current) else {
            return;
        };
        let sw = fb_w as f32;
        let sh = fb_h as f32;
        let scale = fit_scale(img.width as f32, img.height as f32, sw, sh) * self.geometry.zoom;
        let x0 = (sw - img.width as f32 * scale) / 2.0;
        let y0 = (sh - img.height as f32 * scale) / 2.0;
        blit_scaled(frame, fb_w, fb_h, img, x0, y0, scale);
    }

    fn render_contiguous(&self, frame: &mut [u32], fb_w: u32, fb_h: u32) {
        let layout = ContiguousLayout::compute(&self.collection, &self.geometry);
        let sh = fb_h as f32;
        for placement in layout.placements() {
            if !placement.intersects(sh) {
                continue;
            }
            let Some(img) = self.resident_image(placement.index) else {
                continue;
            };
            let scale = placement.height / img.height.max(1) as f32;
            let x0 = (fb_w as f32 - img.width as f32 * scale) / 2.0;
            blit_scaled(frame, fb_w, fb_h, img, x0, placement.top, scale);
        }
    }
}
