use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use ivgrid::files::ScanOptions;
use ivgrid::{HeightFit, PresentationMode, Settings};

pub const HELP_KEYS: &str = "\
Key Bindings:
  Esc / q           : Quit
  Left / h          : Previous image
  Right / l         : Next image
  Up / k, Down / j  : Previous / next row (grid), pan (contiguous)
  Wheel             : Scroll (grid, contiguous) / zoom (single)
  t                 : Toggle grid / viewer
  c                 : Toggle single / contiguous viewer
  w                 : Toggle uniform / fit-width heights (contiguous)
  + / -             : Thumbnail size (grid) / zoom (viewer)
  Home / End        : First / last image
  Space             : Toggle selection of the current image and advance
  m                 : Write selected paths (or the current one) to the mark output
";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Grid,
    Single,
    Contiguous,
}

impl From<ModeArg> for PresentationMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Grid => PresentationMode::Grid,
            ModeArg::Single => PresentationMode::Single,
            ModeArg::Contiguous => PresentationMode::Contiguous,
        }
    }
}

#[derive(Parser)]
#[command(name = "ivgrid", about = "Browse large image collections", after_help = HELP_KEYS)]
pub struct Cli {
    /// Files or directories to view
    #[arg(required_unless_present = "file_list")]
    pub paths: Vec<PathBuf>,

    /// Load file list from a text file (one path per line)
    #[arg(short = 'L', long, value_name = "FILE")]
    pub file_list: Option<PathBuf>,

    /// Output file for marked images (appends paths). Defaults to stdout if not set.
    #[arg(short = 'o', long, value_name = "FILE")]
    pub marked_file_output: Option<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Follow symbolic links (default: false)
    #[arg(long)]
    pub follow_links: bool,

    /// Presentation mode at startup
    #[arg(short, long, value_enum, default_value = "grid")]
    pub mode: ModeArg,

    /// Index of the first image to select
    #[arg(short, long, default_value = "0")]
    pub start: usize,

    /// Thumbnail edge length in pixels
    #[arg(long, default_value = "100")]
    pub thumbnail_size: u32,

    /// Padding between grid cells in pixels
    #[arg(long, default_value = "20")]
    pub padding: u32,

    /// Initial viewer zoom
    #[arg(short, long, default_value = "1.0")]
    pub zoom: f32,

    /// Contiguous mode: size items by window width and aspect ratio
    #[arg(long)]
    pub fit_width: bool,

    /// Spread scroll-snap over ticks, at most this many items per tick
    #[arg(long, value_name = "N")]
    pub snap_steps: Option<usize>,

    /// Redraw rate while loading (default: 24)
    #[arg(long, default_value = "24")]
    pub fps: u32,

    /// Initial delay in ms before key-hold repeat begins (default: 500)
    #[arg(long, default_value = "500")]
    pub initial_delay: u64,

    /// Key-hold repeat interval in milliseconds for navigation (default: 35)
    #[arg(long, default_value = "35")]
    pub repeat_delay: u64,
}

impl Cli {
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            recursive: self.recursive,
            follow_links: self.follow_links,
        }
    }

    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            thumbnail_size: self.thumbnail_size.clamp(
                ivgrid::config::MIN_THUMBNAIL_SIZE,
                ivgrid::config::MAX_THUMBNAIL_SIZE,
            ),
            padding: self.padding,
            zoom: self.zoom.max(ivgrid::config::MIN_ZOOM),
            start_mode: self.mode.into(),
            start_index: self.start,
            fit: if self.fit_width {
                HeightFit::AspectWidth
            } else {
                defaults.fit
            },
            snap_steps_per_tick: self.snap_steps,
            fps: self.fps.max(1),
        }
    }
}
