mod cli;
mod ui;

use clap::Parser;
use winit::event_loop::EventLoop;

use ivgrid::files::collect_images;
use ivgrid::MediaCollection;

use crate::cli::Cli;
use crate::ui::state::BrowserState;
use crate::ui::App;

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let settings = cli.settings();

    let files = collect_images(&cli.paths, cli.file_list.as_deref(), cli.scan_options());
    if files.is_empty() {
        log::error!("No image files found.");
        return;
    }
    log::info!(
        "Browsing {} images in {:?} mode, thumbnails {}px",
        files.len(),
        settings.start_mode,
        settings.thumbnail_size
    );

    let collection = MediaCollection::new(files);
    let state = BrowserState::new(
        collection,
        settings,
        cli.initial_delay as f64 / 1000.0,
        cli.repeat_delay as f64 / 1000.0,
        cli.marked_file_output.clone(),
    );
    let mut app = App::new(state);

    let event_loop = EventLoop::new().expect("create event loop");
    event_loop.run_app(&mut app).expect("run event loop");
}
