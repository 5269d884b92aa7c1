use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::time::Instant;

const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "bmp", "tga", "tiff", "tif", "webp", "ico", "pnm", "pbm",
    "pgm", "ppm", "qoi",
];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    pub recursive: bool,
    pub follow_links: bool,
}

/// Expand files, directories and an optional list file into the ordered,
/// duplicate-free list of images the browser will show.
///
/// Paths from `file_list` come first, one per line, then `paths` in the
/// order given. Directory contents are sorted.
pub fn collect_images(
    paths: &[PathBuf],
    file_list: Option<&Path>,
    opts: ScanOptions,
) -> Vec<PathBuf> {
    let start_time = Instant::now();
    let mut found = Vec::new();

    if let Some(list_path) = file_list {
        match read_file_list(list_path) {
            Ok(listed) => {
                for p in listed {
                    add_path(&p, opts, &mut found);
                }
            }
            Err(e) => log::warn!("Could not read file list {}: {}", list_path.display(), e),
        }
    }

    for path in paths {
        add_path(path, opts, &mut found);
    }

    let mut seen = HashSet::new();
    found.retain(|p| seen.insert(p.clone()));

    log::info!(
        "Scan complete in {:.2}s. Found {} images.",
        start_time.elapsed().as_secs_f64(),
        found.len()
    );
    found
}

fn read_file_list(list_path: &Path) -> io::Result<Vec<PathBuf>> {
    let reader = io::BufReader::new(fs::File::open(list_path)?);
    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            out.push(PathBuf::from(trimmed));
        }
    }
    Ok(out)
}

fn is_skipped_link(path: &Path, opts: ScanOptions) -> bool {
    !opts.follow_links
        && fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
}

fn add_path(path: &Path, opts: ScanOptions, dest: &mut Vec<PathBuf>) {
    if is_skipped_link(path, opts) {
        return;
    }
    if path.is_dir() {
        scan_dir(path, opts, dest);
    } else if path.is_file() && is_image_file(path) {
        dest.push(path.to_path_buf());
    } else {
        log::debug!("Skipping {}", path.display());
    }
}

fn scan_dir(dir: &Path, opts: ScanOptions, dest: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else { return };
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in entries.filter_map(|e| e.ok()) {
        let Ok(ft) = entry.file_type() else { continue };
        if ft.is_symlink() && !opts.follow_links {
            continue;
        }

        let p = entry.path();
        if p.is_file() && is_image_file(&p) {
            files.push(p);
        } else if opts.recursive && p.is_dir() {
            subdirs.push(p);
        }
    }

    files.sort();
    if !files.is_empty() {
        log::debug!("Scanning {:?}... ({} images)", dir, files.len());
    }
    dest.extend(files);

    if opts.recursive {
        subdirs.sort();
        for sub in subdirs {
            scan_dir(&sub, opts, dest);
        }
    }
}
