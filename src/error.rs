use std::path::PathBuf;
use thiserror::Error;

/// A file could not be turned into a resident resource.
///
/// Never fatal: the slot stays absent and the item is tried again on a later
/// tick in which it is still relevant.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Image(#[from] image::ImageError),

    #[error("{} has no decodable frames", .0.display())]
    NoFrames(PathBuf),
}

/// An index outside `[0, len)` reached the collection. Indicates a geometry
/// bug upstream.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("index {index} out of range for collection of {len} items")]
pub struct IndexError {
    pub index: usize,
    pub len: usize,
}
