//! Residency cache for a three-mode image browser: thumbnail grid, single
//! viewer and contiguous vertical scroll.
//!
//! Every render tick, [`LoaderPolicy::tick`] decides which decoded resources
//! must be in memory for the current viewport, loads them with bounded work
//! and releases the ones that scrolled away.

pub mod collection;
pub mod config;
pub mod decode;
pub mod error;
pub mod files;
pub mod frontier;
pub mod geometry;
pub mod layout;
pub mod loader;
pub mod policy;
pub mod residency;
pub mod scroll;
pub mod selection;

#[cfg(test)]
pub(crate) mod testing;

pub use collection::{FullSlot, Item, MediaCollection};
pub use config::Settings;
pub use decode::{Animation, MediaDecoder, Resource, Thumbnail};
pub use error::{DecodeError, IndexError};
pub use geometry::{GridPage, HeightFit, PresentationMode, ViewportGeometry};
pub use loader::{DecodedImage, ImageLoader};
pub use policy::{LoaderPolicy, TickReport};
pub use selection::Selection;
