use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::decode::{Animation, Resource, Thumbnail};
use crate::error::{DecodeError, IndexError};

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Full-resolution slot of an item. An item is either a static image or an
/// animation, never both.
pub enum FullSlot<R> {
    Absent,
    Static(R),
    Animated(Animation<R>),
}

impl<R> FullSlot<R> {
    pub fn is_present(&self) -> bool {
        !matches!(self, FullSlot::Absent)
    }
}

pub struct Item<R> {
    path: PathBuf,
    dimensions: Option<(u32, u32)>,
    byte_size: Option<u64>,
    thumbnail: Option<R>,
    full: FullSlot<R>,
}

impl<R> Item<R> {
    fn new(path: PathBuf) -> Self {
        Self {
            path,
            dimensions: None,
            byte_size: None,
            thumbnail: None,
            full: FullSlot::Absent,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Known once a thumbnail or full image has been decoded.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }

    pub fn byte_size(&self) -> Option<u64> {
        self.byte_size
    }

    /// Height over width, 1.0 while the dimensions are unknown.
    pub fn aspect_ratio(&self) -> f32 {
        match self.dimensions {
            Some((w, h)) if w > 0 && h > 0 => h as f32 / w as f32,
            _ => 1.0,
        }
    }

    pub fn thumbnail(&self) -> Option<&R> {
        self.thumbnail.as_ref()
    }

    pub fn full(&self) -> &FullSlot<R> {
        &self.full
    }

    pub fn animation(&self) -> Option<&Animation<R>> {
        match &self.full {
            FullSlot::Animated(anim) => Some(anim),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Fixed-length ordered sequence of items. The `set_*` and `clear_*` methods
/// are the only places a resource slot changes.
pub struct MediaCollection<R> {
    items: Vec<Item<R>>,
}

impl<R: Resource> MediaCollection<R> {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            items: paths.into_iter().map(Item::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Item<R>, IndexError> {
        let len = self.items.len();
        self.items.get(index).ok_or(IndexError { index, len })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Item<R>, IndexError> {
        let len = self.items.len();
        self.items.get_mut(index).ok_or(IndexError { index, len })
    }

    /// Record dimensions read from the file header. A failed read leaves
    /// them unknown. Returns whether they are now known.
    pub fn set_dimensions(
        &mut self,
        index: usize,
        probed: Result<(u32, u32), DecodeError>,
    ) -> Result<bool, IndexError> {
        let item = self.get_mut(index)?;
        let Ok(dimensions) = probed else {
            return Ok(false);
        };
        item.dimensions = Some(dimensions);
        Ok(true)
    }

    /// Store a static full image. A failed decode leaves the slot untouched.
    /// Returns whether the slot is now populated.
    pub fn set_full_image(
        &mut self,
        index: usize,
        decoded: Result<R, DecodeError>,
        byte_size: u64,
    ) -> Result<bool, IndexError> {
        let item = self.get_mut(index)?;
        let Ok(resource) = decoded else {
            return Ok(false);
        };
        item.dimensions = Some(resource.dimensions());
        item.byte_size = Some(byte_size);
        item.full = FullSlot::Static(resource);
        Ok(true)
    }

    pub fn set_animation(
        &mut self,
        index: usize,
        decoded: Result<Animation<R>, DecodeError>,
        byte_size: u64,
    ) -> Result<bool, IndexError> {
        let item = self.get_mut(index)?;
        let Ok(animation) = decoded else {
            return Ok(false);
        };
        item.dimensions = Some(animation.current_frame().dimensions());
        item.byte_size = Some(byte_size);
        item.full = FullSlot::Animated(animation);
        Ok(true)
    }

    pub fn set_thumbnail(
        &mut self,
        index: usize,
        decoded: Result<Thumbnail<R>, DecodeError>,
    ) -> Result<bool, IndexError> {
        let item = self.get_mut(index)?;
        let Ok(thumb) = decoded else {
            return Ok(false);
        };
        item.dimensions = Some((thumb.width, thumb.height));
        item.byte_size = Some(thumb.byte_size);
        item.thumbnail = Some(thumb.resource);
        Ok(true)
    }

    /// Drop a static full image. Returns whether anything was released.
    pub fn clear_full_image(&mut self, index: usize) -> Result<bool, IndexError> {
        let item = self.get_mut(index)?;
        if matches!(item.full, FullSlot::Static(_)) {
            item.full = FullSlot::Absent;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn clear_animation(&mut self, index: usize) -> Result<bool, IndexError> {
        let item = self.get_mut(index)?;
        if matches!(item.full, FullSlot::Animated(_)) {
            item.full = FullSlot::Absent;
            return Ok(true);
        }
        Ok(false)
    }

    /// Release whatever the full-resolution slot holds.
    pub fn clear_full(&mut self, index: usize) -> Result<bool, IndexError> {
        let image = self.clear_full_image(index)?;
        let animation = self.clear_animation(index)?;
        Ok(image || animation)
    }

    pub fn resident_thumbnail(&self, index: usize) -> Option<&R> {
        self.items.get(index)?.thumbnail()
    }

    pub fn resident_full(&self, index: usize) -> Option<&R> {
        match self.items.get(index)?.full() {
            FullSlot::Static(resource) => Some(resource),
            _ => None,
        }
    }

    pub fn resident_animation_frame(&self, index: usize) -> Option<&R> {
        self.items
            .get(index)?
            .animation()
            .map(|anim| anim.current_frame())
    }

    /// Play a resident animation for `dt` of wall time. Returns its fps.
    pub fn play_animation(&mut self, index: usize, dt: Duration) -> Option<u32> {
        match &mut self.items.get_mut(index)?.full {
            FullSlot::Animated(anim) => {
                anim.play(dt);
                Some(anim.fps())
            }
            _ => None,
        }
    }

    /// Sum of file sizes of items whose full-resolution slot is populated.
    pub fn resident_bytes(&self) -> u64 {
        self.items
            .iter()
            .filter(|item| item.full.is_present())
            .filter_map(|item| item.byte_size)
            .sum()
    }
}
