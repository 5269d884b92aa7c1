use std::ops::Range;

use crate::collection::MediaCollection;
use crate::decode::MediaDecoder;
use crate::error::IndexError;

/// Result of one grid tick that reached the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailLoad {
    pub index: usize,
    pub resident: bool,
}

/// Grid-mode loader. Decodes at most one thumbnail per tick, picking the
/// unloaded entry nearest to where the previous scan left off.
pub struct ThumbnailFrontierLoader {
    loaded: Vec<bool>,
    scan_cursor: Option<usize>,
    last_current: Option<usize>,
    thumbnail_size: u32,
}

impl ThumbnailFrontierLoader {
    pub fn new(len: usize, thumbnail_size: u32) -> Self {
        Self {
            loaded: vec![false; len],
            scan_cursor: None,
            last_current: None,
            thumbnail_size,
        }
    }

    pub fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }

    pub fn is_loaded(&self, index: usize) -> bool {
        self.loaded.get(index).copied().unwrap_or(false)
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded.iter().filter(|&&l| l).count()
    }

    /// Forget every loaded marker so the whole collection is visited again,
    /// using `thumbnail_size` from now on. Resident thumbnails stay until
    /// they are overwritten.
    pub fn reset(&mut self, thumbnail_size: u32) {
        self.loaded.fill(false);
        self.scan_cursor = None;
        self.last_current = None;
        self.thumbnail_size = thumbnail_size;
    }

    /// Pick the next index to decode for `frontier`, updating the
    /// last-seen selection.
    fn find_target(&mut self, current: usize, frontier: Range<usize>) -> Option<usize> {
        let len = self.loaded.len();
        let resume = if self.last_current == Some(current) {
            self.scan_cursor.unwrap_or(current)
        } else {
            current
        };
        self.last_current = Some(current);

        if len == 0 || frontier.start >= len {
            return None;
        }
        let resume = resume.min(len - 1);
        let end = frontier.end.min(len);

        (resume..end)
            .find(|&i| !self.loaded[i])
            .or_else(|| (frontier.start..=resume).rev().find(|&i| !self.loaded[i]))
    }

    /// Run one grid tick. Returns the decode attempt, if there was one.
    pub fn tick<D: MediaDecoder>(
        &mut self,
        collection: &mut MediaCollection<D::Resource>,
        decoder: &D,
        current: usize,
        frontier: Range<usize>,
    ) -> Result<Option<ThumbnailLoad>, IndexError> {
        if collection.is_empty() {
            return Ok(None);
        }
        debug_assert_eq!(self.loaded.len(), collection.len());

        let Some(target) = self.find_target(current, frontier) else {
            return Ok(None);
        };
        let index = target.min(self.loaded.len() - 1);
        if self.loaded[index] {
            return Ok(None);
        }

        let path = collection.get(index)?.path().to_path_buf();
        let decoded = decoder.decode_thumbnail(&path, self.thumbnail_size, self.thumbnail_size);
        if let Err(ref e) = decoded {
            log::debug!("[grid] thumbnail {} failed: {}", path.display(), e);
        }
        let resident = collection.set_thumbnail(index, decoded)?;

        self.loaded[index] = true;
        self.scan_cursor = Some(index);
        Ok(Some(ThumbnailLoad { index, resident }))
    }
}
