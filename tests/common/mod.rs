#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use ivgrid::{Animation, DecodeError, MediaCollection, MediaDecoder, Resource, Thumbnail};

/// Resource that reports its own release.
pub struct Frame {
    live: Rc<Cell<usize>>,
}

impl Resource for Frame {
    fn dimensions(&self) -> (u32, u32) {
        (640, 480)
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

/// Decoder over synthetic paths `n.png` that records which indices it was
/// asked to decode.
#[derive(Default)]
pub struct CountingDecoder {
    live: Rc<Cell<usize>>,
    pub thumbnails: RefCell<Vec<usize>>,
    pub fulls: RefCell<Vec<usize>>,
}

impl CountingDecoder {
    pub fn live(&self) -> usize {
        self.live.get()
    }

    fn frame(&self) -> Frame {
        self.live.set(self.live.get() + 1);
        Frame { live: Rc::clone(&self.live) }
    }
}

fn index_of(path: &Path) -> usize {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.parse().ok())
        .unwrap_or(usize::MAX)
}

impl MediaDecoder for CountingDecoder {
    type Resource = Frame;

    fn decode_full(&self, path: &Path) -> Result<Frame, DecodeError> {
        self.fulls.borrow_mut().push(index_of(path));
        Ok(self.frame())
    }

    fn decode_thumbnail(
        &self,
        path: &Path,
        _w: u32,
        _h: u32,
    ) -> Result<Thumbnail<Frame>, DecodeError> {
        self.thumbnails.borrow_mut().push(index_of(path));
        Ok(Thumbnail {
            resource: self.frame(),
            width: 640,
            height: 480,
            byte_size: 2048,
        })
    }

    fn decode_animation(&self, _path: &Path) -> Result<Option<Animation<Frame>>, DecodeError> {
        Ok(None)
    }

    fn decode_dimensions(&self, _path: &Path) -> Result<(u32, u32), DecodeError> {
        Ok((640, 480))
    }

    fn file_byte_size(&self, _path: &Path) -> u64 {
        2048
    }
}

pub fn collection(len: usize) -> MediaCollection<Frame> {
    MediaCollection::new((0..len).map(|i| PathBuf::from(format!("{i}.png"))).collect())
}
