//! In-memory decoder for unit tests. Counts live resources so tests can
//! observe release and double-free behaviour.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::collection::MediaCollection;
use crate::decode::{Animation, MediaDecoder, Resource, Thumbnail};
use crate::error::DecodeError;

pub struct FakeFrame {
    dims: (u32, u32),
    live: Rc<Cell<isize>>,
}

impl Resource for FakeFrame {
    fn dimensions(&self) -> (u32, u32) {
        self.dims
    }
}

impl Drop for FakeFrame {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Full(usize),
    Thumbnail(usize),
    Animation(usize),
    Dimensions(usize),
}

pub fn path_for(index: usize) -> PathBuf {
    PathBuf::from(format!("img{index:04}.png"))
}

fn index_of(path: &Path) -> usize {
    path.file_stem()
        .and_then(|s| s.to_str())
        .and_then(|s| s.strip_prefix("img"))
        .and_then(|s| s.parse().ok())
        .unwrap_or(usize::MAX)
}

pub fn collection_of(len: usize) -> MediaCollection<FakeFrame> {
    MediaCollection::new((0..len).map(path_for).collect())
}

pub struct FakeDecoder {
    live: Rc<Cell<isize>>,
    calls: RefCell<Vec<Call>>,
    failing: HashSet<usize>,
    animated: HashSet<usize>,
}

impl FakeDecoder {
    pub const ANIMATION_FRAMES: usize = 2;
    pub const ANIMATION_FPS: u32 = 12;
    pub const DIMS: (u32, u32) = (400, 300);

    pub fn new() -> Self {
        Self {
            live: Rc::new(Cell::new(0)),
            calls: RefCell::new(Vec::new()),
            failing: HashSet::new(),
            animated: HashSet::new(),
        }
    }

    pub fn failing(mut self, indices: &[usize]) -> Self {
        self.failing.extend(indices);
        self
    }

    pub fn animated(mut self, indices: &[usize]) -> Self {
        self.animated.extend(indices);
        self
    }

    pub fn set_failing(&mut self, indices: &[usize]) {
        self.failing = indices.iter().copied().collect();
    }

    /// Resources currently alive.
    pub fn live(&self) -> isize {
        self.live.get()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    fn frame(&self) -> FakeFrame {
        self.live.set(self.live.get() + 1);
        FakeFrame {
            dims: Self::DIMS,
            live: Rc::clone(&self.live),
        }
    }

    fn check(&self, index: usize) -> Result<(), DecodeError> {
        if self.failing.contains(&index) {
            return Err(DecodeError::NoFrames(path_for(index)));
        }
        Ok(())
    }
}

impl MediaDecoder for FakeDecoder {
    type Resource = FakeFrame;

    fn decode_full(&self, path: &Path) -> Result<FakeFrame, DecodeError> {
        let index = index_of(path);
        self.calls.borrow_mut().push(Call::Full(index));
        self.check(index)?;
        Ok(self.frame())
    }

    fn decode_thumbnail(
        &self,
        path: &Path,
        _max_width: u32,
        _max_height: u32,
    ) -> Result<Thumbnail<FakeFrame>, DecodeError> {
        let index = index_of(path);
        self.calls.borrow_mut().push(Call::Thumbnail(index));
        self.check(index)?;
        Ok(Thumbnail {
            resource: self.frame(),
            width: Self::DIMS.0,
            height: Self::DIMS.1,
            byte_size: 1000 + index as u64,
        })
    }

    fn decode_animation(&self, path: &Path) -> Result<Option<Animation<FakeFrame>>, DecodeError> {
        let index = index_of(path);
        self.calls.borrow_mut().push(Call::Animation(index));
        if !self.animated.contains(&index) {
            return Ok(None);
        }
        self.check(index)?;
        let frames = (0..Self::ANIMATION_FRAMES).map(|_| self.frame()).collect();
        Animation::new(frames, Self::ANIMATION_FPS)
            .map(Some)
            .ok_or_else(|| DecodeError::NoFrames(path.to_path_buf()))
    }

    fn decode_dimensions(&self, path: &Path) -> Result<(u32, u32), DecodeError> {
        let index = index_of(path);
        self.calls.borrow_mut().push(Call::Dimensions(index));
        self.check(index)?;
        Ok(Self::DIMS)
    }

    fn file_byte_size(&self, path: &Path) -> u64 {
        1000 + index_of(path) as u64
    }
}
