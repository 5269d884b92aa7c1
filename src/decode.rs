use std::path::Path;
use std::time::Duration;

use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Capabilities the residency core needs from the outside world
// ---------------------------------------------------------------------------

/// A decoded, renderable resource. Dropping it releases its memory.
pub trait Resource {
    /// Pixel dimensions of the decoded resource.
    fn dimensions(&self) -> (u32, u32);
}

/// Thumbnail plus the metadata of the source file it was made from.
pub struct Thumbnail<R> {
    pub resource: R,
    /// Dimensions of the original image, not of the thumbnail.
    pub width: u32,
    pub height: u32,
    pub byte_size: u64,
}

/// An ordered frame set with a playback rate and a cursor.
pub struct Animation<R> {
    frames: Vec<R>,
    fps: u32,
    cursor: usize,
    /// Time shown on the current frame, in seconds.
    elapsed: f64,
}

impl<R> Animation<R> {
    /// Returns `None` when `frames` is empty.
    pub fn new(frames: Vec<R>, fps: u32) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            frames,
            fps: fps.max(1),
            cursor: 0,
            elapsed: 0.0,
        })
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_frame(&self) -> &R {
        &self.frames[self.cursor]
    }

    /// Move to the next frame, wrapping at the end.
    pub fn advance(&mut self) {
        self.cursor = (self.cursor + 1) % self.frames.len();
    }

    /// Let `dt` of wall time pass and step the cursor by every frame period
    /// that completed. Returns the number of frames stepped.
    pub fn play(&mut self, dt: Duration) -> usize {
        let period = 1.0 / self.fps as f64;
        self.elapsed += dt.as_secs_f64();
        let steps = (self.elapsed / period) as usize;
        self.elapsed -= steps as f64 * period;
        for _ in 0..steps % self.frames.len() {
            self.advance();
        }
        steps
    }
}

/// Decode primitives. Every call runs synchronously inside the render tick.
pub trait MediaDecoder {
    type Resource: Resource;

    fn decode_full(&self, path: &Path) -> Result<Self::Resource, DecodeError>;

    fn decode_thumbnail(
        &self,
        path: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<Thumbnail<Self::Resource>, DecodeError>;

    /// `Ok(None)` means the file is not an animation and a static decode
    /// should be tried instead.
    fn decode_animation(
        &self,
        path: &Path,
    ) -> Result<Option<Animation<Self::Resource>>, DecodeError>;

    /// Pixel dimensions read from the file header, without decoding pixels.
    fn decode_dimensions(&self, path: &Path) -> Result<(u32, u32), DecodeError>;

    fn file_byte_size(&self, path: &Path) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn animation_cursor_wraps() {
        let mut anim = Animation::new(vec!['a', 'b', 'c'], 10).unwrap();
        assert_eq!(*anim.current_frame(), 'a');
        anim.advance();
        anim.advance();
        assert_eq!(*anim.current_frame(), 'c');
        anim.advance();
        assert_eq!(anim.cursor(), 0);
    }

    #[test]
    fn playback_follows_wall_time() {
        let mut anim = Animation::new(vec![0u8, 1, 2, 3], 10).unwrap();
        assert_eq!(anim.play(Duration::from_millis(40)), 0);
        assert_eq!(anim.cursor(), 0);
        assert_eq!(anim.play(Duration::from_millis(70)), 1);
        assert_eq!(anim.cursor(), 1);

        // many short redraws inside one period do not speed playback up
        for _ in 0..8 {
            assert_eq!(anim.play(Duration::from_millis(10)), 0);
        }
        assert_eq!(anim.cursor(), 1);

        // a long stall wraps instead of looping frame by frame
        assert_eq!(anim.play(Duration::from_millis(1000)), 10);
        assert_eq!(anim.cursor(), 3);
    }

    #[test]
    fn animation_needs_frames() {
        assert!(Animation::<u8>::new(Vec::new(), 24).is_none());
        assert_eq!(Animation::new(vec![1u8], 0).unwrap().fps(), 1);
    }
}
