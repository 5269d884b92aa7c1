use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat, ImageReader};
use std::fs;
use std::io::BufReader;
use std::path::Path;

use crate::config::DEFAULT_FPS;
use crate::decode::{Animation, MediaDecoder, Resource, Thumbnail};
use crate::error::DecodeError;

// ---------------------------------------------------------------------------
// Decoded image data (RGBA8, ready to blit)
// ---------------------------------------------------------------------------

pub struct DecodedImage {
    pub rgba_bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl DecodedImage {
    fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            rgba_bytes: img.to_rgba8().into_raw(),
            width,
            height,
        }
    }

    pub fn mem_size(&self) -> u64 {
        self.rgba_bytes.len() as u64
    }
}

impl Resource for DecodedImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// GIF frame delay in milliseconds to a playback rate, clamped to 1..=100.
fn fps_from_delay(numer_ms: u32, denom: u32) -> u32 {
    if numer_ms == 0 || denom == 0 {
        return DEFAULT_FPS;
    }
    let fps = 1000.0 * denom as f64 / numer_ms as f64;
    fps.clamp(1.0, 100.0).round() as u32
}

// ---------------------------------------------------------------------------
// Decoder backed by the `image` crate
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageLoader;

impl MediaDecoder for ImageLoader {
    type Resource = DecodedImage;

    fn decode_full(&self, path: &Path) -> Result<DecodedImage, DecodeError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(DecodedImage::from_dynamic(img))
    }

    fn decode_thumbnail(
        &self,
        path: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<Thumbnail<DecodedImage>, DecodeError> {
        let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        let (width, height) = img.dimensions();
        Ok(Thumbnail {
            resource: DecodedImage::from_dynamic(img.thumbnail(max_width, max_height)),
            width,
            height,
            byte_size: self.file_byte_size(path),
        })
    }

    fn decode_animation(
        &self,
        path: &Path,
    ) -> Result<Option<Animation<DecodedImage>>, DecodeError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        if reader.format() != Some(ImageFormat::Gif) {
            return Ok(None);
        }

        let decoder = GifDecoder::new(BufReader::new(fs::File::open(path)?))?;
        let frames = decoder.into_frames().collect_frames()?;
        let fps = frames
            .first()
            .map(|f| {
                let (numer, denom) = f.delay().numer_denom_ms();
                fps_from_delay(numer, denom)
            })
            .unwrap_or(DEFAULT_FPS);

        let frames: Vec<DecodedImage> = frames
            .into_iter()
            .map(|f| DecodedImage::from_dynamic(DynamicImage::ImageRgba8(f.into_buffer())))
            .collect();

        Animation::new(frames, fps)
            .map(Some)
            .ok_or_else(|| DecodeError::NoFrames(path.to_path_buf()))
    }

    fn decode_dimensions(&self, path: &Path) -> Result<(u32, u32), DecodeError> {
        Ok(ImageReader::open(path)?.with_guessed_format()?.into_dimensions()?)
    }

    fn file_byte_size(&self, path: &Path) -> u64 {
        fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }
}
