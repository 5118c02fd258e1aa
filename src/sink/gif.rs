use std::fs::File;
use std::io::BufWriter;
use std::mem;
use std::path::Path;
use std::path::PathBuf;

use image::Delay;
use image::Frame as ImageFrame;
use image::Rgba;
use image::RgbaImage;
use image::codecs::gif::GifEncoder;
use image::codecs::gif::Repeat;
use tracing::info;

use crate::frame::DrawOp;
use crate::frame::Frame;
use crate::frame::Rgb;
use crate::sink::FrameSink;
use crate::sink::SinkError;
use crate::sink::clip_square;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GifOptions {
    /// Time each frame stays on screen, in milliseconds
    pub delay_ms: u32,

    /// How many times the animation plays. `None` loops forever.
    pub repeat: Option<u16>,

    /// Color quantization speed, `1` (best quality) to `30` (fastest)
    pub speed: i32,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            delay_ms: 100,
            repeat: None,
            speed: 10,
        }
    }
}

/// Records frames in memory and writes them out as an animated GIF on `finish`.
pub struct GifRecorder {
    path: PathBuf,
    options: GifOptions,
    images: Vec<RgbaImage>,
}

impl GifRecorder {
    pub fn new(path: impl AsRef<Path>, options: GifOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            options,
            images: Vec::new(),
        }
    }

    /// Number of frames waiting to be encoded
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    fn encode(&self, images: Vec<RgbaImage>) -> Result<(), SinkError> {
        let file = File::create(&self.path)?;
        let mut encoder =
            GifEncoder::new_with_speed(BufWriter::new(file), self.options.speed.clamp(1, 30));

        let repeat = match self.options.repeat {
            Some(n) => Repeat::Finite(n),
            None => Repeat::Infinite,
        };
        encoder.set_repeat(repeat)?;

        let delay = Delay::from_numer_denom_ms(self.options.delay_ms, 1);
        let frames = images
            .into_iter()
            .map(|image| ImageFrame::from_parts(image, 0, 0, delay));

        encoder.encode_frames(frames)?;

        Ok(())
    }
}

fn rgba(Rgb(r, g, b): Rgb) -> Rgba<u8> {
    Rgba([r, g, b, 0xFF])
}

/// Rasterize `frame` into an RGBA image.
pub fn rasterize(frame: &Frame) -> RgbaImage {
    let mut image = RgbaImage::new(frame.width, frame.height);

    for op in &frame.ops {
        match *op {
            DrawOp::Fill(color) => {
                let px = rgba(color);
                image.pixels_mut().for_each(|p| *p = px);
            }
            DrawOp::Square { x, y, side, color } => {
                let Some((xs, ys)) = clip_square(x, y, side, frame.width, frame.height) else {
                    continue;
                };

                let px = rgba(color);
                for y in ys {
                    for x in xs.clone() {
                        image.put_pixel(x, y, px);
                    }
                }
            }
        }
    }

    image
}

impl FrameSink for GifRecorder {
    fn on_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        self.images.push(rasterize(frame));

        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.is_empty() {
            return Err(SinkError::NoFrames);
        }

        let images = mem::take(&mut self.images);
        let n = images.len();

        self.encode(images)?;

        info!(path = %self.path.display(), frames = n, "wrote animation");

        Ok(())
    }
}
