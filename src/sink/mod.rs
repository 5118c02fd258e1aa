use std::io;
use std::ops::Range;

use thiserror::Error;

use crate::frame::Frame;

pub mod gif;
pub mod terminal;

pub use self::gif::GifOptions;
pub use self::gif::GifRecorder;
pub use self::terminal::TerminalSink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode image: {0}")]
    Encode(#[from] image::ImageError),

    #[error("No frames were recorded")]
    NoFrames,
}

/// Anything that consumes rendered frames: a live display, a recording, ...
pub trait FrameSink {
    /// Called once per frame, in frame order.
    fn on_frame(&mut self, frame: &Frame) -> Result<(), SinkError>;

    /// Called once after the last frame.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Clips a square at `(x, y)` to a `width x height` canvas, returning the covered pixel ranges.
pub(crate) fn clip_square(x: i32, y: i32, side: u32, width: u32, height: u32) -> Option<Clipped> {
    clip_rect(x, y, side, side, width, height)
}

type Clipped = (Range<u32>, Range<u32>);

/// Like `clip_square`, for a `w x h` rectangle.
pub(crate) fn clip_rect(x: i32, y: i32, w: u32, h: u32, width: u32, height: u32) -> Option<Clipped> {
    let clip = |start: i32, len: u32, bound: u32| {
        let start = i64::from(start);
        let lo = start.clamp(0, i64::from(bound));
        let hi = (start + i64::from(len)).clamp(0, i64::from(bound));

        (lo < hi).then(|| lo as u32..hi as u32)
    };

    Some((clip(x, w, width)?, clip(y, h, height)?))
}
