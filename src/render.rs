use thiserror::Error;
use tracing::debug;

use crate::Cell;
use crate::frame::DrawOp;
use crate::frame::Frame;
use crate::frame::Palette;
use crate::layout::Layout;
use crate::sink::FrameSink;
use crate::sink::SinkError;
use crate::viewport::Viewport;
use crate::viewport::ViewportError;
use crate::viewport::ViewportTracker;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Viewport error: {0}")]
    Viewport(#[from] ViewportError),

    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),
}

/// Draws sets of live cells, auto fitting the scale, and fans each frame out to its sinks.
pub struct Renderer {
    width: u32,
    height: u32,
    palette: Palette,
    tracker: ViewportTracker,
    sinks: Vec<Box<dyn FrameSink>>,

    /// Number of frames produced so far
    frames: u64,
}

impl Renderer {
    pub fn new(width: u32, height: u32, palette: Palette, margin: u32) -> Self {
        Self {
            width,
            height,
            palette,
            tracker: ViewportTracker::new(margin),
            sinks: Vec::new(),
            frames: 0,
        }
    }

    pub fn with_sink<S: FrameSink + 'static>(mut self, sink: S) -> Self {
        self.add_sink(Box::new(sink));
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn FrameSink>) {
        self.sinks.push(sink);
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Lay out the next frame without handing it to any sink.
    ///
    /// This advances the viewport damping, so it counts as a rendered frame.
    pub fn frame<'a, C>(&mut self, cells: C) -> Result<Frame, ViewportError>
    where
        C: IntoIterator<Item = &'a Cell> + Copy,
    {
        let viewport = self.tracker.compute(cells)?;
        let layout = Layout::new(&viewport, self.width, self.height);
        let side = layout.side();
        let color = self.palette.foreground;

        let mut ops = vec![DrawOp::Fill(self.palette.background)];
        ops.extend(cells.into_iter().map(|&cell| {
            let (x, y) = layout.place(cell);
            DrawOp::Square { x, y, side, color }
        }));

        let frame = Frame {
            index: self.frames,
            width: self.width,
            height: self.height,
            viewport,
            ops,
        };
        self.frames += 1;

        Ok(frame)
    }

    /// Draw `cells` to every sink and return the viewport used.
    pub fn draw<'a, C>(&mut self, cells: C) -> Result<Viewport, RenderError>
    where
        C: IntoIterator<Item = &'a Cell> + Copy,
    {
        let frame = self.frame(cells)?;

        debug!(
            index = frame.index,
            cells = frame.ops.len() - 1,
            viewport = ?frame.viewport,
            "frame"
        );

        for sink in self.sinks.iter_mut() {
            sink.on_frame(&frame)?;
        }

        Ok(frame.viewport)
    }

    /// Flush every sink. Call once after the last frame.
    pub fn finish(mut self) -> Result<(), RenderError> {
        for sink in self.sinks.iter_mut() {
            sink.finish()?;
        }

        Ok(())
    }
}
