use std::io::Write;

use crossterm::QueueableCommand;
use crossterm::cursor;
use crossterm::style;
use crossterm::style::Color;
use crossterm::terminal;
use tracing::debug;

use crate::frame::DrawOp;
use crate::frame::Frame;
use crate::frame::Rgb;
use crate::sink::FrameSink;
use crate::sink::SinkError;
use crate::sink::clip_rect;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

const TITLE: &str = "Life Game";

/// A monochrome canvas of braille dots, two columns and four rows per character.
pub struct BrailleCanvas {
    /// The dot buffer
    db: Vec<bool>,

    /// Codepoints, one per character
    cp: Vec<u32>,

    /// Width in dots
    w: u32,

    /// Height in dots
    h: u32,
}

impl BrailleCanvas {
    /// A canvas covering `cols x rows` characters.
    pub fn new(cols: u16, rows: u16) -> Self {
        let (w, h) = (u32::from(cols) * 2, u32::from(rows) * 4);

        Self {
            db: vec![false; (w * h) as usize],
            cp: vec![BRAILLE_EMPTY; usize::from(cols) * usize::from(rows)],
            w,
            h,
        }
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn clear(&mut self) {
        self.db.fill(false);
    }

    /// Turns on every dot in the given ranges. Ranges must lie within the canvas.
    pub fn fill(&mut self, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) {
        for y in ys {
            let row = (y * self.w) as usize;
            self.db[row + xs.start as usize..row + xs.end as usize].fill(true);
        }
    }

    /// The canvas as lines of braille characters, one string per text row.
    pub fn lines(&mut self) -> Vec<String> {
        let bw = self.w.div_ceil(2) as usize;

        self.cp.fill(BRAILLE_EMPTY);

        for (n, &on) in self.db.iter().enumerate() {
            if !on {
                continue;
            }

            let (x, y) = (n as u32 % self.w, n as u32 / self.w);
            self.cp[(y / 4) as usize * bw + (x / 2) as usize] += Self::dot_value(x, y);
        }

        self.cp
            .chunks(bw.max(1))
            .map(|row| {
                row.iter()
                    .map(|&c| char::from_u32(c).unwrap_or(' '))
                    .collect()
            })
            .collect()
    }

    fn dot_value(x: u32, y: u32) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

fn color(Rgb(r, g, b): Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Shows frames live on a terminal, drawn with braille dots.
///
/// Frames are scaled down onto the dot grid, and every square keeps at least one dot.
pub struct TerminalSink<W: Write> {
    out: W,
    canvas: BrailleCanvas,
    started: bool,
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W, cols: u16, rows: u16) -> Self {
        Self {
            out,
            canvas: BrailleCanvas::new(cols, rows),
            started: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Scale the frame's squares onto the dot grid.
    fn plot(&mut self, frame: &Frame) -> (Option<Rgb>, Option<Rgb>) {
        let (w, h) = (self.canvas.width(), self.canvas.height());
        let fw = f64::from(w) / f64::from(frame.width.max(1));
        let fh = f64::from(h) / f64::from(frame.height.max(1));

        let mut bg = None;
        let mut fg = None;

        self.canvas.clear();

        for op in &frame.ops {
            match *op {
                DrawOp::Fill(c) => {
                    self.canvas.clear();
                    bg = Some(c);
                }
                DrawOp::Square { x, y, side, color } => {
                    fg.get_or_insert(color);

                    let (x, y, side) = (f64::from(x), f64::from(y), f64::from(side));
                    let x0 = (x * fw).floor();
                    let y0 = (y * fh).floor();

                    // at least one dot
                    let dw = (((x + side) * fw - x0).ceil() as u32).max(1);
                    let dh = (((y + side) * fh - y0).ceil() as u32).max(1);

                    if let Some((xs, ys)) = clip_rect(x0 as i32, y0 as i32, dw, dh, w, h) {
                        self.canvas.fill(xs, ys);
                    }
                }
            }
        }

        (bg, fg)
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    fn on_frame(&mut self, frame: &Frame) -> Result<(), SinkError> {
        if !self.started {
            debug!(
                dots = ?(self.canvas.width(), self.canvas.height()),
                "starting terminal display"
            );

            self.out
                .queue(terminal::SetTitle(TITLE))?
                .queue(cursor::Hide)?
                .queue(terminal::Clear(terminal::ClearType::All))?;
            self.started = true;
        }

        let (bg, fg) = self.plot(frame);

        if let Some(bg) = bg {
            self.out.queue(style::SetBackgroundColor(color(bg)))?;
        }
        if let Some(fg) = fg {
            self.out.queue(style::SetForegroundColor(color(fg)))?;
        }

        self.out.queue(cursor::MoveTo(0, 0))?;
        for line in self.canvas.lines() {
            self.out
                .queue(style::Print(line))?
                .queue(cursor::MoveToNextLine(1))?;
        }

        self.out.flush()?;

        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if self.started {
            self.out
                .queue(style::ResetColor)?
                .queue(cursor::Show)?;
            self.out.flush()?;
        }

        Ok(())
    }
}
