use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    #[error("Expected three comma separated components, got \"{0}\"")]
    Components(String),

    #[error("Invalid color component \"{0}\", expected 0 to 255")]
    Component(String),
}

/// Parses `r,g,b`, e.g. `200,200,200`.
impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();

        let [r, g, b] = parts[..] else {
            return Err(ColorError::Components(s.to_string()));
        };

        let component = |c: &str| {
            c.parse::<u8>()
                .map_err(|_| ColorError::Component(c.to_string()))
        };

        Ok(Rgb(component(r)?, component(g)?, component(b)?))
    }
}

/// The two colors of a frame: dead space and live cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb(200, 200, 200),
            foreground: Rgb(0, 0, 0),
        }
    }
}

/// A single drawing instruction, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawOp {
    /// Paint the whole canvas
    Fill(Rgb),

    /// Paint a `side x side` square with its top left corner at `(x, y)`. May hang off the canvas.
    Square { x: i32, y: i32, side: u32, color: Rgb },
}

/// Everything needed to draw one frame. Built once per generation and handed to every sink.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position of this frame in the sequence, starting at `0`
    pub index: u64,

    pub width: u32,
    pub height: u32,

    /// The viewport the frame was laid out with
    pub viewport: Viewport,

    /// Drawing instructions, to be applied in order
    pub ops: Vec<DrawOp>,
}

impl Frame {
    /// The color of the first `Fill`, which is what the canvas gets cleared to.
    pub fn background(&self) -> Option<Rgb> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Fill(c) => Some(*c),
            _ => None,
        })
    }

    pub fn squares(&self) -> impl Iterator<Item = (i32, i32, u32, Rgb)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            DrawOp::Square { x, y, side, color } => Some((x, y, side, color)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rgb() {
        assert_eq!("200,200,200".parse(), Ok(Rgb(200, 200, 200)));
        assert_eq!(" 1, 2 ,3".parse(), Ok(Rgb(1, 2, 3)));
        assert_eq!(Rgb(4, 5, 6).to_string(), "4,5,6");
    }

    #[test]
    fn parse_rgb_errors() {
        assert_eq!(
            "1,2".parse::<Rgb>(),
            Err(ColorError::Components("1,2".to_string()))
        );
        assert_eq!(
            "1,2,256".parse::<Rgb>(),
            Err(ColorError::Component("256".to_string()))
        );
    }
}
