use crate::Cell;
use crate::viewport::Viewport;

/// Maps grid cells onto a `width x height` pixel canvas so that the whole viewport fits.
///
/// The scale is uniform: whichever axis is tighter dictates the zoom, and the viewport is centered
/// on the canvas along the other one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    cell_size: f64,

    // viewport center, in grid space
    center: (f64, f64),

    // canvas center, in pixels
    canvas_center: (f64, f64),
}

impl Layout {
    pub fn new(viewport: &Viewport, width: u32, height: u32) -> Self {
        let (width, height) = (f64::from(width), f64::from(height));

        let x_cell_size = width / viewport.width() as f64;
        let y_cell_size = height / viewport.height() as f64;

        Self {
            cell_size: x_cell_size.min(y_cell_size),
            center: viewport.center(),
            canvas_center: (width / 2f64, height / 2f64),
        }
    }

    /// Size of a cell in pixels. Can be below one when zoomed far out.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Side of the square drawn for each cell. Never zero, so every live cell stays visible.
    pub fn side(&self) -> u32 {
        if self.cell_size > 1f64 {
            self.cell_size as u32
        } else {
            1
        }
    }

    /// Top left pixel of `cell`'s square, truncated toward zero.
    pub fn place(&self, (x, y): Cell) -> (i32, i32) {
        let px = self.canvas_center.0 + (x as f64 - self.center.0) * self.cell_size;
        let py = self.canvas_center.1 + (y as f64 - self.center.1) * self.cell_size;

        (px as i32, py as i32)
    }
}
