use thiserror::Error;
use tracing::trace;

use crate::Cell;
use crate::Coord;
use crate::bound::DampedBound;
use crate::bound::MaxBound;
use crate::bound::MinBound;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportError {
    #[error("Cannot fit a viewport around an empty set of cells")]
    InvalidInput,
}

/// The region of the grid to show, as a half-open box `[x_min, x_max) x [y_min, y_max)`.
///
/// The exclusive edges saturate at [`Coord::MAX`]. An edge sitting there is treated as inclusive,
/// so a cell in the last row or column is still inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x_min: Coord,
    pub y_min: Coord,
    pub x_max: Coord,
    pub y_max: Coord,
}

impl Viewport {
    /// Width in cells. Always positive.
    pub fn width(&self) -> Coord {
        span(self.x_min, self.x_max)
    }

    /// Height in cells. Always positive.
    pub fn height(&self) -> Coord {
        span(self.y_min, self.y_max)
    }

    /// Center of the box, in grid space.
    pub fn center(&self) -> (f64, f64) {
        (
            (self.x_min as f64 + self.x_max as f64) / 2f64,
            (self.y_min as f64 + self.y_max as f64) / 2f64,
        )
    }

    pub fn contains(&self, (x, y): Cell) -> bool {
        within(self.x_min, x, self.x_max) && within(self.y_min, y, self.y_max)
    }
}

fn span(min: Coord, max: Coord) -> Coord {
    max.saturating_sub(min).max(1)
}

fn within(min: Coord, c: Coord, max: Coord) -> bool {
    min <= c && (c < max || max == Coord::MAX)
}

/// Tracks a bounding box around a changing set of cells, with every edge damped independently.
///
/// Each call to [`ViewportTracker::compute`] advances the damping by one step, so it must be
/// called exactly once per rendered frame, in frame order.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    left: MinBound,
    top: MinBound,

    // exclusive
    right: MaxBound,
    bottom: MaxBound,
}

impl ViewportTracker {
    pub fn new(margin: u32) -> Self {
        Self {
            left: MinBound::new(margin),
            top: MinBound::new(margin),
            right: MaxBound::new(margin),
            bottom: MaxBound::new(margin),
        }
    }

    /// The viewport returned by the last call to `compute`, if any.
    pub fn current(&self) -> Option<Viewport> {
        Some(Viewport {
            x_min: self.left.value()?,
            y_min: self.top.value()?,
            x_max: self.right.value()?,
            y_max: self.bottom.value()?,
        })
    }

    /// Fit the damped viewport around `cells`.
    ///
    /// Fails with [`ViewportError::InvalidInput`] on an empty set, leaving the tracker untouched.
    pub fn compute<'a, I>(&mut self, cells: I) -> Result<Viewport, ViewportError>
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        let (x_min, y_min, x_max, y_max) = raw_extents(cells).ok_or(ViewportError::InvalidInput)?;

        let viewport = Viewport {
            x_min: self.left.update_toward_min(x_min),
            y_min: self.top.update_toward_min(y_min),
            x_max: self.right.update_toward_max(x_max.saturating_add(1)),
            y_max: self.bottom.update_toward_max(y_max.saturating_add(1)),
        };

        trace!(?viewport, raw = ?(x_min, y_min, x_max, y_max), "viewport updated");

        Ok(viewport)
    }
}

/// Inclusive `(x_min, y_min, x_max, y_max)` of `cells`, in a single pass.
fn raw_extents<'a, I>(cells: I) -> Option<(Coord, Coord, Coord, Coord)>
where
    I: IntoIterator<Item = &'a Cell>,
{
    cells.into_iter().fold(None, |acc, &(x, y)| match acc {
        None => Some((x, y, x, y)),
        Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn vp(x_min: Coord, y_min: Coord, x_max: Coord, y_max: Coord) -> Viewport {
        Viewport {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    #[test]
    fn first_frame_is_tight() {
        let cells: HashSet<Cell> = [(0, 0), (3, 4)].into_iter().collect();
        let mut tracker = ViewportTracker::new(10);

        assert_eq!(tracker.compute(&cells), Ok(vp(0, 0, 4, 5)));
    }

    #[test]
    fn single_cell_is_one_by_one() {
        let mut tracker = ViewportTracker::new(10);
        let v = tracker.compute(&[(-7, 12)]).unwrap();

        assert_eq!(v, vp(-7, 12, -6, 13));
        assert_eq!((v.width(), v.height()), (1, 1));
        assert_eq!(v.center(), (-6.5, 12.5));
    }

    #[test]
    fn empty_input_is_rejected_without_mutation() {
        let mut tracker = ViewportTracker::new(10);
        let empty: [Cell; 0] = [];

        assert_eq!(tracker.compute(&empty), Err(ViewportError::InvalidInput));
        assert_eq!(tracker.current(), None);

        tracker.compute(&[(1, 1), (2, 2)]).unwrap();
        assert_eq!(tracker.compute(&empty), Err(ViewportError::InvalidInput));
        assert_eq!(tracker.current(), Some(vp(1, 1, 3, 3)));
    }

    #[test]
    fn blinker_on_the_edge_does_not_jitter() {
        // A blinker at the right edge alternates between horizontal and vertical.
        let horizontal: [Cell; 4] = [(0, 0), (9, 5), (10, 5), (11, 5)];
        let vertical: [Cell; 4] = [(0, 0), (10, 4), (10, 5), (10, 6)];

        let mut tracker = ViewportTracker::new(10);
        let first = tracker.compute(&horizontal).unwrap();
        assert_eq!(first, vp(0, 0, 12, 6));

        for _ in 0..20 {
            assert_eq!(tracker.compute(&vertical).unwrap(), vp(0, 0, 12, 7));
            assert_eq!(tracker.compute(&horizontal).unwrap(), vp(0, 0, 12, 7));
        }
    }

    #[test]
    fn shrinking_population_relaxes_slowly() {
        let mut tracker = ViewportTracker::new(2);
        tracker.compute(&[(0, 0), (20, 20)]).unwrap();

        let v = tracker.compute(&[(10, 10)]).unwrap();
        assert_eq!(v, vp(1, 1, 20, 20));

        let v = tracker.compute(&[(10, 10)]).unwrap();
        assert_eq!(v, vp(2, 2, 19, 19));
    }

    #[test]
    fn extreme_coordinates() {
        let mut tracker = ViewportTracker::new(10);

        let v = tracker.compute(&[(Coord::MAX, 0)]).unwrap();
        assert_eq!(v, vp(Coord::MAX, 0, Coord::MAX, 1));
        assert_eq!(v.width(), 1);
        assert!(v.contains((Coord::MAX, 0)));

        let v = tracker.compute(&[(Coord::MIN, Coord::MIN), (Coord::MAX, Coord::MAX)]).unwrap();
        assert_eq!(v, vp(Coord::MIN, Coord::MIN, Coord::MAX, Coord::MAX));
        assert_eq!(v.width(), Coord::MAX);
        assert_eq!(v.center(), (0.0, 0.0));
        assert!(v.contains((Coord::MIN, Coord::MAX)));
        assert!(v.contains((Coord::MAX, Coord::MIN)));
    }

    #[test]
    fn works_with_any_cell_collection() {
        let mut tracker = ViewportTracker::new(10);
        let cells: Vec<Cell> = vec![(5, -3), (-2, 8)];

        assert_eq!(tracker.compute(cells.iter()), Ok(vp(-2, -3, 6, 9)));
    }
}
