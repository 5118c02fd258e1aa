use crate::Coord;

/// Tolerance used when none is given.
pub const DEFAULT_MARGIN: u32 = 10;

/// One edge of a bounding box, smoothed against values that keep flickering back and forth.
///
/// An edge snaps outward immediately, so nothing it bounds is ever clipped. Moving back inward is
/// only allowed once the input has stayed more than `margin` away, and then only one unit per
/// update.
pub trait DampedBound {
    /// Feed the latest extreme and return the relaxed bound.
    fn update(&mut self, candidate: Coord) -> Coord;

    /// The current bound, `None` until the first update.
    fn value(&self) -> Option<Coord>;

    fn margin(&self) -> u32;
}

/// A relaxed minimum: tightens down, relaxes up.
#[derive(Debug, Clone)]
pub struct MinBound {
    margin: u32,
    value: Option<Coord>,
}

impl MinBound {
    pub fn new(margin: u32) -> Self {
        Self {
            margin,
            value: None,
        }
    }

    pub fn update_toward_min(&mut self, candidate: Coord) -> Coord {
        let value = match self.value {
            Some(v) if candidate >= v => {
                if v
                    .checked_add(Coord::from(self.margin))
                    .is_some_and(|limit| candidate > limit)
                {
                    v + 1
                } else {
                    v
                }
            }
            _ => candidate,
        };

        self.value = Some(value);
        value
    }
}

impl DampedBound for MinBound {
    fn update(&mut self, candidate: Coord) -> Coord {
        self.update_toward_min(candidate)
    }

    fn value(&self) -> Option<Coord> {
        self.value
    }

    fn margin(&self) -> u32 {
        self.margin
    }
}

/// A relaxed maximum: tightens up, relaxes down.
#[derive(Debug, Clone)]
pub struct MaxBound {
    margin: u32,
    value: Option<Coord>,
}

impl MaxBound {
    pub fn new(margin: u32) -> Self {
        Self {
            margin,
            value: None,
        }
    }

    pub fn update_toward_max(&mut self, candidate: Coord) -> Coord {
        let value = match self.value {
            Some(v) if candidate <= v => {
                if v
                    .checked_sub(Coord::from(self.margin))
                    .is_some_and(|limit| candidate < limit)
                {
                    v - 1
                } else {
                    v
                }
            }
            _ => candidate,
        };

        self.value = Some(value);
        value
    }
}

impl DampedBound for MaxBound {
    fn update(&mut self, candidate: Coord) -> Coord {
        self.update_toward_max(candidate)
    }

    fn value(&self) -> Option<Coord> {
        self.value
    }

    fn margin(&self) -> u32 {
        self.margin
    }
}
