pub mod bound;
pub mod config;
pub mod frame;
pub mod layout;
pub mod life;
pub mod parse_rle;
pub mod render;
pub mod rule_set;
pub mod sink;
pub mod viewport;

mod parse_util;

/// A coordinate on the unbounded cell grid
pub type Coord = i64;

/// A live cell, as `(x, y)`. Y grows downward, like the screen.
pub type Cell = (Coord, Coord);
