use std::collections::HashMap;
use std::collections::HashSet;

use crate::Cell;
use crate::rule_set::RuleSet;

const NEIGHBORS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Advance `cells` by one generation on an unbounded grid.
///
/// The grid stops at the ends of [`Coord`](crate::Coord); nothing is born past them.
pub fn step(cells: &HashSet<Cell>, rules: RuleSet) -> HashSet<Cell> {
    let mut counts: HashMap<Cell, u8> = HashMap::with_capacity(cells.len() * 8);

    for &(x, y) in cells {
        for (dx, dy) in NEIGHBORS {
            let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
                continue;
            };

            *counts.entry((nx, ny)).or_default() += 1;
        }
    }

    // Live cells with no neighbors never show up in `counts`
    let lonely = cells
        .iter()
        .filter(|c| !counts.contains_key(*c))
        .filter(|_| rules.next_state(true, 0))
        .copied();

    counts
        .iter()
        .filter(|&(c, &n)| rules.next_state(cells.contains(c), n))
        .map(|(&c, _)| c)
        .chain(lonely)
        .collect()
}
