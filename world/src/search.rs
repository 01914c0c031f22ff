//! Shortest-path search used by pursuit chasers.
//!
//! Classic A* over unit-cost cells with a Manhattan heuristic. Ties on
//! the combined estimate break toward the earliest frontier insertion,
//! so paths depend only on the expansion order and never on heap
//! internals.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use maze_chase_core::{ChaserOccupancy, GridPos};

use crate::grid::Grid;

/// Cheapest route from `from` to `to`, both endpoints inclusive.
///
/// Cells blocked per `occupancy` are never entered. Returns an empty
/// path when `to` cannot be reached, and the single-cell path `[from]`
/// when the endpoints coincide.
#[must_use]
pub fn shortest_path(
    grid: &Grid,
    occupancy: ChaserOccupancy<'_>,
    from: GridPos,
    to: GridPos,
) -> Vec<GridPos> {
    let Some(start) = grid.index(from) else {
        return Vec::new();
    };

    let cells = grid.cell_count();
    let mut best_cost = vec![u32::MAX; cells];
    let mut parent: Vec<Option<GridPos>> = vec![None; cells];
    let mut closed = vec![false; cells];
    let mut frontier = BinaryHeap::new();
    let mut insertions = 0_u32;

    best_cost[start] = 0;
    frontier.push(Reverse((from.manhattan_distance(to), insertions, from)));

    while let Some(Reverse((_, _, cell))) = frontier.pop() {
        let Some(index) = grid.index(cell) else {
            continue;
        };
        // Stale frontier entries for already settled cells fall out here.
        if closed[index] {
            continue;
        }
        closed[index] = true;

        if cell == to {
            return walk_back(&parent, grid, to);
        }

        let step_cost = best_cost[index].saturating_add(1);
        for neighbor in grid.neighbors(cell, occupancy) {
            let Some(neighbor_index) = grid.index(neighbor) else {
                continue;
            };
            if closed[neighbor_index] || step_cost >= best_cost[neighbor_index] {
                continue;
            }
            best_cost[neighbor_index] = step_cost;
            parent[neighbor_index] = Some(cell);
            insertions = insertions.saturating_add(1);
            frontier.push(Reverse((
                step_cost.saturating_add(neighbor.manhattan_distance(to)),
                insertions,
                neighbor,
            )));
        }
    }

    Vec::new()
}

fn walk_back(parent: &[Option<GridPos>], grid: &Grid, to: GridPos) -> Vec<GridPos> {
    let mut path = vec![to];
    let mut cell = to;
    while let Some(previous) = grid.index(cell).and_then(|index| parent[index]) {
        path.push(previous);
        cell = previous;
    }
    path.reverse();
    path
}
