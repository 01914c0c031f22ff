//! Chaser entities and their per-turn stepping policies.
//!
//! Patrol chasers walk a fixed route forever; pursuit chasers search a
//! fresh path to the player every turn and keep no state between turns.
//! Both kinds hold their ground for the turn when the cell they want is
//! unavailable.

use std::error::Error;
use std::fmt;

use maze_chase_core::{ChaserId, ChaserKind, ChaserOccupancy, GridPos};

use crate::grid::Grid;
use crate::search;

/// Route-seeded description of one chaser, as read from a maze descriptor.
///
/// Patrol chasers cycle the whole route; pursuit chasers use only the
/// first cell as their spawn point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChaserSpec {
    kind: ChaserKind,
    route: Vec<GridPos>,
}

impl ChaserSpec {
    /// Describes a chaser of `kind` seeded with `route`.
    #[must_use]
    pub fn new(kind: ChaserKind, route: Vec<GridPos>) -> Self {
        Self { kind, route }
    }

    /// Stepping policy the chaser will follow.
    #[must_use]
    pub const fn kind(&self) -> ChaserKind {
        self.kind
    }

    /// Route cells the chaser was seeded with.
    #[must_use]
    pub fn route(&self) -> &[GridPos] {
        &self.route
    }
}

/// Failure to spawn a chaser from its descriptor route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteError {
    /// The descriptor listed no cells at all.
    EmptyRoute {
        /// Chaser whose route was empty.
        chaser: ChaserId,
    },
    /// A route cell points outside the board.
    CellOutOfBounds {
        /// Chaser whose route leaves the board.
        chaser: ChaserId,
        /// Offending route cell.
        cell: GridPos,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRoute { chaser } => {
                write!(formatter, "chaser {} has an empty route", chaser.get())
            }
            Self::CellOutOfBounds { chaser, cell } => write!(
                formatter,
                "chaser {} routes through ({}, {}) outside the board",
                chaser.get(),
                cell.row(),
                cell.column()
            ),
        }
    }
}

impl Error for RouteError {}

#[derive(Debug)]
pub(crate) struct Chaser {
    id: ChaserId,
    position: GridPos,
    policy: Policy,
}

#[derive(Debug)]
enum Policy {
    Patrol { route: Vec<GridPos>, cursor: usize },
    Pursuit,
}

impl Chaser {
    pub(crate) fn spawn(id: ChaserId, spec: ChaserSpec, grid: &Grid) -> Result<Self, RouteError> {
        let ChaserSpec { kind, route } = spec;
        let Some(position) = route.first().copied() else {
            return Err(RouteError::EmptyRoute { chaser: id });
        };
        if let Some(cell) = route.iter().copied().find(|cell| !grid.in_range(*cell)) {
            return Err(RouteError::CellOutOfBounds { chaser: id, cell });
        }
        let policy = match kind {
            // The spawn cell is the first route entry; the walk resumes
            // from the second.
            ChaserKind::Patrol => Policy::Patrol { route, cursor: 1 },
            ChaserKind::Pursuit => Policy::Pursuit,
        };
        Ok(Self {
            id,
            position,
            policy,
        })
    }

    pub(crate) const fn id(&self) -> ChaserId {
        self.id
    }

    pub(crate) const fn position(&self) -> GridPos {
        self.position
    }

    pub(crate) fn kind(&self) -> ChaserKind {
        match self.policy {
            Policy::Patrol { .. } => ChaserKind::Patrol,
            Policy::Pursuit => ChaserKind::Pursuit,
        }
    }

    /// Cell a patrol chaser tries to enter next, `None` for pursuit.
    pub(crate) fn patrol_target(&self) -> Option<GridPos> {
        match &self.policy {
            Policy::Patrol { route, cursor } => Some(route[cursor % route.len()]),
            Policy::Pursuit => None,
        }
    }

    /// Cell this chaser wants to enter this turn, or `None` to hold.
    pub(crate) fn plan_step(
        &self,
        grid: &Grid,
        occupancy: ChaserOccupancy<'_>,
        player: GridPos,
    ) -> Option<GridPos> {
        match &self.policy {
            Policy::Patrol { route, cursor } => {
                let target = route[cursor % route.len()];
                // A blocked target is retried next turn; the cursor only
                // advances on a committed step.
                (grid.is_route(target, occupancy) && target != player).then_some(target)
            }
            Policy::Pursuit => {
                let path = search::shortest_path(grid, occupancy, self.position, player);
                path.get(1).copied()
            }
        }
    }

    pub(crate) fn commit_step(&mut self, target: GridPos) {
        self.position = target;
        if let Policy::Patrol { cursor, .. } = &mut self.policy {
            *cursor = cursor.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Block, BlockCatalog, BlockId, BlockKind};

    const AIR: BlockId = BlockId::new(0);
    const START: BlockId = BlockId::new(2);
    const END: BlockId = BlockId::new(3);

    fn catalog() -> BlockCatalog {
        let blocks = vec![
            Block::new(BlockKind::Air, ' ', 0, false),
            Block::new(BlockKind::Wall, '#', 1, true),
            Block::new(BlockKind::Start, '-', 2, false),
            Block::new(BlockKind::End, '+', 3, false),
        ];
        BlockCatalog::new(blocks).expect("catalog builds")
    }

    fn open_grid(height: u32, width: u32) -> Grid {
        let mut cells = vec![AIR; (height as usize) * (width as usize)];
        cells[0] = START;
        let last = cells.len() - 1;
        cells[last] = END;
        Grid::new(
            height,
            width,
            cells,
            catalog(),
            GridPos::new(0, 0),
            GridPos::new(height - 1, width - 1),
        )
    }

    fn free() -> ChaserOccupancy<'static> {
        ChaserOccupancy::new(&[])
    }

    fn patrol(route: Vec<GridPos>, grid: &Grid) -> Chaser {
        Chaser::spawn(
            ChaserId::new(0),
            ChaserSpec::new(ChaserKind::Patrol, route),
            grid,
        )
        .expect("patrol spawns")
    }

    #[test]
    fn empty_routes_are_refused() {
        let grid = open_grid(3, 3);
        let spawned = Chaser::spawn(
            ChaserId::new(7),
            ChaserSpec::new(ChaserKind::Patrol, Vec::new()),
            &grid,
        );
        assert_eq!(
            spawned.err(),
            Some(RouteError::EmptyRoute {
                chaser: ChaserId::new(7)
            })
        );
    }

    #[test]
    fn routes_must_stay_on_the_board() {
        let grid = open_grid(3, 3);
        let route = vec![GridPos::new(0, 0), GridPos::new(5, 0)];
        let spawned = Chaser::spawn(
            ChaserId::new(1),
            ChaserSpec::new(ChaserKind::Pursuit, route),
            &grid,
        );
        assert_eq!(
            spawned.err(),
            Some(RouteError::CellOutOfBounds {
                chaser: ChaserId::new(1),
                cell: GridPos::new(5, 0)
            })
        );
    }

    #[test]
    fn chasers_spawn_on_the_first_route_cell() {
        let grid = open_grid(3, 3);
        let chaser = patrol(vec![GridPos::new(2, 0), GridPos::new(2, 1)], &grid);
        assert_eq!(chaser.position(), GridPos::new(2, 0));
        assert_eq!(chaser.patrol_target(), Some(GridPos::new(2, 1)));
    }

    #[test]
    fn patrols_cycle_their_route_in_order() {
        let grid = open_grid(3, 3);
        let route = vec![GridPos::new(0, 0), GridPos::new(0, 1), GridPos::new(0, 2)];
        let mut chaser = patrol(route, &grid);
        let player = GridPos::new(2, 2);

        let mut visited = Vec::new();
        for _ in 0..4 {
            let target = chaser
                .plan_step(&grid, free(), player)
                .expect("open route steps every turn");
            chaser.commit_step(target);
            visited.push(target);
        }
        assert_eq!(
            visited,
            vec![
                GridPos::new(0, 1),
                GridPos::new(0, 2),
                GridPos::new(0, 0),
                GridPos::new(0, 1),
            ]
        );
    }

    #[test]
    fn blocked_patrols_hold_and_keep_their_target() {
        let grid = open_grid(3, 3);
        let mut chaser = patrol(vec![GridPos::new(0, 0), GridPos::new(0, 1)], &grid);
        let player = GridPos::new(2, 2);

        let held = [GridPos::new(0, 1)];
        assert_eq!(chaser.plan_step(&grid, ChaserOccupancy::new(&held), player), None);
        assert_eq!(chaser.patrol_target(), Some(GridPos::new(0, 1)));

        let target = chaser
            .plan_step(&grid, free(), player)
            .expect("freed target steps");
        chaser.commit_step(target);
        assert_eq!(chaser.position(), GridPos::new(0, 1));
    }

    #[test]
    fn patrols_never_step_onto_the_player() {
        let grid = open_grid(3, 3);
        let chaser = patrol(vec![GridPos::new(0, 0), GridPos::new(0, 1)], &grid);
        assert_eq!(chaser.plan_step(&grid, free(), GridPos::new(0, 1)), None);
    }

    #[test]
    fn pursuit_plans_the_first_path_step() {
        let grid = open_grid(3, 3);
        let chaser = Chaser::spawn(
            ChaserId::new(0),
            ChaserSpec::new(ChaserKind::Pursuit, vec![GridPos::new(0, 0)]),
            &grid,
        )
        .expect("pursuit spawns");
        assert_eq!(
            chaser.plan_step(&grid, free(), GridPos::new(2, 2)),
            Some(GridPos::new(1, 0))
        );
    }

    #[test]
    fn pursuit_holds_without_a_path() {
        let grid = open_grid(3, 3);
        let chaser = Chaser::spawn(
            ChaserId::new(0),
            ChaserSpec::new(ChaserKind::Pursuit, vec![GridPos::new(0, 0)]),
            &grid,
        )
        .expect("pursuit spawns");
        let wall_of_chasers = [GridPos::new(0, 1), GridPos::new(1, 0), GridPos::new(1, 1)];
        assert_eq!(
            chaser.plan_step(
                &grid,
                ChaserOccupancy::new(&wall_of_chasers),
                GridPos::new(2, 2)
            ),
            None
        );
    }
}
