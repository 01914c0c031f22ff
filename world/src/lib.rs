#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state and the deterministic turn pipeline.
//!
//! A [`World`] owns the grid, the player, and every chaser for a single
//! attempt at one maze. All mutation funnels through [`apply`], which
//! plays exactly one command and reports everything that happened as
//! [`Event`] values, so adapters and systems stay read-only over the
//! [`query`] snapshots.

mod chasers;
mod grid;
pub mod search;

pub use chasers::{ChaserSpec, RouteError};
pub use grid::Grid;

use maze_chase_core::{
    AttemptStatus, ChaserId, ChaserOccupancy, Command, Event, GridPos, MoveRejection, Step,
};

use crate::chasers::Chaser;

/// Score every attempt starts from.
pub const STARTING_SCORE: i64 = 1_000;
/// Points deducted for every committed player step.
pub const STEP_COST: i64 = 10;
/// Points awarded when the bonus pickup is collected.
pub const BONUS_REWARD: i64 = 10_000;

/// Complete simulation state for one attempt at a maze.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    player: Player,
    chasers: Vec<Chaser>,
    status: AttemptStatus,
    occupancy_scratch: Vec<GridPos>,
}

impl World {
    /// Assembles a world from a validated grid and chaser descriptions.
    ///
    /// The player spawns on the grid's start marker with the full
    /// starting score. Chasers spawn on the first cell of their routes
    /// in the order given, which also fixes their turn order.
    pub fn new(grid: Grid, chasers: Vec<ChaserSpec>) -> Result<Self, RouteError> {
        let mut spawned = Vec::with_capacity(chasers.len());
        for (index, spec) in chasers.into_iter().enumerate() {
            spawned.push(Chaser::spawn(ChaserId::new(index as u32), spec, &grid)?);
        }
        let player = Player::spawn(grid.start());
        Ok(Self {
            grid,
            player,
            chasers: spawned,
            status: AttemptStatus::Ongoing,
            occupancy_scratch: Vec::new(),
        })
    }
}

#[derive(Debug)]
struct Player {
    position: GridPos,
    score: i64,
    steps: u32,
}

impl Player {
    fn spawn(position: GridPos) -> Self {
        Self {
            position,
            score: STARTING_SCORE,
            steps: 0,
        }
    }

    const fn position(&self) -> GridPos {
        self.position
    }

    const fn score(&self) -> i64 {
        self.score
    }

    const fn steps(&self) -> u32 {
        self.steps
    }

    fn relocate(&mut self, position: GridPos) {
        self.position = position;
    }

    fn charge_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
        self.score -= STEP_COST;
    }

    fn collect(&mut self, points: i64) {
        self.score += points;
    }
}

/// Applies `command` to `world`, appending everything that happened to
/// `out_events`.
///
/// A turn advances only when the player actually moves: every chaser
/// then steps once in spawn order, and the attempt settles into a win
/// or a loss when the board says so. Rejected moves cost nothing and
/// move nobody.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::MovePlayer { step } => {
            if world.status.is_terminal() {
                out_events.push(Event::PlayerMoveRejected {
                    reason: MoveRejection::AttemptOver,
                });
                return;
            }
            if move_player(world, step, out_events) {
                advance_chasers(world, out_events);
            }
            settle_attempt(world, out_events);
        }
    }
}

fn move_player(world: &mut World, step: Step, out_events: &mut Vec<Event>) -> bool {
    if step.is_zero() {
        out_events.push(Event::PlayerMoveRejected {
            reason: MoveRejection::ZeroStep,
        });
        return false;
    }

    let from = world.player.position();
    let Some(destination) = from.offset(step) else {
        out_events.push(Event::PlayerMoveRejected {
            reason: MoveRejection::Blocked,
        });
        return false;
    };

    refresh_occupancy(world);
    let occupancy = ChaserOccupancy::new(&world.occupancy_scratch);

    if world.grid.is_box(destination) {
        let cleared = destination
            .offset(step)
            .filter(|cell| !world.grid.is_box(*cell) && world.grid.is_route(*cell, occupancy));
        let Some(beyond) = cleared else {
            out_events.push(Event::PlayerMoveRejected {
                reason: MoveRejection::BoxStuck,
            });
            return false;
        };
        world.grid.push_box(destination, beyond);
        out_events.push(Event::BoxPushed {
            from: destination,
            to: beyond,
        });
    } else if !world.grid.is_route(destination, occupancy) {
        out_events.push(Event::PlayerMoveRejected {
            reason: MoveRejection::Blocked,
        });
        return false;
    }

    world.player.relocate(destination);
    out_events.push(Event::PlayerMoved {
        from,
        to: destination,
    });
    if world.grid.consume_bonus(destination) {
        world.player.collect(BONUS_REWARD);
        out_events.push(Event::BonusCollected {
            cell: destination,
            points: BONUS_REWARD,
        });
    }
    world.player.charge_step();
    true
}

fn advance_chasers(world: &mut World, out_events: &mut Vec<Event>) {
    for index in 0..world.chasers.len() {
        // Each chaser plans against live positions, so earlier movers
        // block and unblock cells within the same turn.
        refresh_occupancy(world);
        let occupancy = ChaserOccupancy::new(&world.occupancy_scratch);
        let planned =
            world.chasers[index].plan_step(&world.grid, occupancy, world.player.position());
        if let Some(target) = planned {
            let chaser = &mut world.chasers[index];
            let from = chaser.position();
            chaser.commit_step(target);
            out_events.push(Event::ChaserMoved {
                chaser: chaser.id(),
                from,
                to: target,
            });
        }
    }
}

fn settle_attempt(world: &mut World, out_events: &mut Vec<Event>) {
    let player = world.player.position();
    let status = if player == world.grid.end() {
        AttemptStatus::Won
    } else if world
        .chasers
        .iter()
        .any(|chaser| chaser.position() == player)
    {
        AttemptStatus::Lost
    } else {
        AttemptStatus::Ongoing
    };
    if status.is_terminal() {
        world.status = status;
        out_events.push(Event::AttemptEnded { status });
    }
}

fn refresh_occupancy(world: &mut World) {
    world.occupancy_scratch.clear();
    world
        .occupancy_scratch
        .extend(world.chasers.iter().map(Chaser::position));
}

/// Read-only views over the world for adapters and session drivers.
pub mod query {
    use maze_chase_core::{AttemptStatus, ChaserId, ChaserKind, GridPos};

    use crate::{Grid, World};

    /// Player bookkeeping at a point in time.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct PlayerSnapshot {
        /// Cell the player stands on.
        pub position: GridPos,
        /// Current score.
        pub score: i64,
        /// Committed moves so far.
        pub steps: u32,
    }

    /// One chaser as seen from the outside.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ChaserSnapshot {
        /// Stable identifier fixed at spawn.
        pub id: ChaserId,
        /// Stepping policy the chaser follows.
        pub kind: ChaserKind,
        /// Cell the chaser stands on.
        pub position: GridPos,
        /// Next cell a patrol chaser will try, `None` for pursuit.
        pub patrol_target: Option<GridPos>,
    }

    /// Where the attempt currently stands.
    #[must_use]
    pub fn attempt_status(world: &World) -> AttemptStatus {
        world.status
    }

    /// Player position and bookkeeping.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position(),
            score: world.player.score(),
            steps: world.player.steps(),
        }
    }

    /// Every chaser in turn order.
    #[must_use]
    pub fn chasers(world: &World) -> Vec<ChaserSnapshot> {
        world
            .chasers
            .iter()
            .map(|chaser| ChaserSnapshot {
                id: chaser.id(),
                kind: chaser.kind(),
                position: chaser.position(),
                patrol_target: chaser.patrol_target(),
            })
            .collect()
    }

    /// Immutable access to the board.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }
}
