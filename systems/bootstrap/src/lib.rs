#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that turns maze descriptors into live worlds.
//!
//! Loaders hand over a [`MazeDescriptor`] exactly as authored; this
//! system enforces the descriptor contract and assembles the world.
//! Everything caught here is bad level data, reported as an
//! [`AssembleError`], so the world itself only ever sees descriptors
//! that honor its construction preconditions.

use maze_chase_core::{BlockCatalog, BlockId, BlockKind, GridPos};
use maze_chase_world::{ChaserSpec, Grid, RouteError, World};
use thiserror::Error;

/// One maze exactly as a loader read it, before any validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MazeDescriptor {
    /// Number of rows on the board.
    pub height: u32,
    /// Number of columns on the board.
    pub width: u32,
    /// Cell the player spawns on.
    pub start: GridPos,
    /// Cell the player must reach.
    pub end: GridPos,
    /// Row-major block listing covering the whole board.
    pub cells: Vec<BlockId>,
    /// Chasers to spawn, in turn order.
    pub chasers: Vec<ChaserSpec>,
}

/// Ways a maze descriptor can violate the loader contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssembleError {
    /// The declared dimensions leave no cells to play on.
    #[error("maze dimensions {height}x{width} leave no cells")]
    EmptyBoard {
        /// Declared row count.
        height: u32,
        /// Declared column count.
        width: u32,
    },
    /// The block listing does not cover the declared dimensions.
    #[error("maze lists {actual} cells but {height}x{width} needs {expected}")]
    CellCountMismatch {
        /// Declared row count.
        height: u32,
        /// Declared column count.
        width: u32,
        /// Cells the dimensions call for.
        expected: usize,
        /// Cells the listing actually holds.
        actual: usize,
    },
    /// A cell references a block the catalog does not define.
    #[error("cell {index} references unknown block id {id}")]
    UnknownBlock {
        /// Row-major index of the offending cell.
        index: usize,
        /// Unresolved block identifier.
        id: u16,
    },
    /// The start marker points outside the board.
    #[error("start marker {cell} is off the board")]
    StartOffBoard {
        /// Declared start cell.
        cell: GridPos,
    },
    /// The end marker points outside the board.
    #[error("end marker {cell} is off the board")]
    EndOffBoard {
        /// Declared end cell.
        cell: GridPos,
    },
    /// Start and end markers point at the same cell.
    #[error("start and end markers overlap at {cell}")]
    MarkersOverlap {
        /// Shared marker cell.
        cell: GridPos,
    },
    /// The start cell does not hold the start tile.
    #[error("start marker {cell} sits on {found:?} instead of the start tile")]
    StartTileMismatch {
        /// Declared start cell.
        cell: GridPos,
        /// Block kind actually stored there.
        found: BlockKind,
    },
    /// The end cell does not hold the end tile.
    #[error("end marker {cell} sits on {found:?} instead of the end tile")]
    EndTileMismatch {
        /// Declared end cell.
        cell: GridPos,
        /// Block kind actually stored there.
        found: BlockKind,
    },
    /// A chaser route leaves the board.
    #[error("chaser {chaser} routes through {cell}, off the board")]
    RouteOffBoard {
        /// Index of the chaser within the descriptor.
        chaser: usize,
        /// Offending route cell.
        cell: GridPos,
    },
    /// A chaser route crosses something other than open ground.
    #[error("chaser {chaser} routes through {cell}, which holds {found:?}")]
    RouteBlocked {
        /// Index of the chaser within the descriptor.
        chaser: usize,
        /// Offending route cell.
        cell: GridPos,
        /// Block kind actually stored there.
        found: BlockKind,
    },
    /// The world refused the chaser routes at spawn time.
    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Validates `descriptor` against `catalog` and assembles a fresh world.
///
/// The descriptor is borrowed so callers can assemble the same maze
/// again for retries.
pub fn assemble(
    catalog: &BlockCatalog,
    descriptor: &MazeDescriptor,
) -> Result<World, AssembleError> {
    validate(catalog, descriptor)?;
    let grid = Grid::new(
        descriptor.height,
        descriptor.width,
        descriptor.cells.clone(),
        catalog.clone(),
        descriptor.start,
        descriptor.end,
    );
    Ok(World::new(grid, descriptor.chasers.clone())?)
}

fn validate(catalog: &BlockCatalog, descriptor: &MazeDescriptor) -> Result<(), AssembleError> {
    let MazeDescriptor {
        height,
        width,
        start,
        end,
        cells,
        chasers,
    } = descriptor;

    if *height == 0 || *width == 0 {
        return Err(AssembleError::EmptyBoard {
            height: *height,
            width: *width,
        });
    }
    let expected = (*height as usize) * (*width as usize);
    if cells.len() != expected {
        return Err(AssembleError::CellCountMismatch {
            height: *height,
            width: *width,
            expected,
            actual: cells.len(),
        });
    }
    if let Some((index, id)) = cells
        .iter()
        .enumerate()
        .find(|(_, id)| catalog.block(**id).is_none())
    {
        return Err(AssembleError::UnknownBlock {
            index,
            id: id.get(),
        });
    }

    if !on_board(descriptor, *start) {
        return Err(AssembleError::StartOffBoard { cell: *start });
    }
    if !on_board(descriptor, *end) {
        return Err(AssembleError::EndOffBoard { cell: *end });
    }
    if start == end {
        return Err(AssembleError::MarkersOverlap { cell: *start });
    }
    let start_kind = kind_at(catalog, descriptor, *start);
    if start_kind != BlockKind::Start {
        return Err(AssembleError::StartTileMismatch {
            cell: *start,
            found: start_kind,
        });
    }
    let end_kind = kind_at(catalog, descriptor, *end);
    if end_kind != BlockKind::End {
        return Err(AssembleError::EndTileMismatch {
            cell: *end,
            found: end_kind,
        });
    }

    for (chaser, spec) in chasers.iter().enumerate() {
        for cell in spec.route().iter().copied() {
            if !on_board(descriptor, cell) {
                return Err(AssembleError::RouteOffBoard { chaser, cell });
            }
            let found = kind_at(catalog, descriptor, cell);
            if found != BlockKind::Air {
                return Err(AssembleError::RouteBlocked {
                    chaser,
                    cell,
                    found,
                });
            }
        }
    }

    Ok(())
}

fn on_board(descriptor: &MazeDescriptor, cell: GridPos) -> bool {
    cell.row() < descriptor.height && cell.column() < descriptor.width
}

fn kind_at(catalog: &BlockCatalog, descriptor: &MazeDescriptor, cell: GridPos) -> BlockKind {
    let index = (cell.row() as usize) * (descriptor.width as usize) + cell.column() as usize;
    catalog.kind_of(descriptor.cells[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::{Block, ChaserId, ChaserKind};
    use maze_chase_world::query;

    const AIR: BlockId = BlockId::new(0);
    const WALL: BlockId = BlockId::new(1);
    const START: BlockId = BlockId::new(4);
    const END: BlockId = BlockId::new(5);

    fn catalog() -> BlockCatalog {
        let blocks = vec![
            Block::new(BlockKind::Air, ' ', 0, false),
            Block::new(BlockKind::Wall, '#', 1, true),
            Block::new(BlockKind::Box, 'X', 2, true),
            Block::new(BlockKind::Bonus, '$', 3, false),
            Block::new(BlockKind::Start, '-', 4, false),
            Block::new(BlockKind::End, '+', 5, false),
        ];
        BlockCatalog::new(blocks).expect("catalog builds")
    }

    fn descriptor() -> MazeDescriptor {
        MazeDescriptor {
            height: 3,
            width: 3,
            start: GridPos::new(0, 0),
            end: GridPos::new(2, 2),
            cells: vec![START, AIR, AIR, AIR, WALL, AIR, AIR, AIR, END],
            chasers: vec![ChaserSpec::new(
                ChaserKind::Patrol,
                vec![GridPos::new(1, 0), GridPos::new(2, 0)],
            )],
        }
    }

    #[test]
    fn assembles_a_playable_world() {
        let world = assemble(&catalog(), &descriptor()).expect("descriptor assembles");
        assert_eq!(query::player(&world).position, GridPos::new(0, 0));
        let chasers = query::chasers(&world);
        assert_eq!(chasers.len(), 1);
        assert_eq!(chasers[0].position, GridPos::new(1, 0));
    }

    #[test]
    fn the_same_descriptor_assembles_repeatedly() {
        let catalog = catalog();
        let descriptor = descriptor();
        let first = assemble(&catalog, &descriptor).expect("first attempt assembles");
        let second = assemble(&catalog, &descriptor).expect("second attempt assembles");
        assert_eq!(
            query::player(&first).position,
            query::player(&second).position
        );
    }

    #[test]
    fn refuses_empty_boards() {
        let mut bad = descriptor();
        bad.height = 0;
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::EmptyBoard {
                height: 0,
                width: 3
            })
        );
    }

    #[test]
    fn refuses_mismatched_cell_counts() {
        let mut bad = descriptor();
        let _dropped = bad.cells.pop();
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::CellCountMismatch {
                height: 3,
                width: 3,
                expected: 9,
                actual: 8
            })
        );
    }

    #[test]
    fn refuses_unknown_block_ids() {
        let mut bad = descriptor();
        bad.cells[3] = BlockId::new(42);
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::UnknownBlock { index: 3, id: 42 })
        );
    }

    #[test]
    fn refuses_markers_off_the_board() {
        let mut bad = descriptor();
        bad.end = GridPos::new(5, 5);
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::EndOffBoard {
                cell: GridPos::new(5, 5)
            })
        );
    }

    #[test]
    fn refuses_overlapping_markers() {
        let mut bad = descriptor();
        bad.end = bad.start;
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::MarkersOverlap {
                cell: GridPos::new(0, 0)
            })
        );
    }

    #[test]
    fn refuses_wrong_marker_tiles() {
        let mut bad = descriptor();
        bad.cells[0] = AIR;
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::StartTileMismatch {
                cell: GridPos::new(0, 0),
                found: BlockKind::Air
            })
        );
    }

    #[test]
    fn refuses_routes_off_the_board() {
        let mut bad = descriptor();
        bad.chasers = vec![ChaserSpec::new(
            ChaserKind::Patrol,
            vec![GridPos::new(1, 0), GridPos::new(9, 9)],
        )];
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::RouteOffBoard {
                chaser: 0,
                cell: GridPos::new(9, 9)
            })
        );
    }

    #[test]
    fn refuses_routes_over_blocked_ground() {
        let mut bad = descriptor();
        bad.chasers = vec![ChaserSpec::new(
            ChaserKind::Patrol,
            vec![GridPos::new(1, 0), GridPos::new(1, 1)],
        )];
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::RouteBlocked {
                chaser: 0,
                cell: GridPos::new(1, 1),
                found: BlockKind::Wall
            })
        );
    }

    #[test]
    fn refuses_empty_routes() {
        let mut bad = descriptor();
        bad.chasers = vec![ChaserSpec::new(ChaserKind::Pursuit, Vec::new())];
        assert_eq!(
            assemble(&catalog(), &bad).err(),
            Some(AssembleError::Route(RouteError::EmptyRoute {
                chaser: ChaserId::new(0)
            }))
        );
    }
}
