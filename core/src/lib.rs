#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze-chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Requests that the player advance one turn in the given direction.
    MovePlayer {
        /// Direction vector supplied by the input dispatcher.
        step: Step,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the player committed a move between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: GridPos,
        /// Cell the player occupies after completing the move.
        to: GridPos,
    },
    /// Reports that a requested player move was rejected.
    PlayerMoveRejected {
        /// Specific reason the move did not commit.
        reason: MoveRejection,
    },
    /// Confirms that a box was pushed one cell ahead of the player.
    BoxPushed {
        /// Cell the box occupied before the push.
        from: GridPos,
        /// Cell the box occupies after the push.
        to: GridPos,
    },
    /// Confirms that a bonus tile was consumed by the player.
    BonusCollected {
        /// Cell that held the bonus tile.
        cell: GridPos,
        /// Score awarded for the collection.
        points: i64,
    },
    /// Confirms that a chaser committed a move between two cells.
    ChaserMoved {
        /// Identifier of the chaser that advanced.
        chaser: ChaserId,
        /// Cell the chaser occupied before moving.
        from: GridPos,
        /// Cell the chaser occupies after completing the move.
        to: GridPos,
    },
    /// Announces that the attempt reached a terminal status.
    AttemptEnded {
        /// Terminal status that settled the attempt.
        status: AttemptStatus,
    },
}

/// Reasons a requested player move may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The input vector was `(0,0)`; no-op inputs never consume a turn.
    ZeroStep,
    /// The destination is out of range, solid, or occupied by a chaser.
    Blocked,
    /// The destination holds a box that cannot be pushed ahead.
    BoxStuck,
    /// The attempt already settled on a terminal status.
    AttemptOver,
}

/// Terminal state machine for a single level attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptStatus {
    /// The attempt is still in progress and accepts further turns.
    Ongoing,
    /// The player reached the exit cell.
    Won,
    /// A chaser occupies the player's cell.
    Lost,
}

impl AttemptStatus {
    /// Reports whether the status ends the attempt.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPos {
    row: u32,
    column: u32,
}

impl GridPos {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Applies a step vector, returning `None` when either axis would leave
    /// the coordinate space. Upper bounds are the grid's to enforce.
    #[must_use]
    pub fn offset(self, step: Step) -> Option<Self> {
        let row = self.row.checked_add_signed(step.dy())?;
        let column = self.column.checked_add_signed(step.dx())?;
        Some(Self { row, column })
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: GridPos) -> u32 {
        self.row().abs_diff(other.row()) + self.column().abs_diff(other.column())
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Discrete direction vector `(dy, dx)` applied to grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Step {
    dy: i32,
    dx: i32,
}

impl Step {
    /// Step toward increasing row indices.
    pub const DOWN: Self = Self::new(1, 0);
    /// Step toward increasing column indices.
    pub const RIGHT: Self = Self::new(0, 1);
    /// Step toward decreasing row indices.
    pub const UP: Self = Self::new(-1, 0);
    /// Step toward decreasing column indices.
    pub const LEFT: Self = Self::new(0, -1);

    /// Cardinal steps in the fixed expansion order used by neighbor
    /// enumeration: down, right, up, left. Search tie-breaking depends on
    /// this order staying stable.
    pub const CARDINAL: [Self; 4] = [Self::DOWN, Self::RIGHT, Self::UP, Self::LEFT];

    /// Creates a new step vector from row and column deltas.
    #[must_use]
    pub const fn new(dy: i32, dx: i32) -> Self {
        Self { dy, dx }
    }

    /// Row delta of the step.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.dy
    }

    /// Column delta of the step.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.dx
    }

    /// Reports whether the step leaves the position unchanged.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.dy == 0 && self.dx == 0
    }
}

/// Unique identifier assigned to a chaser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChaserId(u32);

impl ChaserId {
    /// Creates a new chaser identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Behavior variants a chaser can be spawned with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChaserKind {
    /// Cycles a fixed, pre-authored coordinate list.
    Patrol,
    /// Recomputes a shortest path to the player every turn.
    Pursuit,
}

/// Identifier of a block within a [`BlockCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(u16);

impl BlockId {
    /// Creates a new block identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u16 {
        self.0
    }

    /// Position of the block within its catalog's backing storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Role a block plays in the simulation rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockKind {
    /// Open ground entities move across freely.
    Air,
    /// Impassable terrain.
    Wall,
    /// The tile the player spawns on.
    Start,
    /// The exit tile that wins the attempt.
    End,
    /// A pushable obstacle.
    Box,
    /// A tile awarding score once, then turning to air.
    Bonus,
}

/// Static properties of a single block variety.
///
/// Glyph and color exist purely for the renderer; the engine reads only the
/// solidity flag and the kind tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Block {
    kind: BlockKind,
    glyph: char,
    color: u8,
    solid: bool,
}

impl Block {
    /// Creates a new block description.
    #[must_use]
    pub const fn new(kind: BlockKind, glyph: char, color: u8, solid: bool) -> Self {
        Self {
            kind,
            glyph,
            color,
            solid,
        }
    }

    /// Role the block plays in the simulation rules.
    #[must_use]
    pub const fn kind(&self) -> BlockKind {
        self.kind
    }

    /// Character the renderer draws for the block.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Palette pair index the renderer colors the glyph with.
    #[must_use]
    pub const fn color(&self) -> u8 {
        self.color
    }

    /// Reports whether entities are barred from entering the block's cell.
    #[must_use]
    pub const fn is_solid(&self) -> bool {
        self.solid
    }
}

/// Immutable registry of block varieties, injected into every world.
///
/// The catalog is a plain value so concurrent worlds (tests in particular)
/// never share registry state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockCatalog {
    blocks: Vec<Block>,
    air: BlockId,
}

impl BlockCatalog {
    /// Builds a catalog from the provided block descriptions.
    ///
    /// The catalog must contain at least one [`BlockKind::Air`] entry because
    /// box pushes and bonus collection rewrite cells to air.
    pub fn new(blocks: Vec<Block>) -> Result<Self, CatalogError> {
        if blocks.is_empty() {
            return Err(CatalogError::Empty);
        }

        let air = blocks
            .iter()
            .position(|block| block.kind() == BlockKind::Air)
            .map(|index| BlockId::new(index as u16))
            .ok_or(CatalogError::MissingAir)?;

        Ok(Self { blocks, air })
    }

    /// Number of block varieties registered in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Reports whether the catalog holds no blocks. Construction rejects the
    /// empty case, so this is `false` for any live catalog.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Identifier of the air block cells are rewritten to.
    #[must_use]
    pub const fn air(&self) -> BlockId {
        self.air
    }

    /// Looks up a block description by identifier.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    /// Role of the identified block; unknown identifiers read as walls.
    #[must_use]
    pub fn kind_of(&self, id: BlockId) -> BlockKind {
        self.block(id).map_or(BlockKind::Wall, Block::kind)
    }

    /// Solidity of the identified block; unknown identifiers read as solid.
    #[must_use]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.block(id).map_or(true, Block::is_solid)
    }
}

/// Errors that can occur while assembling a [`BlockCatalog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogError {
    /// The catalog was constructed without any blocks.
    Empty,
    /// No block carried the [`BlockKind::Air`] tag.
    MissingAir,
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "block catalog contains no blocks"),
            Self::MissingAir => write!(f, "block catalog defines no air block"),
        }
    }
}

impl Error for CatalogError {}

/// Read-only view of the cells currently occupied by chasers.
///
/// The world collects live chaser positions into a scratch slice and hands
/// this view to grid legality queries, so the grid never holds a
/// back-reference to the chaser collection.
#[derive(Clone, Copy, Debug)]
pub struct ChaserOccupancy<'a> {
    positions: &'a [GridPos],
}

impl<'a> ChaserOccupancy<'a> {
    /// Captures a new occupancy view backed by the provided position slice.
    #[must_use]
    pub const fn new(positions: &'a [GridPos]) -> Self {
        Self { positions }
    }

    /// Reports whether any chaser currently occupies the cell.
    #[must_use]
    pub fn contains(&self, cell: GridPos) -> bool {
        self.positions.iter().any(|position| *position == cell)
    }
}
