//! Rectangular block grid storing the mutable maze surface.
//!
//! The grid owns the per-attempt block state: walls, pushable boxes, the
//! bonus pickup, and the start and end markers. Legality queries take
//! chaser occupancy as an explicit argument, so the grid never holds a
//! back-reference into the entity collection.

use maze_chase_core::{BlockCatalog, BlockId, BlockKind, ChaserOccupancy, GridPos, Step};

/// Block grid addressed in row-major order.
#[derive(Clone, Debug)]
pub struct Grid {
    height: u32,
    width: u32,
    cells: Vec<BlockId>,
    catalog: BlockCatalog,
    start: GridPos,
    end: GridPos,
}

impl Grid {
    /// Builds a grid from a row-major block listing.
    ///
    /// # Panics
    ///
    /// Panics when the listing disagrees with the declared dimensions,
    /// references a block the catalog does not define, or places the
    /// start and end markers off the board or on the same cell. Loaders
    /// validate descriptors before construction, so tripping one of
    /// these checks is a programming error rather than bad level data.
    #[must_use]
    pub fn new(
        height: u32,
        width: u32,
        cells: Vec<BlockId>,
        catalog: BlockCatalog,
        start: GridPos,
        end: GridPos,
    ) -> Self {
        assert!(height > 0 && width > 0, "grid dimensions must be positive");
        let expected = (height as usize) * (width as usize);
        assert_eq!(
            cells.len(),
            expected,
            "cell listing must cover the whole grid"
        );
        assert!(
            cells.iter().all(|id| id.index() < catalog.len()),
            "cell listing references a block missing from the catalog"
        );
        assert_ne!(start, end, "start and end markers must be distinct");

        let grid = Self {
            height,
            width,
            cells,
            catalog,
            start,
            end,
        };
        assert!(grid.in_range(start), "start marker must sit on the board");
        assert!(grid.in_range(end), "end marker must sit on the board");
        grid
    }

    /// Number of rows on the board.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of columns on the board.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Cell the player spawns on.
    #[must_use]
    pub const fn start(&self) -> GridPos {
        self.start
    }

    /// Cell the player must reach to win the attempt.
    #[must_use]
    pub const fn end(&self) -> GridPos {
        self.end
    }

    /// Catalog resolving the block identifiers stored in the cells.
    #[must_use]
    pub const fn catalog(&self) -> &BlockCatalog {
        &self.catalog
    }

    /// Block stored at `cell`, or `None` outside the board.
    #[must_use]
    pub fn block_at(&self, cell: GridPos) -> Option<BlockId> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Reports whether `cell` lies on the board.
    #[must_use]
    pub const fn in_range(&self, cell: GridPos) -> bool {
        cell.row() < self.height && cell.column() < self.width
    }

    /// Reports whether `cell` holds a solid block.
    ///
    /// Cells outside the board read as non-solid; range is a separate
    /// question answered by [`Grid::in_range`].
    #[must_use]
    pub fn is_solid(&self, cell: GridPos) -> bool {
        match self.index(cell) {
            Some(index) => self.catalog.is_solid(self.cells[index]),
            None => false,
        }
    }

    /// Reports whether `cell` can be entered this turn.
    ///
    /// A route cell lies on the board, holds a non-solid block, and is
    /// free of every chaser listed in `occupancy`.
    #[must_use]
    pub fn is_route(&self, cell: GridPos, occupancy: ChaserOccupancy<'_>) -> bool {
        self.in_range(cell) && !self.is_solid(cell) && !occupancy.contains(cell)
    }

    /// Reports whether `cell` holds a pushable box.
    #[must_use]
    pub fn is_box(&self, cell: GridPos) -> bool {
        self.kind_at(cell) == Some(BlockKind::Box)
    }

    /// Reports whether `cell` holds an uncollected bonus.
    #[must_use]
    pub fn is_bonus(&self, cell: GridPos) -> bool {
        self.kind_at(cell) == Some(BlockKind::Bonus)
    }

    /// Enterable cells adjacent to `cell`, visited down, right, up, left.
    pub fn neighbors<'a>(
        &'a self,
        cell: GridPos,
        occupancy: ChaserOccupancy<'a>,
    ) -> impl Iterator<Item = GridPos> + 'a {
        Step::CARDINAL.into_iter().filter_map(move |step| {
            let candidate = cell.offset(step)?;
            self.is_route(candidate, occupancy).then_some(candidate)
        })
    }

    /// Slides the box on `from` one cell onto `to`.
    ///
    /// Callers prove that `from` holds a box and `to` is a free route
    /// cell before committing the move; the slide itself re-checks
    /// nothing beyond debug assertions.
    pub fn push_box(&mut self, from: GridPos, to: GridPos) {
        debug_assert!(self.is_box(from), "push must start on a box");
        debug_assert!(
            self.in_range(to) && !self.is_solid(to),
            "push must end on a free cell"
        );
        let (Some(origin), Some(destination)) = (self.index(from), self.index(to)) else {
            return;
        };
        self.cells[destination] = self.cells[origin];
        self.cells[origin] = self.catalog.air();
    }

    /// Collects the bonus on `cell`, leaving air behind.
    ///
    /// Returns `false` when the cell holds no bonus, so repeat visits
    /// award nothing.
    pub fn consume_bonus(&mut self, cell: GridPos) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        if self.catalog.kind_of(self.cells[index]) != BlockKind::Bonus {
            return false;
        }
        self.cells[index] = self.catalog.air();
        true
    }

    pub(crate) fn index(&self, cell: GridPos) -> Option<usize> {
        if self.in_range(cell) {
            Some((cell.row() as usize) * (self.width as usize) + cell.column() as usize)
        } else {
            None
        }
    }

    pub(crate) fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn kind_at(&self, cell: GridPos) -> Option<BlockKind> {
        self.block_at(cell).map(|id| self.catalog.kind_of(id))
    }
}
