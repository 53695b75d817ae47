use arrayvec::ArrayVec;

use crate::{
    SpawnBlocked,
    core::{Board, CellKind, MAX_SHAPE_CELLS, Offset, Position, Rotation, ShapeId, rotate_offsets},
};

/// Absolute cells covered by a piece.
pub type OccupiedCells = ArrayVec<Position, MAX_SHAPE_CELLS>;

/// The falling piece: shape, rotation and center cell.
///
/// Occupied cells are never stored; they are derived from these three values
/// on every call to [`ActivePiece::occupied_cells`]. An `ActivePiece` is a
/// small `Copy` value; [`movement`](super::movement) keeps it and the board's
/// falling cells in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    shape: ShapeId,
    rotation: Rotation,
    center: Position,
}

impl ActivePiece {
    #[must_use]
    pub const fn new(shape: ShapeId, rotation: Rotation, center: Position) -> Self {
        Self {
            shape,
            rotation,
            center,
        }
    }

    /// Center every piece spawns at: the middle column, three rows below the top.
    ///
    /// Board sides never exceed [`Board::MAX_SIZE`], so both casts are exact.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn spawn_position(board: &Board) -> Position {
        Position::new((board.width() / 2) as i32, (board.height() - 3) as i32)
    }

    /// Places `shape` at the spawn position with rotation 0 and marks its cells falling.
    ///
    /// Fails with [`SpawnBlocked`] when any target cell is settled. A board too
    /// small to hold the shape (a target cell is a wall or off the grid) is
    /// treated the same way. Nothing is written on failure.
    ///
    /// # Example
    ///
    /// ```
    /// use tilefall_engine::{ActivePiece, Board, CellKind, Position, ShapeId};
    ///
    /// let mut board = Board::new(12, 22).unwrap();
    /// let piece = ActivePiece::spawn(ShapeId::new(6).unwrap(), &mut board).unwrap();
    ///
    /// assert_eq!(piece.center(), Position::new(6, 19));
    /// assert_eq!(board.count(CellKind::Falling), 4);
    /// ```
    pub fn spawn(shape: ShapeId, board: &mut Board) -> Result<Self, SpawnBlocked> {
        let piece = Self::new(shape, Rotation::SPAWN, Self::spawn_position(board));
        let cells = piece.occupied_cells();
        let fits = cells
            .iter()
            .all(|&pos| board.get(pos).is_some_and(|cell| !cell.kind().is_blocking()));
        if !fits {
            return Err(SpawnBlocked);
        }
        board
            .replace_cells(&[], &cells, CellKind::Falling, piece.color())
            .map_err(|_| SpawnBlocked)?;
        Ok(piece)
    }

    /// Returns the catalog shape of this piece.
    #[must_use]
    pub const fn shape(&self) -> ShapeId {
        self.shape
    }

    /// Returns the current rotation, already resolved by the shape's rotation class.
    #[must_use]
    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Returns the center cell the shape is laid out and rotated around.
    #[must_use]
    pub const fn center(&self) -> Position {
        self.center
    }

    #[must_use]
    pub const fn color(&self) -> u8 {
        self.shape.color()
    }

    /// Recomputes the absolute cells from shape, rotation and center.
    #[must_use]
    pub fn occupied_cells(&self) -> OccupiedCells {
        Self::cells_at(self.shape, self.rotation, self.center)
    }

    /// Cells `shape` would cover at `rotation` around `center`.
    #[must_use]
    pub fn cells_at(shape: ShapeId, rotation: Rotation, center: Position) -> OccupiedCells {
        rotate_offsets(shape.offsets(), rotation.steps())
            .map(|offset| center + offset)
            .collect()
    }

    /// Returns the same piece moved by `offset`. The board is not touched.
    #[must_use]
    pub fn translated(self, offset: Offset) -> Self {
        Self {
            center: self.center + offset,
            ..self
        }
    }

    /// Returns the same piece at `rotation` around the unchanged center.
    #[must_use]
    pub fn with_rotation(self, rotation: Rotation) -> Self {
        Self { rotation, ..self }
    }
}
