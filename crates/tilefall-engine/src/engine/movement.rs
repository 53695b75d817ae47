//! Collision checks and the moves that pass them.
//!
//! Each move computes its target cells, checks them against the board, and
//! only then rewrites the falling cells in one [`Board`] call. A rejected move
//! leaves both the piece and the board exactly as they were.

use crate::{
    BoardError,
    core::{Board, CellKind, Offset, Position, effective_rotation},
};

use super::active_piece::ActivePiece;

/// Direction of a rotation command.
///
/// One catalog rotation step turns a shape counterclockwise, so
/// counterclockwise adds a step and clockwise removes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    #[must_use]
    pub const fn step(self) -> i32 {
        match self {
            RotationDirection::Clockwise => -1,
            RotationDirection::CounterClockwise => 1,
        }
    }
}

fn is_open(board: &Board, pos: Position) -> bool {
    board
        .get(pos)
        .is_some_and(|cell| !cell.kind().is_blocking())
}

/// Returns `true` if every cell of `piece` moved by `offset` is free of walls
/// and settled cells.
///
/// Cells off the grid count as blocked.
#[must_use]
pub fn can_translate(piece: &ActivePiece, board: &Board, offset: Offset) -> bool {
    piece
        .occupied_cells()
        .iter()
        .all(|&pos| is_open(board, pos + offset))
}

/// Moves `piece` by `offset`, rewriting its falling cells.
///
/// Call after [`can_translate`]; a blocked move is reported as an error and
/// changes nothing.
pub fn translate(
    piece: &mut ActivePiece,
    board: &mut Board,
    offset: Offset,
) -> Result<(), BoardError> {
    let moved = piece.translated(offset);
    board.replace_cells(
        &piece.occupied_cells(),
        &moved.occupied_cells(),
        CellKind::Falling,
        piece.color(),
    )?;
    *piece = moved;
    Ok(())
}

/// Checks then moves; returns whether the move happened.
pub fn try_translate(piece: &mut ActivePiece, board: &mut Board, offset: Offset) -> bool {
    can_translate(piece, board, offset) && translate(piece, board, offset).is_ok()
}

/// Returns `true` if every candidate cell is on the grid and free of walls and
/// settled cells.
#[must_use]
pub fn can_rotate(board: &Board, candidate: &[Position]) -> bool {
    candidate
        .iter()
        .all(|&pos| board.contains(pos) && is_open(board, pos))
}

/// Rotates `piece` one step around its unchanged center, if the result fits.
///
/// The requested rotation is resolved through [`effective_rotation`], so
/// shapes with a restricted rotation class only ever reach their allowed
/// rotations. Returns whether the piece changed.
pub fn rotate(piece: &mut ActivePiece, board: &mut Board, direction: RotationDirection) -> bool {
    let requested = piece.rotation().steps() + direction.step();
    let rotation = effective_rotation(piece.shape(), requested);
    if rotation == piece.rotation() {
        return false;
    }

    let rotated = piece.with_rotation(rotation);
    let candidate = rotated.occupied_cells();
    if !can_rotate(board, &candidate) {
        return false;
    }
    if board
        .replace_cells(
            &piece.occupied_cells(),
            &candidate,
            CellKind::Falling,
            piece.color(),
        )
        .is_err()
    {
        return false;
    }
    *piece = rotated;
    true
}
