//! Full-row detection, clearing and compaction.
//!
//! A lock resolves in two visible steps: [`clear_rows`] empties the full rows
//! in place, then (after a pause) [`compact_rows`] drops everything above them.

use super::{
    board::Board,
    cell::{Cell, CellKind},
};

/// Returns the interior rows whose interior cells are all settled, bottom first.
///
/// # Example
///
/// ```
/// use tilefall_engine::{Board, detect_full_rows};
///
/// let board = Board::from_ascii(
///     r"
///     .#..
///     #####
///     #.##
///     #####
///     ",
/// );
/// assert_eq!(detect_full_rows(&board), [1, 3]);
/// ```
#[must_use]
pub fn detect_full_rows(board: &Board) -> Vec<usize> {
    (1..board.height() - 1)
        .filter(|&y| {
            board
                .interior_row(y)
                .iter()
                .all(|cell| cell.kind().is_settled())
        })
        .collect()
}

/// Empties every interior cell of the given rows. Walls are untouched.
///
/// Indices outside the interior are ignored.
pub fn clear_rows(board: &mut Board, rows: &[usize]) {
    for &y in rows {
        if (1..board.height() - 1).contains(&y) {
            board.interior_row_mut(y).fill(Cell::EMPTY);
        }
    }
}

/// Drops settled cells into the space left by cleared `rows`.
///
/// Each settled cell in a surviving interior row `y` moves to
/// `y - shift`, where `shift` is the number of cleared rows below `y`. The
/// cells are copied into a separate staging grid that then replaces the board:
/// moving rows within a single grid would overwrite rows that have not been
/// read yet whenever cleared rows are not contiguous.
///
/// Only settled cells survive, so this must run while no piece is falling.
pub fn compact_rows(board: &mut Board, rows: &[usize]) {
    debug_assert_eq!(board.count(CellKind::Falling), 0);
    if rows.is_empty() {
        return;
    }

    let mut staging = Board::blank(board.width(), board.height());
    for y in 1..board.height() - 1 {
        if rows.contains(&y) {
            continue;
        }
        let shift = rows.iter().filter(|&&cleared| cleared < y).count();
        let target = staging.interior_row_mut(y - shift);
        for (dst, src) in target.iter_mut().zip(board.interior_row(y)) {
            if src.kind().is_settled() {
                *dst = *src;
            }
        }
    }
    *board = staging;
}
