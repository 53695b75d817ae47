use std::fmt;

use crate::{BoardError, InvariantViolation};

use super::{
    cell::{Cell, CellKind},
    piece::Position,
};

/// Fixed-size grid of cells bordered by walls.
///
/// Coordinates follow [`Position`]: `(0, 0)` is the bottom-left corner and y
/// grows upward. Row 0, the last row, column 0 and the last column are walls
/// for the lifetime of the board; the interior holds empty, settled and
/// falling cells.
///
/// The board is also the read-only snapshot handed to renderers. Since every
/// mutation goes through `&mut Board`, a reader holding `&Board` (or a clone)
/// never sees a half-applied move, rotation, clear or compaction.
///
/// # Example
///
/// ```
/// use tilefall_engine::{Board, CellKind};
///
/// let board = Board::new(12, 22).unwrap();
/// assert_eq!(board.cell_at(0, 5).unwrap().kind(), CellKind::Wall);
/// assert_eq!(board.cell_at(5, 5).unwrap().kind(), CellKind::Empty);
/// assert!(board.cell_at(12, 5).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Smallest width or height that still leaves an interior.
    pub const MIN_SIZE: usize = 3;
    /// Largest width or height: coordinates are `i32`, so this is `i32::MAX`.
    pub const MAX_SIZE: usize = 0x7fff_ffff;

    /// Allocates a `width × height` grid with walls on the border and an empty interior.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        Self::check_dimensions(width, height)?;
        Ok(Self::blank(width, height))
    }

    /// Checks that a `width × height` grid has an interior and can be
    /// addressed with `i32` coordinates and a `usize` cell count.
    pub fn check_dimensions(width: usize, height: usize) -> Result<(), BoardError> {
        let sizes = Self::MIN_SIZE..=Self::MAX_SIZE;
        let fits = sizes.contains(&width)
            && sizes.contains(&height)
            && width
                .checked_mul(height)
                .and_then(|cells| cells.checked_mul(size_of::<Cell>()))
                .is_some_and(|bytes| isize::try_from(bytes).is_ok());
        if fits {
            Ok(())
        } else {
            Err(BoardError::InvalidDimensions { width, height })
        }
    }

    /// Replaces this board with a fresh `width × height` grid.
    ///
    /// On failure the current grid is kept.
    pub fn reset(&mut self, width: usize, height: usize) -> Result<(), BoardError> {
        *self = Self::new(width, height)?;
        Ok(())
    }

    /// Builds a walled, empty grid. Dimensions must already be validated.
    pub(super) fn blank(width: usize, height: usize) -> Self {
        debug_assert!(width >= Self::MIN_SIZE && height >= Self::MIN_SIZE);
        let mut cells = vec![Cell::EMPTY; width * height];
        for y in 0..height {
            for x in 0..width {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    cells[y * width + x] = Cell::WALL;
                }
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Returns the grid width, walls included.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the grid height, walls included.
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of non-wall columns.
    #[must_use]
    pub fn interior_width(&self) -> usize {
        self.width - 2
    }

    /// Number of non-wall rows.
    #[must_use]
    pub fn interior_height(&self) -> usize {
        self.height - 2
    }

    /// Returns `true` if `pos` lies inside `[0, width) × [0, height)`.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let x = usize::try_from(pos.x()).ok()?;
        let y = usize::try_from(pos.y()).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    fn checked_index(&self, pos: Position) -> Result<usize, BoardError> {
        self.index(pos).ok_or(BoardError::OutOfRange {
            x: pos.x(),
            y: pos.y(),
            width: self.width,
            height: self.height,
        })
    }

    /// Returns the cell at `pos`, or `None` outside the grid.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Bounds-checked read.
    pub fn cell_at(&self, x: i32, y: i32) -> Result<Cell, BoardError> {
        let i = self.checked_index(Position::new(x, y))?;
        Ok(self.cells[i])
    }

    /// Bounds-checked write.
    ///
    /// Walls never change: writing to a wall cell, or turning an interior cell
    /// into a wall, is rejected as an invariant violation.
    pub fn set_cell(
        &mut self,
        x: i32,
        y: i32,
        kind: CellKind,
        color: u8,
    ) -> Result<(), BoardError> {
        let i = self.checked_index(Position::new(x, y))?;
        if self.cells[i].kind().is_wall() {
            return Err(BoardError::InvariantViolation(
                InvariantViolation::WallOverwrite { x, y },
            ));
        }
        if kind.is_wall() {
            return Err(BoardError::InvariantViolation(
                InvariantViolation::WallCreation { x, y },
            ));
        }
        self.cells[i] = Cell::new(kind, color);
        Ok(())
    }

    /// Moves a set of piece cells in one step.
    ///
    /// Every cell in `old` becomes empty and every cell in `new` becomes
    /// `kind` with `color`. All coordinates are checked first, and a cell in
    /// `new` may not be a wall or a settled cell; if anything fails nothing is
    /// written.
    pub(crate) fn replace_cells(
        &mut self,
        old: &[Position],
        new: &[Position],
        kind: CellKind,
        color: u8,
    ) -> Result<(), BoardError> {
        if kind.is_wall() {
            let pos = new.first().copied().unwrap_or_default();
            return Err(BoardError::InvariantViolation(
                InvariantViolation::WallCreation {
                    x: pos.x(),
                    y: pos.y(),
                },
            ));
        }
        for &pos in old {
            let i = self.checked_index(pos)?;
            if self.cells[i].kind().is_wall() {
                return Err(BoardError::InvariantViolation(
                    InvariantViolation::WallOverwrite {
                        x: pos.x(),
                        y: pos.y(),
                    },
                ));
            }
        }
        for &pos in new {
            let i = self.checked_index(pos)?;
            let existing = self.cells[i].kind();
            if existing.is_blocking() {
                return Err(BoardError::InvariantViolation(
                    InvariantViolation::PieceOverlap {
                        x: pos.x(),
                        y: pos.y(),
                        kind: existing,
                    },
                ));
            }
        }

        for &pos in old {
            if let Some(i) = self.index(pos) {
                self.cells[i] = Cell::EMPTY;
            }
        }
        for &pos in new {
            if let Some(i) = self.index(pos) {
                self.cells[i] = Cell::new(kind, color);
            }
        }
        Ok(())
    }

    /// Empties every falling cell.
    pub(crate) fn clear_falling(&mut self) {
        for cell in &mut self.cells {
            if cell.kind().is_falling() {
                *cell = Cell::EMPTY;
            }
        }
    }

    /// Rows from the bottom (y = 0) to the top, walls included.
    pub fn rows(&self) -> impl DoubleEndedIterator<Item = &[Cell]> + ExactSizeIterator {
        self.cells.chunks_exact(self.width)
    }

    /// Interior cells of row `y` (walls excluded).
    pub(super) fn interior_row(&self, y: usize) -> &[Cell] {
        let start = y * self.width;
        &self.cells[start + 1..start + self.width - 1]
    }

    pub(super) fn interior_row_mut(&mut self, y: usize) -> &mut [Cell] {
        let start = y * self.width;
        &mut self.cells[start + 1..start + self.width - 1]
    }

    /// Counts cells of the given kind, walls included.
    #[must_use]
    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|c| c.kind() == kind).count()
    }

    /// Builds a board from its interior rows, listed top to bottom.
    ///
    /// `.` is an empty cell, `#` a settled cell with color 0, and a digit
    /// `1`-`9` a settled cell with that color. Whitespace is ignored; blank
    /// lines are skipped. Walls are added around the given rows.
    ///
    /// # Panics
    ///
    /// Panics on an unknown character, ragged rows or an empty picture.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<Vec<char>> = art
            .lines()
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .collect::<Vec<_>>()
            })
            .filter(|line| !line.is_empty())
            .collect();
        assert!(!lines.is_empty(), "board picture has no rows");
        let interior_width = lines[0].len();
        let mut board = Self::blank(interior_width + 2, lines.len() + 2);

        for (i, line) in lines.iter().enumerate() {
            assert_eq!(
                line.len(),
                interior_width,
                "every row must have {interior_width} cells, row {i} has {}",
                line.len()
            );
            let y = board.height - 2 - i;
            for (x, &ch) in line.iter().enumerate() {
                let cell = match ch {
                    '.' => Cell::EMPTY,
                    '#' => Cell::new(CellKind::Settled, 0),
                    '1'..='9' => Cell::new(CellKind::Settled, ch as u8 - b'0'),
                    _ => panic!("unexpected cell character {ch:?} at row {i}"),
                };
                board.interior_row_mut(y)[x] = cell;
            }
        }
        board
    }
}

/// Renders the whole grid top to bottom, one line per row.
///
/// `W` is a wall, `.` empty, `@` falling, and settled cells print their color
/// digit (or `#`).
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows().rev() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
