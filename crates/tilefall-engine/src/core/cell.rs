/// What occupies a single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, derive_more::IsVariant)]
pub enum CellKind {
    /// Nothing in the cell.
    #[default]
    Empty,
    /// Indestructible border cell.
    Wall,
    /// Part of a locked piece.
    Settled,
    /// Part of the active (falling) piece.
    Falling,
}

impl CellKind {
    /// Returns `true` if a falling piece cannot enter a cell of this kind.
    #[must_use]
    pub const fn is_blocking(self) -> bool {
        matches!(self, CellKind::Wall | CellKind::Settled)
    }
}

/// A single grid cell: its kind plus the color index of whatever occupies it.
///
/// The color index of an empty cell is meaningless and always normalized to 0,
/// so two empty cells compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    kind: CellKind,
    color: u8,
}

impl Cell {
    pub const EMPTY: Self = Self {
        kind: CellKind::Empty,
        color: 0,
    };
    pub const WALL: Self = Self {
        kind: CellKind::Wall,
        color: 0,
    };

    #[must_use]
    pub const fn new(kind: CellKind, color: u8) -> Self {
        match kind {
            CellKind::Empty => Self::EMPTY,
            _ => Self { kind, color },
        }
    }

    /// Returns what occupies the cell.
    #[must_use]
    pub const fn kind(self) -> CellKind {
        self.kind
    }

    /// Returns the color index; always 0 for empty cells.
    #[must_use]
    pub const fn color(self) -> u8 {
        self.color
    }

    /// Text form used by [`Board`](super::Board)'s `Display` impl.
    ///
    /// Settled cells print their color digit (1-9), or `#` for any other color.
    #[must_use]
    pub fn as_char(self) -> char {
        match self.kind {
            CellKind::Empty => '.',
            CellKind::Wall => 'W',
            CellKind::Falling => '@',
            CellKind::Settled => match self.color {
                1..=9 => char::from(b'0' + self.color),
                _ => '#',
            },
        }
    }
}
