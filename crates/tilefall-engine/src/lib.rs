pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Errors raised by grid access and mutation.
///
/// None of these are part of normal play: they indicate a caller defect (bad
/// dimensions, bad coordinates) or an internal one (a write that would break a
/// board invariant). Every multi-cell write validates all of its cells before
/// touching any, so an error always leaves the grid as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    #[display("invalid board dimensions {width}x{height}: each side must be 3 to 2^31-1 cells")]
    InvalidDimensions { width: usize, height: usize },
    #[display("cell ({x}, {y}) is outside the {width}x{height} board")]
    OutOfRange {
        x: i32,
        y: i32,
        width: usize,
        height: usize,
    },
    #[display("board invariant violated")]
    InvariantViolation(InvariantViolation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum InvariantViolation {
    #[display("wall cell at ({x}, {y}) cannot be overwritten")]
    WallOverwrite { x: i32, y: i32 },
    #[display("interior cell at ({x}, {y}) cannot become a wall")]
    WallCreation { x: i32, y: i32 },
    #[display("piece cell at ({x}, {y}) overlaps a {kind:?} cell")]
    PieceOverlap { x: i32, y: i32, kind: CellKind },
}

/// Setup failure reported by [`GameSession::configure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid board setup")]
    Board(BoardError),
    #[display("drop interval must be greater than zero")]
    InvalidDropInterval,
}

/// Signal that a freshly spawned piece would overlap settled cells.
///
/// This is how a session learns it is over; the game loop consumes it and
/// never hands it to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("spawn position is occupied")]
pub struct SpawnBlocked;
