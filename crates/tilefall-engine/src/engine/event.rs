use crate::core::ShapeId;

/// Something that happened inside a session, in the order it happened.
///
/// The session queues these instead of calling out; read them with
/// [`GameSession::drain_events`](super::GameSession::drain_events).
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum GameEvent {
    /// A piece entered the board; `next` is the refreshed lookahead.
    PieceSpawned { shape: ShapeId, next: ShapeId },
    PieceLocked { shape: ShapeId },
    /// Full rows were emptied, bottom first.
    LinesCleared { rows: Vec<usize> },
    /// Rows above the cleared ones were shifted down.
    RowsCompacted { rows: Vec<usize> },
    /// Points added by a clear: `amount` is already multiplied by the base.
    ScoreDelta { lines: usize, amount: usize },
    GameOver { reason: GameOverReason },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant, serde::Serialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GameOverReason {
    /// The next piece could not spawn.
    #[display("top out")]
    TopOut,
    #[display("quit")]
    Quit,
}

/// Player input accepted while a piece is falling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateCw,
    RotateCcw,
}

impl Command {
    pub const ALL: [Self; 5] = [
        Self::MoveLeft,
        Self::MoveRight,
        Self::SoftDrop,
        Self::RotateCw,
        Self::RotateCcw,
    ];
}
