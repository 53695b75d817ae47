//! The falling piece, its moves, and the timed game loop around them.
//!
//! - [`ActivePiece`] - shape, rotation and center of the falling piece
//! - [`movement`] - collision checks, translation and rotation
//! - [`ShapeGenerator`] / [`PieceSeed`] - seeded lookahead of the next shape
//! - [`GameStats`] / [`score_delta`] - scoring and per-session counters
//! - [`GameConfig`] - board size and drop interval of a session
//! - [`GameSession`] - the state machine that owns time
//!
//! # Game Flow
//!
//! 1. [`GameSession::configure`] validates the setup; the session is `Waiting`
//! 2. [`GameSession::start_session`] spawns the lookahead shape
//! 3. Each elapsed drop interval moves the piece down, or locks it when it
//!    cannot fall
//! 4. A lock that fills rows clears them, pauses, compacts, pauses again
//! 5. The next shape spawns; if its cells are taken, the game is over
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use tilefall_engine::{GameConfig, GameEvent, GameSession};
//!
//! let mut session = GameSession::configure(GameConfig::DEFAULT).unwrap();
//! session.start_session();
//!
//! while !session.progress().is_game_over() {
//!     session.rotate_cw();
//!     session.advance(Duration::from_millis(400)).unwrap();
//! }
//!
//! let over = session
//!     .drain_events()
//!     .any(|event| matches!(event, GameEvent::GameOver { .. }));
//! assert!(over);
//! ```

pub use self::{
    active_piece::*, config::*, event::*, game_session::*, game_stats::*, shape_generator::*,
};

mod active_piece;
mod config;
mod event;
mod game_session;
mod game_stats;
pub mod movement;
mod shape_generator;
