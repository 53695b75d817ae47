//! Grid model, piece catalog and line clearing.
//!
//! Everything here is free of timing: the [`engine`](crate::engine) module
//! drives these pieces through the game loop.

pub use self::{board::*, cell::*, line_clear::*, piece::*};

pub(crate) mod board;
pub(crate) mod cell;
pub(crate) mod line_clear;
pub(crate) mod piece;
