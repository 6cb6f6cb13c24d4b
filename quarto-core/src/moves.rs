use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Location, PieceId};

/// A move in the game.
///
/// Moves carry no legality of their own; [`crate::Game::check_move`] decides
/// whether one fits the current state.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Move {
    /// Hand the opponent their first piece. Only valid as the opening move.
    SelectPiece(PieceId),
    /// Place the pending piece and hand the opponent the next one.
    /// `next` is None only when the placement ends the game.
    PlaceAndSelect {
        location: Location,
        next: Option<PieceId>,
    },
}

impl Move {
    #[inline]
    pub fn select(piece: PieceId) -> Move {
        Move::SelectPiece(piece)
    }

    #[inline]
    pub fn place(location: Location, next: Option<PieceId>) -> Move {
        Move::PlaceAndSelect { location, next }
    }

    /// True for the opening selection, which has no location.
    #[inline]
    pub fn is_first_move(&self) -> bool {
        matches!(self, Move::SelectPiece(_))
    }

    /// Get the target field, if this move places a piece.
    #[inline]
    pub fn location(&self) -> Option<Location> {
        match self {
            Move::SelectPiece(_) => None,
            Move::PlaceAndSelect { location, .. } => Some(*location),
        }
    }

    /// Get the piece handed to the opponent, if any.
    #[inline]
    pub fn next_piece(&self) -> Option<PieceId> {
        match self {
            Move::SelectPiece(piece) => Some(*piece),
            Move::PlaceAndSelect { next, .. } => *next,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::SelectPiece(piece) => write!(f, "select {}", piece),
            Move::PlaceAndSelect {
                location,
                next: Some(next),
            } => write!(f, "place at {}, select {}", location, next),
            Move::PlaceAndSelect { location, next: None } => write!(f, "place at {}", location),
        }
    }
}
