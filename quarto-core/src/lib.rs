//! Quarto rules engine.
//!
//! Quarto is played on a 4x4 board with 16 pieces, each a unique
//! combination of four binary attributes (size, shape, colour, fill).
//! Players take turns placing the piece their opponent picked for them and
//! then picking one for the opponent. Whoever completes a row, column or
//! diagonal of four pieces sharing at least one attribute wins.
//!
//! # Turn Shape
//!
//! ```text
//! Move 1:    SelectPiece(p)                  hand p to the opponent
//! Move n>1:  PlaceAndSelect(location, next)  place the pending piece,
//!                                            hand `next` to the opponent
//! ```
//!
//! The engine is synchronous and owns all of its state. Hosts that share a
//! [`Game`] between tasks must serialize access themselves (one lock per
//! game); validation and application are not atomic against interleaving.

mod board;
mod error;
mod game;
mod moves;
mod piece;
pub mod protocol;

#[cfg(feature = "wasm")]
pub mod wasm;

use serde::{Deserialize, Serialize};

pub use board::{Board, Location, DIM, FIELD_COUNT, LINES};
pub use error::MoveError;
pub use game::{Game, Outcome, Phase};
pub use moves::Move;
pub use piece::{Attribute, Colour, Fill, Piece, PieceId, PiecePool, Shape, Size, PIECE_COUNT};

/// Player identifier.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Player {
    One = 1,
    Two = 2,
}

impl Player {
    /// Get the opponent player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Convert from u8 (1 or 2) to Player.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Player> {
        match bits {
            1 => Some(Player::One),
            2 => Some(Player::Two),
            _ => None,
        }
    }
}
