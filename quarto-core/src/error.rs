use thiserror::Error;

use crate::{Location, PieceId};

/// Why a move was rejected.
///
/// Every variant is recoverable: the game state is untouched and the caller
/// can report the reason and ask for another move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// A first-move command while a piece is pending, or a placement before
    /// any piece has been selected.
    #[error("wrong kind of move for this phase of the game")]
    WrongPhase,

    #[error("location {0} is not on the board")]
    OutOfBoundsField(Location),

    #[error("location {0} is already occupied")]
    OccupiedField(Location),

    /// The id is out of range, already placed, or already pending.
    #[error("piece {0} is not available")]
    PieceNotAvailable(PieceId),

    /// A placement left the next piece out although the game goes on.
    #[error("a piece must be selected for the opponent")]
    MissingNextPiece,

    #[error("game is already over")]
    GameAlreadyOver,
}
