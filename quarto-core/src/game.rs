//! Turn order and move validation.
//!
//! A game runs through three phases:
//!
//! ```text
//! AwaitingFirstSelection --SelectPiece--> InTurn --PlaceAndSelect--> InTurn
//!                                            \
//!                                             `--(win or full board)--> GameOver
//! ```
//!
//! Every accepted move flips the current player exactly once and removes
//! exactly one id from the available pool, except a closing placement that
//! hands nothing over.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{Board, Location, Move, MoveError, Piece, PieceId, PiecePool, Player};

/// How a finished game ended.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Winner(Player),
    Draw,
}

/// Where the game is in its turn cycle.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// No piece has been selected yet.
    AwaitingFirstSelection,
    /// A piece is pending and must be placed.
    InTurn,
    GameOver,
}

/// A single Quarto match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    current_player: Player,
    /// Piece the current player must place. None before the opening
    /// selection and after a closing placement that handed nothing over.
    pending: Option<PieceId>,
    pool: PiecePool,
    outcome: Option<Outcome>,
    history: Vec<Move>,
}

impl Game {
    /// Start a game with an empty board and all 16 pieces available.
    #[instrument]
    pub fn new(starting_player: Player) -> Game {
        Game {
            board: Board::new(),
            current_player: starting_player,
            pending: None,
            pool: PiecePool::new(),
            outcome: None,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn pool(&self) -> &PiecePool {
        &self.pool
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Id of the piece that must be placed next.
    pub fn pending_piece(&self) -> Option<PieceId> {
        self.pending
    }

    /// Look up any of the 16 pieces by id.
    pub fn piece(&self, id: PieceId) -> Option<Piece> {
        self.pool.piece(id)
    }

    /// Ids neither placed nor pending, ascending.
    pub fn available_pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pool.available()
    }

    /// Every accepted move so far.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn phase(&self) -> Phase {
        if self.outcome.is_some() {
            Phase::GameOver
        } else if self.pending.is_none() {
            Phase::AwaitingFirstSelection
        } else {
            Phase::InTurn
        }
    }

    /// The player who completed a winning line, if any.
    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Some(Outcome::Winner(player)) => Some(player),
            _ => None,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Check a move against the current state without changing anything.
    pub fn check_move(&self, mov: &Move) -> Result<(), MoveError> {
        if self.outcome.is_some() {
            return Err(MoveError::GameAlreadyOver);
        }

        // A used-up piece is reported as such whatever the phase.
        if let Some(id) = mov.next_piece() {
            if !self.pool.contains(id) {
                return Err(MoveError::PieceNotAvailable(id));
            }
        }

        match (*mov, self.pending) {
            (Move::SelectPiece(_), None) => Ok(()),
            (Move::PlaceAndSelect { location, next }, Some(pending)) => {
                if !self.board.is_field(location) {
                    return Err(MoveError::OutOfBoundsField(location));
                }
                if !self.board.is_empty_field(location) {
                    return Err(MoveError::OccupiedField(location));
                }
                match next {
                    Some(_) => Ok(()),
                    None if self.pool.is_empty() || self.placement_wins(location, pending) => Ok(()),
                    None => Err(MoveError::MissingNextPiece),
                }
            }
            _ => Err(MoveError::WrongPhase),
        }
    }

    /// True if the move would be accepted.
    pub fn is_valid_move(&self, mov: &Move) -> bool {
        self.check_move(mov).is_ok()
    }

    /// Would placing the pending piece here complete a winning line?
    fn placement_wins(&self, location: Location, pending: PieceId) -> bool {
        let Some(piece) = self.pool.piece(pending) else {
            return false;
        };
        let mut board = self.board;
        board.set_field(location, piece).is_ok() && board.has_winner()
    }

    /// Validate and apply a move.
    ///
    /// On error nothing changes. On success returns the outcome if this move
    /// ended the game.
    #[instrument(skip(self), fields(player = ?self.current_player))]
    pub fn do_move(&mut self, mov: Move) -> Result<Option<Outcome>, MoveError> {
        if let Err(err) = self.check_move(&mov) {
            warn!(%err, "move rejected");
            return Err(err);
        }

        let mover = self.current_player;
        match mov {
            Move::SelectPiece(id) => {
                self.pool.take(id);
                self.pending = Some(id);
            }
            Move::PlaceAndSelect { location, next } => {
                let pending = self.pending.ok_or(MoveError::WrongPhase)?;
                let piece = self
                    .pool
                    .piece(pending)
                    .ok_or(MoveError::PieceNotAvailable(pending))?;
                self.board.set_field(location, piece)?;

                if let Some(id) = next {
                    self.pool.take(id);
                }
                self.pending = next;

                if self.board.has_winner() {
                    self.outcome = Some(Outcome::Winner(mover));
                } else if self.board.is_full() {
                    self.outcome = Some(Outcome::Draw);
                }
            }
        }

        self.history.push(mov);
        self.current_player = mover.opponent();
        debug!(available = self.pool.len(), pending = ?self.pending, "move applied");

        if let Some(outcome) = self.outcome {
            info!(?outcome, moves = self.history.len(), "game over");
        }
        Ok(self.outcome)
    }

    /// Every move that [`Game::check_move`] would accept right now.
    pub fn valid_moves(&self) -> Vec<Move> {
        if self.outcome.is_some() {
            return Vec::new();
        }

        let Some(pending) = self.pending else {
            return self.pool.available().map(Move::SelectPiece).collect();
        };

        let mut moves = Vec::new();
        for location in self.board.empty_fields() {
            if self.pool.is_empty() || self.placement_wins(location, pending) {
                moves.push(Move::place(location, None));
            }
            for id in self.pool.available() {
                moves.push(Move::place(location, Some(id)));
            }
        }
        moves
    }
}
