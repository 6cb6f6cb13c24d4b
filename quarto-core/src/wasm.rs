//! WASM bindings for quarto-core
//!
//! Provides a JavaScript-friendly API for the game logic.

use wasm_bindgen::prelude::*;

use crate::{Game, Location, Move, Outcome, PieceId, Player};

/// WASM-friendly wrapper around Game
#[wasm_bindgen]
pub struct WasmGame {
    inner: Game,
}

#[wasm_bindgen]
impl WasmGame {
    /// Start a new game. Any value other than 2 lets player 1 start.
    #[wasm_bindgen(constructor)]
    pub fn new(starting_player: u8) -> WasmGame {
        let player = Player::from_bits(starting_player).unwrap_or(Player::One);
        WasmGame {
            inner: Game::new(player),
        }
    }

    /// Current player (1 or 2)
    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.inner.current_player() as u8
    }

    /// Id of the piece to place, or -1 if none is pending
    #[wasm_bindgen(js_name = pendingPiece)]
    pub fn pending_piece(&self) -> i32 {
        self.inner.pending_piece().map_or(-1, |id| id.0 as i32)
    }

    /// Ids still available for selection
    #[wasm_bindgen(js_name = availablePieces)]
    pub fn available_pieces(&self) -> Vec<u8> {
        self.inner.available_pieces().map(|id| id.0).collect()
    }

    /// Piece id at (row, col), or -1 if the field is empty
    #[wasm_bindgen(js_name = fieldAt)]
    pub fn field_at(&self, row: u8, col: u8) -> i32 {
        self.inner
            .board()
            .field_at(row as usize, col as usize)
            .map_or(-1, |piece| piece.id().0 as i32)
    }

    /// Attributes of a piece as { size, shape, colour, fill }, or null
    #[wasm_bindgen(js_name = pieceInfo)]
    pub fn piece_info(&self, id: u8) -> JsValue {
        match self.inner.piece(PieceId(id)) {
            Some(piece) => serde_wasm_bindgen::to_value(&piece).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// Opening move. Returns an error message, or "" on success.
    #[wasm_bindgen(js_name = selectPiece)]
    pub fn select_piece(&mut self, piece: u8) -> String {
        self.apply(Move::select(PieceId(piece)))
    }

    /// Place the pending piece and hand over `next` (16 for none).
    /// Returns an error message, or "" on success.
    #[wasm_bindgen(js_name = placeAndSelect)]
    pub fn place_and_select(&mut self, location: u8, next: u8) -> String {
        let next = (next != crate::protocol::NO_PIECE).then_some(PieceId(next));
        self.apply(Move::place(Location(location), next))
    }

    /// Legal moves as JSON array
    #[wasm_bindgen(js_name = validMoves)]
    pub fn valid_moves(&self) -> JsValue {
        let moves: Vec<WasmMove> = self
            .inner
            .valid_moves()
            .into_iter()
            .map(WasmMove::from)
            .collect();
        serde_wasm_bindgen::to_value(&moves).unwrap_or(JsValue::NULL)
    }

    /// Check if game is over (winner or full board)
    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.inner.is_game_over()
    }

    /// Returns 0 (none), 1 (P1), or 2 (P2)
    pub fn winner(&self) -> u8 {
        self.inner.winner().map_or(0, |p| p as u8)
    }

    /// Winning line as [row, col, row, col, ...], empty if no winner
    #[wasm_bindgen(js_name = winningLine)]
    pub fn winning_line(&self) -> Vec<u8> {
        self.inner
            .board()
            .winning_line()
            .map(|line| {
                line.iter()
                    .flat_map(|loc| [loc.row() as u8, loc.col() as u8])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get game result: "ongoing", "player_one_wins", "player_two_wins", or "draw"
    pub fn result(&self) -> String {
        match self.inner.outcome() {
            None => "ongoing",
            Some(Outcome::Winner(Player::One)) => "player_one_wins",
            Some(Outcome::Winner(Player::Two)) => "player_two_wins",
            Some(Outcome::Draw) => "draw",
        }
        .to_string()
    }

    /// Clone the game
    #[wasm_bindgen(js_name = clone)]
    pub fn clone_game(&self) -> WasmGame {
        WasmGame {
            inner: self.inner.clone(),
        }
    }
}

impl WasmGame {
    fn apply(&mut self, mov: Move) -> String {
        match self.inner.do_move(mov) {
            Ok(_) => String::new(),
            Err(err) => err.to_string(),
        }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Serializable move for JavaScript
#[derive(serde::Serialize)]
struct WasmMove {
    location: Option<[u8; 2]>,
    piece: Option<u8>,
}

impl From<Move> for WasmMove {
    fn from(mov: Move) -> Self {
        WasmMove {
            location: mov.location().map(|loc| [loc.row() as u8, loc.col() as u8]),
            piece: mov.next_piece().map(|id| id.0),
        }
    }
}
