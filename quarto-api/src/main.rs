//! Quarto Web API
//!
//! Serves a single in-memory Quarto game over REST. The rules live in
//! quarto-core; this binary only keeps the session history (undo, redo,
//! goto), translates JSON to moves, and passes `~`-delimited protocol
//! lines through to the game.
//!
//! Nothing is persisted: restarting the server starts a fresh game.

mod cli;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use quarto_core::protocol::Message;
use quarto_core::{
    Game, Location, Move, MoveError, Outcome, Phase, Piece, PieceId, Player, DIM,
};

use crate::cli::Cli;

// =============================================================================
// Session State
// =============================================================================

/// Global game session state
struct GameSession {
    /// Snapshot after every accepted move (index 0 = fresh game)
    states: Vec<Game>,
    /// Current position in history
    current_index: usize,
    /// Player who opens new games
    starting_player: Player,
}

impl GameSession {
    fn new(starting_player: Player) -> Self {
        Self {
            states: vec![Game::new(starting_player)],
            current_index: 0,
            starting_player,
        }
    }

    fn current_game(&self) -> &Game {
        &self.states[self.current_index]
    }

    /// The furthest game reached, including moves that were undone.
    fn latest_game(&self) -> &Game {
        &self.states[self.states.len() - 1]
    }

    fn reset(&mut self, starting_player: Player) {
        *self = Self::new(starting_player);
    }

    fn can_undo(&self) -> bool {
        self.current_index > 0
    }

    fn can_redo(&self) -> bool {
        self.current_index < self.states.len() - 1
    }

    /// Apply a move at the cursor, dropping any undone moves after it.
    fn apply(&mut self, mov: Move) -> Result<Option<Outcome>, MoveError> {
        let mut game = self.current_game().clone();
        let outcome = game.do_move(mov)?;

        self.states.truncate(self.current_index + 1);
        self.states.push(game);
        self.current_index += 1;
        Ok(outcome)
    }
}

/// Shared application state
struct AppStateInner {
    session: Mutex<GameSession>,
}

impl AppStateInner {
    fn new(starting_player: Player) -> Self {
        Self {
            session: Mutex::new(GameSession::new(starting_player)),
        }
    }

    /// Lock the session. A panicked handler cannot leave a half-applied
    /// move behind, so a poisoned lock is still safe to use.
    fn session(&self) -> MutexGuard<'_, GameSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type AppState = Arc<AppStateInner>;

// =============================================================================
// JSON Models
// =============================================================================

#[derive(Serialize)]
struct PieceModel {
    id: u8,
    #[serde(flatten)]
    attributes: Piece,
}

#[derive(Serialize)]
struct PieceEntryModel {
    #[serde(flatten)]
    piece: PieceModel,
    available: bool,
}

#[derive(Serialize)]
struct GameStateModel {
    /// board[row][col], null for empty fields
    board: Vec<Vec<Option<PieceModel>>>,
    current_player: u8,
    pending_piece: Option<PieceModel>,
    available_pieces: Vec<u8>,
    phase: String,
    result: String,
    move_index: usize,
    can_undo: bool,
    can_redo: bool,
    /// The winning line as (row, col) pairs, if there's a winner
    #[serde(skip_serializing_if = "Option::is_none")]
    winning_line: Option<Vec<(usize, usize)>>,
}

/// Location absent means the opening selection.
#[derive(Deserialize)]
struct MoveRequest {
    location: Option<u8>,
    piece: Option<u8>,
}

#[derive(Deserialize, Default)]
struct ResetRequest {
    starting_player: Option<u8>,
}

#[derive(Serialize)]
struct HistoryEntryModel {
    index: usize,
    notation: String,
    description: String,
    player: u8,
}

#[derive(Serialize)]
struct HistoryModel {
    moves: Vec<HistoryEntryModel>,
    current_index: usize,
    total_moves: usize,
}

#[derive(Serialize)]
struct ExportModel {
    notation: String,
    starting_player: u8,
}

#[derive(Deserialize)]
struct ImportRequest {
    notation: String,
    starting_player: Option<u8>,
}

#[derive(Deserialize)]
struct ProtocolRequest {
    line: String,
}

#[derive(Serialize)]
struct ProtocolResponse {
    replies: Vec<String>,
}

#[derive(Serialize)]
struct HealthModel {
    status: String,
}

#[derive(Serialize)]
struct ErrorModel {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorModel>);

fn bad_request(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorModel {
            detail: detail.into(),
        }),
    )
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn piece_to_model(piece: Piece) -> PieceModel {
    PieceModel {
        id: piece.id().0,
        attributes: piece,
    }
}

fn phase_name(phase: Phase) -> &'static str {
    match phase {
        Phase::AwaitingFirstSelection => "awaiting_first_selection",
        Phase::InTurn => "in_turn",
        Phase::GameOver => "game_over",
    }
}

fn result_name(outcome: Option<Outcome>) -> &'static str {
    match outcome {
        None => "ongoing",
        Some(Outcome::Winner(Player::One)) => "player_one_wins",
        Some(Outcome::Winner(Player::Two)) => "player_two_wins",
        Some(Outcome::Draw) => "draw",
    }
}

/// Convert Game to JSON-serializable GameStateModel
fn game_to_model(game: &Game, session: &GameSession) -> GameStateModel {
    let board = (0..DIM)
        .map(|row| {
            (0..DIM)
                .map(|col| game.board().field_at(row, col).map(piece_to_model))
                .collect()
        })
        .collect();

    let winning_line = game.board().winning_line().map(|line| {
        line.iter()
            .map(|loc| (loc.row(), loc.col()))
            .collect()
    });

    GameStateModel {
        board,
        current_player: game.current_player() as u8,
        pending_piece: game
            .pending_piece()
            .and_then(|id| game.piece(id))
            .map(piece_to_model),
        available_pieces: game.available_pieces().map(|id| id.0).collect(),
        phase: phase_name(game.phase()).to_string(),
        result: result_name(game.outcome()).to_string(),
        move_index: session.current_index,
        can_undo: session.can_undo(),
        can_redo: session.can_redo(),
        winning_line,
    }
}

/// Parse MoveRequest to internal Move
fn request_to_move(req: &MoveRequest) -> Result<Move, String> {
    match (req.location, req.piece) {
        (Some(location), piece) => Ok(Move::place(Location(location), piece.map(PieceId))),
        (None, Some(piece)) => Ok(Move::select(PieceId(piece))),
        (None, None) => Err("Must specify location or piece".to_string()),
    }
}

/// Convert Move to its protocol line, e.g. `MOVE~5~3`
fn move_to_notation(mov: Move) -> String {
    Message::Move(mov).to_string()
}

/// Parse one protocol token back to a Move
fn notation_to_move(notation: &str) -> Result<Move, String> {
    match Message::parse(notation).map_err(|e| e.to_string())? {
        Message::Move(mov) => Ok(mov),
        other => Err(format!("expected MOVE, got {}", other.command())),
    }
}

fn player_from_request(bits: Option<u8>, default: Player) -> Result<Player, ApiError> {
    match bits {
        None => Ok(default),
        Some(bits) => Player::from_bits(bits)
            .ok_or_else(|| bad_request(format!("Invalid starting player: {}", bits))),
    }
}

/// Protocol lines announcing the end of the game, if it ended.
fn game_over_message(outcome: Option<Outcome>) -> Option<String> {
    let line = match outcome? {
        Outcome::Winner(player) => format!("GAMEOVER~VICTORY~{}", player as u8),
        Outcome::Draw => "GAMEOVER~DRAW".to_string(),
    };
    Some(line)
}

// =============================================================================
// API Endpoints
// =============================================================================

async fn get_game(State(state): State<AppState>) -> Json<GameStateModel> {
    let session = state.session();
    Json(game_to_model(session.current_game(), &session))
}

async fn get_pieces(State(state): State<AppState>) -> Json<Vec<PieceEntryModel>> {
    let session = state.session();
    let game = session.current_game();

    let pieces = Piece::all()
        .into_iter()
        .map(|piece| PieceEntryModel {
            available: game.pool().contains(piece.id()),
            piece: piece_to_model(piece),
        })
        .collect();
    Json(pieces)
}

async fn make_move(
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mov = request_to_move(&req).map_err(bad_request)?;

    let mut session = state.session();
    session.apply(mov).map_err(|e| bad_request(e.to_string()))?;
    debug!(%mov, index = session.current_index, "move accepted");

    Ok(Json(game_to_model(session.current_game(), &session)))
}

async fn reset_game(
    State(state): State<AppState>,
    req: Option<Json<ResetRequest>>,
) -> Result<Json<GameStateModel>, ApiError> {
    let req = req.map(|Json(req)| req).unwrap_or_default();
    let mut session = state.session();
    let starting_player = player_from_request(req.starting_player, session.starting_player)?;

    session.reset(starting_player);
    info!(?starting_player, "game reset");
    Ok(Json(game_to_model(session.current_game(), &session)))
}

async fn get_history(State(state): State<AppState>) -> Json<HistoryModel> {
    let session = state.session();

    let moves: Vec<HistoryEntryModel> = session
        .latest_game()
        .history()
        .iter()
        .enumerate()
        .map(|(i, mov)| HistoryEntryModel {
            index: i + 1,
            notation: move_to_notation(*mov),
            description: mov.to_string(),
            player: session.states[i].current_player() as u8,
        })
        .collect();

    Json(HistoryModel {
        total_moves: moves.len(),
        current_index: session.current_index,
        moves,
    })
}

async fn undo(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();

    if !session.can_undo() {
        return Err(bad_request("Nothing to undo"));
    }

    session.current_index -= 1;
    Ok(Json(game_to_model(session.current_game(), &session)))
}

async fn redo(State(state): State<AppState>) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();

    if !session.can_redo() {
        return Err(bad_request("Nothing to redo"));
    }

    session.current_index += 1;
    Ok(Json(game_to_model(session.current_game(), &session)))
}

async fn goto_move(
    State(state): State<AppState>,
    Path(move_index): Path<usize>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();

    if move_index >= session.states.len() {
        return Err(bad_request("Invalid move index"));
    }

    session.current_index = move_index;
    Ok(Json(game_to_model(session.current_game(), &session)))
}

/// Moves up to the cursor, as space-separated protocol lines.
async fn export_game(State(state): State<AppState>) -> Json<ExportModel> {
    let session = state.session();
    let notation = session
        .current_game()
        .history()
        .iter()
        .map(|mov| move_to_notation(*mov))
        .collect::<Vec<_>>()
        .join(" ");

    Json(ExportModel {
        notation,
        starting_player: session.starting_player as u8,
    })
}

/// Replay a notation from a fresh game. The session is only replaced if
/// every move is accepted.
async fn import_game(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<Json<GameStateModel>, ApiError> {
    let mut session = state.session();
    let starting_player = player_from_request(req.starting_player, session.starting_player)?;

    let mut replay = GameSession::new(starting_player);
    for (i, notation) in req.notation.split_whitespace().enumerate() {
        let mov = notation_to_move(notation)
            .map_err(|e| bad_request(format!("Move {}: {}", i + 1, e)))?;

        replay
            .apply(mov)
            .map_err(|e| bad_request(format!("Move {} ({}): {}", i + 1, notation, e)))?;
    }

    *session = replay;
    info!(moves = session.current_index, "game imported");
    Ok(Json(game_to_model(session.current_game(), &session)))
}

/// Pass one `~`-delimited protocol line to the game.
async fn protocol_line(
    State(state): State<AppState>,
    Json(req): Json<ProtocolRequest>,
) -> Json<ProtocolResponse> {
    let error = |detail: String| vec![Message::Error(Some(detail)).to_string()];

    let replies = match Message::parse(&req.line) {
        Err(e) => error(e.to_string()),
        Ok(Message::Hello { description, .. }) => {
            debug!(%description, "client hello");
            vec![Message::Hello {
                description: "quarto-api".to_string(),
                extensions: Vec::new(),
            }
            .to_string()]
        }
        Ok(Message::Move(mov)) => match state.session().apply(mov) {
            Ok(outcome) => std::iter::once(move_to_notation(mov))
                .chain(game_over_message(outcome))
                .collect(),
            Err(e) => error(e.to_string()),
        },
        Ok(other) => error(format!("{} is not supported here", other.command())),
    };

    Json(ProtocolResponse { replies })
}

async fn health() -> Json<HealthModel> {
    Json(HealthModel {
        status: "ok".to_string(),
    })
}

// =============================================================================
// Main
// =============================================================================

fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/game", get(get_game))
        .route("/pieces", get(get_pieces))
        .route("/move", post(make_move))
        .route("/reset", post(reset_game))
        .route("/history", get(get_history))
        .route("/undo", post(undo))
        .route("/redo", post(redo))
        .route("/goto/{move_index}", post(goto_move))
        .route("/export", get(export_game))
        .route("/import", post(import_game))
        .route("/protocol", post(protocol_line))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let starting_player =
        Player::from_bits(cli.starting_player).context("starting player must be 1 or 2")?;

    let state: AppState = Arc::new(AppStateInner::new(starting_player));

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, ?starting_player, "Quarto API running");

    axum::serve(listener, app(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        app(Arc::new(AppStateInner::new(Player::One)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Select 0, then fill row 0 with Red pieces; the last placement wins.
    async fn play_red_row(app: &Router) -> Value {
        send(app, "POST", "/move", Some(json!({"piece": 0}))).await;
        for (location, piece) in [(0, 1), (1, 4), (2, 5)] {
            let (status, _) = send(
                app,
                "POST",
                "/move",
                Some(json!({"location": location, "piece": piece})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }
        let (status, body) = send(app, "POST", "/move", Some(json!({"location": 3}))).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_new_game_state() {
        let app = test_app();
        let (status, body) = send(&app, "GET", "/game", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "awaiting_first_selection");
        assert_eq!(body["result"], "ongoing");
        assert_eq!(body["current_player"], 1);
        assert_eq!(body["available_pieces"].as_array().unwrap().len(), 16);
        assert_eq!(body["board"].as_array().unwrap().len(), 4);
        assert!(body["pending_piece"].is_null());
        assert!(body.get("winning_line").is_none());
    }

    #[tokio::test]
    async fn test_select_and_place() {
        let app = test_app();
        let (status, body) = send(&app, "POST", "/move", Some(json!({"piece": 15}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "in_turn");
        assert_eq!(body["current_player"], 2);
        assert_eq!(body["pending_piece"]["id"], 15);
        assert_eq!(body["pending_piece"]["colour"], "Blue");

        let (status, body) =
            send(&app, "POST", "/move", Some(json!({"location": 5, "piece": 3}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["board"][1][1]["id"], 15);
        assert_eq!(body["board"][1][1]["size"], "Large");
        assert_eq!(body["pending_piece"]["id"], 3);
        assert_eq!(body["available_pieces"].as_array().unwrap().len(), 14);
        assert_eq!(body["move_index"], 2);
    }

    #[tokio::test]
    async fn test_rejected_moves() {
        let app = test_app();
        let (status, body) =
            send(&app, "POST", "/move", Some(json!({"location": 0, "piece": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], MoveError::WrongPhase.to_string());

        let (status, _) = send(&app, "POST", "/move", Some(json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(&app, "POST", "/move", Some(json!({"piece": 3}))).await;
        let (status, body) =
            send(&app, "POST", "/move", Some(json!({"location": 16, "piece": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "location 16 is not on the board");

        let (status, body) =
            send(&app, "POST", "/move", Some(json!({"location": 0, "piece": 3}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "piece 3 is not available");

        let (status, body) = send(&app, "POST", "/move", Some(json!({"location": 0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], MoveError::MissingNextPiece.to_string());

        // Rejections leave the session where it was.
        let (_, body) = send(&app, "GET", "/game", None).await;
        assert_eq!(body["move_index"], 1);
        assert_eq!(body["pending_piece"]["id"], 3);
    }

    #[tokio::test]
    async fn test_win_reported() {
        let app = test_app();
        let body = play_red_row(&app).await;
        assert_eq!(body["phase"], "game_over");
        assert_eq!(body["result"], "player_one_wins");
        assert_eq!(body["current_player"], 2);
        assert_eq!(body["winning_line"], json!([[0, 0], [0, 1], [0, 2], [0, 3]]));

        let (status, body) =
            send(&app, "POST", "/move", Some(json!({"location": 4, "piece": 2}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "game is already over");
    }

    #[tokio::test]
    async fn test_pieces() {
        let app = test_app();
        send(&app, "POST", "/move", Some(json!({"piece": 9}))).await;
        let (status, body) = send(&app, "GET", "/pieces", None).await;
        assert_eq!(status, StatusCode::OK);

        let pieces = body.as_array().unwrap();
        assert_eq!(pieces.len(), 16);
        assert_eq!(pieces[0]["id"], 0);
        assert_eq!(pieces[0]["shape"], "Round");
        assert_eq!(pieces[0]["fill"], "Solid");
        assert_eq!(pieces[9]["available"], false);
        assert_eq!(pieces[8]["available"], true);
    }

    #[tokio::test]
    async fn test_undo_redo_goto() {
        let app = test_app();
        let (status, _) = send(&app, "POST", "/undo", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        send(&app, "POST", "/move", Some(json!({"piece": 0}))).await;
        send(&app, "POST", "/move", Some(json!({"location": 0, "piece": 1}))).await;

        let (status, body) = send(&app, "POST", "/undo", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["move_index"], 1);
        assert_eq!(body["can_redo"], true);
        assert!(body["board"][0][0].is_null());

        let (_, body) = send(&app, "POST", "/redo", None).await;
        assert_eq!(body["board"][0][0]["id"], 0);
        let (status, _) = send(&app, "POST", "/redo", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&app, "POST", "/goto/0", None).await;
        assert_eq!(body["phase"], "awaiting_first_selection");
        let (status, _) = send(&app, "POST", "/goto/3", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // A new move from an earlier point drops the undone ones.
        send(&app, "POST", "/move", Some(json!({"piece": 7}))).await;
        let (_, body) = send(&app, "GET", "/history", None).await;
        assert_eq!(body["total_moves"], 1);
        assert_eq!(body["moves"][0]["notation"], "MOVE~7");
    }

    #[tokio::test]
    async fn test_history() {
        let app = test_app();
        send(&app, "POST", "/move", Some(json!({"piece": 0}))).await;
        send(&app, "POST", "/move", Some(json!({"location": 6, "piece": 1}))).await;

        let (_, body) = send(&app, "GET", "/history", None).await;
        assert_eq!(body["total_moves"], 2);
        assert_eq!(body["current_index"], 2);
        assert_eq!(body["moves"][0]["player"], 1);
        assert_eq!(body["moves"][1]["player"], 2);
        assert_eq!(body["moves"][1]["notation"], "MOVE~6~1");
        assert_eq!(body["moves"][1]["description"], "place at 6, select 1");
    }

    #[tokio::test]
    async fn test_export_import() {
        let app = test_app();
        play_red_row(&app).await;

        let (_, body) = send(&app, "GET", "/export", None).await;
        let notation = body["notation"].as_str().unwrap().to_string();
        assert_eq!(notation, "MOVE~0 MOVE~0~1 MOVE~1~4 MOVE~2~5 MOVE~3~16");

        send(&app, "POST", "/reset", Some(json!({}))).await;
        let (status, body) =
            send(&app, "POST", "/import", Some(json!({"notation": notation}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"], "player_one_wins");
        assert_eq!(body["move_index"], 5);
    }

    #[tokio::test]
    async fn test_import_rejects_bad_notation() {
        let app = test_app();
        send(&app, "POST", "/move", Some(json!({"piece": 4}))).await;

        let (status, body) = send(
            &app,
            "POST",
            "/import",
            Some(json!({"notation": "MOVE~0 MOVE~0~0"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Move 2 (MOVE~0~0): piece 0 is not available");

        let (status, _) =
            send(&app, "POST", "/import", Some(json!({"notation": "QUEUE"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        // The running game survives a failed import.
        let (_, body) = send(&app, "GET", "/game", None).await;
        assert_eq!(body["pending_piece"]["id"], 4);
    }

    #[tokio::test]
    async fn test_reset_with_starting_player() {
        let app = test_app();
        send(&app, "POST", "/move", Some(json!({"piece": 4}))).await;

        let (status, body) =
            send(&app, "POST", "/reset", Some(json!({"starting_player": 2}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current_player"], 2);
        assert_eq!(body["move_index"], 0);
        assert_eq!(body["available_pieces"].as_array().unwrap().len(), 16);

        let (status, _) =
            send(&app, "POST", "/reset", Some(json!({"starting_player": 3}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_protocol_lines() {
        let app = test_app();
        let line = |line: &str| Some(json!({ "line": line }));

        let (_, body) = send(&app, "POST", "/protocol", line("HELLO~client")).await;
        assert_eq!(body["replies"], json!(["HELLO~quarto-api"]));

        let (_, body) = send(&app, "POST", "/protocol", line("MOVE~0")).await;
        assert_eq!(body["replies"], json!(["MOVE~0"]));

        let (_, body) = send(&app, "POST", "/protocol", line("MOVE~0")).await;
        assert_eq!(
            body["replies"],
            json!(["ERROR~piece 0 is not available"])
        );

        for mov in ["MOVE~0~1", "MOVE~1~4", "MOVE~2~5"] {
            let (_, body) = send(&app, "POST", "/protocol", line(mov)).await;
            assert_eq!(body["replies"], json!([mov]));
        }
        let (_, body) = send(&app, "POST", "/protocol", line("MOVE~3~16")).await;
        assert_eq!(body["replies"], json!(["MOVE~3~16", "GAMEOVER~VICTORY~1"]));

        let (_, body) = send(&app, "POST", "/protocol", line("PING")).await;
        assert_eq!(body["replies"], json!(["ERROR~unknown command: PING"]));

        let (_, body) = send(&app, "POST", "/protocol", line("QUEUE")).await;
        assert_eq!(body["replies"], json!(["ERROR~QUEUE is not supported here"]));
    }

    #[test]
    fn test_game_over_message() {
        assert_eq!(game_over_message(None), None);
        assert_eq!(
            game_over_message(Some(Outcome::Winner(Player::Two))).as_deref(),
            Some("GAMEOVER~VICTORY~2")
        );
        assert_eq!(
            game_over_message(Some(Outcome::Draw)).as_deref(),
            Some("GAMEOVER~DRAW")
        );
    }

    #[test]
    fn test_request_to_move() {
        let select = MoveRequest {
            location: None,
            piece: Some(4),
        };
        assert_eq!(request_to_move(&select), Ok(Move::select(PieceId(4))));

        let closing = MoveRequest {
            location: Some(15),
            piece: None,
        };
        assert_eq!(request_to_move(&closing), Ok(Move::place(Location(15), None)));
    }
}
