//! Line-based text protocol.
//!
//! # Message Layout
//!
//! ```text
//! COMMAND~field~field~...
//! ```
//!
//! Moves travel as
//!
//! ```text
//! MOVE~<piece>               opening selection
//! MOVE~<location>~<piece>    placement; piece 16 means "nothing to hand over"
//! ```
//!
//! The codec only translates between lines and [`Message`] values. It does
//! not know about sessions or whose turn it is.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::{Location, Move, PieceId};

/// Field separator.
pub const SEPARATOR: char = '~';

/// Piece number sent when a placement hands no piece over.
pub const NO_PIECE: u8 = 16;

/// Every command tag the protocol knows.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Command {
    Hello,
    Login,
    AlreadyLoggedIn,
    List,
    NewGame,
    Move,
    GameOver,
    Error,
    Queue,
    Victory,
    Draw,
    Disconnect,
    Rank,
    Chat,
    Whisper,
    Noise,
    NamedQueues,
}

impl Command {
    pub const ALL: [Command; 17] = [
        Command::Hello,
        Command::Login,
        Command::AlreadyLoggedIn,
        Command::List,
        Command::NewGame,
        Command::Move,
        Command::GameOver,
        Command::Error,
        Command::Queue,
        Command::Victory,
        Command::Draw,
        Command::Disconnect,
        Command::Rank,
        Command::Chat,
        Command::Whisper,
        Command::Noise,
        Command::NamedQueues,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Command::Hello => "HELLO",
            Command::Login => "LOGIN",
            Command::AlreadyLoggedIn => "ALREADYLOGGEDIN",
            Command::List => "LIST",
            Command::NewGame => "NEWGAME",
            Command::Move => "MOVE",
            Command::GameOver => "GAMEOVER",
            Command::Error => "ERROR",
            Command::Queue => "QUEUE",
            Command::Victory => "VICTORY",
            Command::Draw => "DRAW",
            Command::Disconnect => "DISCONNECT",
            Command::Rank => "RANK",
            Command::Chat => "CHAT",
            Command::Whisper => "WHISPER",
            Command::Noise => "NOISE",
            Command::NamedQueues => "NAMEDQUEUES",
        }
    }

    /// Tags added on top of the base protocol.
    pub fn is_extension(self) -> bool {
        matches!(
            self,
            Command::Rank | Command::Chat | Command::Whisper | Command::Noise | Command::NamedQueues
        )
    }
}

impl FromStr for Command {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .into_iter()
            .find(|cmd| cmd.as_str() == s)
            .ok_or_else(|| ProtocolError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a game ended, as carried by `GAMEOVER`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum GameOverReason {
    Victory,
    Draw,
    Disconnect,
}

impl GameOverReason {
    pub fn command(self) -> Command {
        match self {
            GameOverReason::Victory => Command::Victory,
            GameOverReason::Draw => Command::Draw,
            GameOverReason::Disconnect => Command::Disconnect,
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command().as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("empty message")]
    Empty,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A tag that only appears inside another message, e.g. `VICTORY`.
    #[error("{0} is not a message on its own")]
    MisplacedTag(Command),

    #[error("{command} is missing its {field}")]
    MissingField {
        command: Command,
        field: &'static str,
    },

    #[error("{command} has an unexpected field: {value}")]
    UnexpectedField { command: Command, value: String },

    #[error("invalid number: {0}")]
    InvalidNumber(String),
}

/// A parsed protocol line.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Message {
    Hello {
        description: String,
        extensions: Vec<String>,
    },
    /// `LOGIN~name` from a client, bare `LOGIN` as the server's ack.
    Login(Option<String>),
    AlreadyLoggedIn,
    List(Vec<String>),
    Queue,
    NewGame {
        first: String,
        second: String,
    },
    Move(Move),
    GameOver {
        reason: GameOverReason,
        winner: Option<String>,
    },
    Error(Option<String>),
    /// RANK, CHAT, WHISPER, NOISE and NAMEDQUEUES, passed through verbatim.
    Extension {
        command: Command,
        args: Vec<String>,
    },
}

fn number(field: &str) -> Result<u8, ProtocolError> {
    field
        .parse()
        .map_err(|_| ProtocolError::InvalidNumber(field.to_string()))
}

fn owned(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|s| s.to_string()).collect()
}

fn no_fields(command: Command, fields: &[&str]) -> Result<(), ProtocolError> {
    match fields.first() {
        None => Ok(()),
        Some(extra) => Err(ProtocolError::UnexpectedField {
            command,
            value: extra.to_string(),
        }),
    }
}

impl Message {
    /// Parse one line. A trailing line terminator is ignored.
    pub fn parse(line: &str) -> Result<Message, ProtocolError> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return Err(ProtocolError::Empty);
        }

        let mut parts = line.split(SEPARATOR);
        let command: Command = parts.next().unwrap_or_default().parse()?;
        let fields: Vec<&str> = parts.collect();
        let missing = |field| ProtocolError::MissingField { command, field };
        let unexpected = |value: &str| ProtocolError::UnexpectedField {
            command,
            value: value.to_string(),
        };

        match command {
            Command::Hello => {
                let (description, extensions) =
                    fields.split_first().ok_or_else(|| missing("description"))?;
                Ok(Message::Hello {
                    description: description.to_string(),
                    extensions: owned(extensions),
                })
            }
            Command::Login => match fields.as_slice() {
                [] => Ok(Message::Login(None)),
                [name] => Ok(Message::Login(Some(name.to_string()))),
                [_, extra, ..] => Err(unexpected(*extra)),
            },
            Command::AlreadyLoggedIn => {
                no_fields(command, &fields)?;
                Ok(Message::AlreadyLoggedIn)
            }
            Command::List => Ok(Message::List(owned(&fields))),
            Command::Queue => {
                no_fields(command, &fields)?;
                Ok(Message::Queue)
            }
            Command::NewGame => match fields.as_slice() {
                [first, second] => Ok(Message::NewGame {
                    first: first.to_string(),
                    second: second.to_string(),
                }),
                [_, _, extra, ..] => Err(unexpected(*extra)),
                _ => Err(missing("players")),
            },
            Command::Move => match fields.as_slice() {
                [piece] => Ok(Message::Move(Move::SelectPiece(PieceId(number(piece)?)))),
                [location, piece] => {
                    let location = Location(number(location)?);
                    let next = match number(piece)? {
                        NO_PIECE => None,
                        id => Some(PieceId(id)),
                    };
                    Ok(Message::Move(Move::PlaceAndSelect { location, next }))
                }
                [] => Err(missing("piece")),
                [_, _, extra, ..] => Err(unexpected(*extra)),
            },
            Command::GameOver => match fields.as_slice() {
                [] => Err(missing("reason")),
                [reason, rest @ ..] => {
                    let reason = match reason.parse::<Command>()? {
                        Command::Victory => GameOverReason::Victory,
                        Command::Draw => GameOverReason::Draw,
                        Command::Disconnect => GameOverReason::Disconnect,
                        _ => return Err(unexpected(*reason)),
                    };
                    match rest {
                        [] => Ok(Message::GameOver { reason, winner: None }),
                        [winner] => Ok(Message::GameOver {
                            reason,
                            winner: Some(winner.to_string()),
                        }),
                        [_, extra, ..] => Err(unexpected(*extra)),
                    }
                }
            },
            Command::Error => Ok(Message::Error(if fields.is_empty() {
                None
            } else {
                Some(fields.join(&SEPARATOR.to_string()))
            })),
            Command::Victory | Command::Draw | Command::Disconnect => {
                Err(ProtocolError::MisplacedTag(command))
            }
            Command::Rank
            | Command::Chat
            | Command::Whisper
            | Command::Noise
            | Command::NamedQueues => Ok(Message::Extension {
                command,
                args: owned(&fields),
            }),
        }
    }

    /// The tag this message is sent under.
    pub fn command(&self) -> Command {
        match self {
            Message::Hello { .. } => Command::Hello,
            Message::Login(_) => Command::Login,
            Message::AlreadyLoggedIn => Command::AlreadyLoggedIn,
            Message::List(_) => Command::List,
            Message::Queue => Command::Queue,
            Message::NewGame { .. } => Command::NewGame,
            Message::Move(_) => Command::Move,
            Message::GameOver { .. } => Command::GameOver,
            Message::Error(_) => Command::Error,
            Message::Extension { command, .. } => *command,
        }
    }
}

impl FromStr for Message {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Message::parse(s)
    }
}

/// Encodes the message as one line without terminator.
impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = SEPARATOR;
        write!(f, "{}", self.command())?;
        match self {
            Message::Hello {
                description,
                extensions,
            } => {
                write!(f, "{sep}{description}")?;
                for ext in extensions {
                    write!(f, "{sep}{ext}")?;
                }
            }
            Message::Login(Some(name)) => write!(f, "{sep}{name}")?,
            Message::Login(None) | Message::AlreadyLoggedIn | Message::Queue => {}
            Message::List(fields) | Message::Extension { args: fields, .. } => {
                for field in fields {
                    write!(f, "{sep}{field}")?;
                }
            }
            Message::NewGame { first, second } => write!(f, "{sep}{first}{sep}{second}")?,
            Message::Move(Move::SelectPiece(piece)) => write!(f, "{sep}{piece}")?,
            Message::Move(Move::PlaceAndSelect { location, next }) => {
                let piece = next.map_or(NO_PIECE, |p| p.0);
                write!(f, "{sep}{location}{sep}{piece}")?;
            }
            Message::GameOver { reason, winner } => {
                write!(f, "{sep}{reason}")?;
                if let Some(winner) = winner {
                    write!(f, "{sep}{winner}")?;
                }
            }
            Message::Error(Some(description)) => write!(f, "{sep}{description}")?,
            Message::Error(None) => {}
        }
        Ok(())
    }
}
