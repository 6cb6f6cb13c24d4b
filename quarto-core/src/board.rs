//! The 4x4 board and win detection.
//!
//! ```text
//! Location indices (row-major):
//!    0  1  2  3
//!    4  5  6  7
//!    8  9 10 11
//!   12 13 14 15
//! ```
//!
//! A line wins when all four of its fields are occupied and the four pieces
//! agree on at least one attribute.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Attribute, MoveError, Piece};

/// Board dimension.
pub const DIM: usize = 4;

/// Number of fields on the board.
pub const FIELD_COUNT: usize = DIM * DIM;

/// A field on the board, addressed row-major.
///
/// Like [`crate::PieceId`], any `u8` can be wrapped; only 0-15 are on the
/// board.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Location(pub u8);

impl Location {
    /// Create a location from row and column. Returns None off the board.
    #[inline]
    pub fn from_row_col(row: usize, col: usize) -> Option<Location> {
        if row < DIM && col < DIM {
            Some(Location((row * DIM + col) as u8))
        } else {
            None
        }
    }

    /// Get the row (0-3).
    #[inline]
    pub fn row(self) -> usize {
        self.0 as usize / DIM
    }

    /// Get the column (0-3).
    #[inline]
    pub fn col(self) -> usize {
        self.0 as usize % DIM
    }

    /// Check if this is a field on the board (0-15).
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < FIELD_COUNT
    }

    /// Iterate over all 16 locations.
    pub fn all() -> impl Iterator<Item = Location> {
        (0..FIELD_COUNT as u8).map(Location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The ten lines checked for a win: 4 rows, 4 columns, 2 diagonals.
pub const LINES: [[u8; DIM]; 10] = [
    [0, 1, 2, 3],     // Row 0
    [4, 5, 6, 7],     // Row 1
    [8, 9, 10, 11],   // Row 2
    [12, 13, 14, 15], // Row 3
    [0, 4, 8, 12],    // Col 0
    [1, 5, 9, 13],    // Col 1
    [2, 6, 10, 14],   // Col 2
    [3, 7, 11, 15],   // Col 3
    [0, 5, 10, 15],   // Main diagonal
    [3, 6, 9, 12],    // Anti-diagonal
];

/// A Quarto board. Fields only ever go from empty to occupied.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Board {
    fields: [Option<Piece>; FIELD_COUNT],
}

impl Board {
    /// Create an empty board.
    pub fn new() -> Board {
        Board {
            fields: [None; FIELD_COUNT],
        }
    }

    /// Check whether a location refers to a field.
    #[inline]
    pub fn is_field(&self, loc: Location) -> bool {
        loc.is_valid()
    }

    /// Check whether a (row, col) pair refers to a field.
    #[inline]
    pub fn is_field_at(&self, row: usize, col: usize) -> bool {
        row < DIM && col < DIM
    }

    /// Get the piece on a field.
    /// Returns None for empty fields and for locations off the board.
    #[inline]
    pub fn field(&self, loc: Location) -> Option<Piece> {
        self.fields.get(loc.0 as usize).copied().flatten()
    }

    /// Get the piece at (row, col).
    pub fn field_at(&self, row: usize, col: usize) -> Option<Piece> {
        Location::from_row_col(row, col).and_then(|loc| self.field(loc))
    }

    /// Check whether a field is on the board and holds no piece.
    #[inline]
    pub fn is_empty_field(&self, loc: Location) -> bool {
        matches!(self.fields.get(loc.0 as usize), Some(None))
    }

    /// Place a piece on an empty field.
    pub fn set_field(&mut self, loc: Location, piece: Piece) -> Result<(), MoveError> {
        let slot = self
            .fields
            .get_mut(loc.0 as usize)
            .ok_or(MoveError::OutOfBoundsField(loc))?;
        if slot.is_some() {
            return Err(MoveError::OccupiedField(loc));
        }
        *slot = Some(piece);
        Ok(())
    }

    /// Empty fields in ascending order.
    pub fn empty_fields(&self) -> impl Iterator<Item = Location> + '_ {
        Location::all().filter(move |&loc| self.is_empty_field(loc))
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.fields.iter().filter(|f| f.is_some()).count()
    }

    /// Check whether every field is occupied.
    pub fn is_full(&self) -> bool {
        self.fields.iter().all(Option::is_some)
    }

    /// Collect the pieces of a line, or None if any field on it is empty.
    fn line_pieces(&self, line: &[u8; DIM]) -> Option<[Piece; DIM]> {
        let [a, b, c, d] = line.map(|idx| self.fields[idx as usize]);
        Some([a?, b?, c?, d?])
    }

    /// The first attribute all four pieces agree on, if any.
    ///
    /// Each attribute is checked on its own; a line needs just one match.
    pub fn common_attribute(pieces: &[Piece; DIM]) -> Option<Attribute> {
        let [first, rest @ ..] = pieces;
        let same_size = rest.iter().all(|p| p.size() == first.size());
        let same_shape = rest.iter().all(|p| p.shape() == first.shape());
        let same_colour = rest.iter().all(|p| p.colour() == first.colour());
        let same_fill = rest.iter().all(|p| p.fill() == first.fill());

        if same_size {
            Some(Attribute::Size)
        } else if same_shape {
            Some(Attribute::Shape)
        } else if same_colour {
            Some(Attribute::Colour)
        } else if same_fill {
            Some(Attribute::Fill)
        } else {
            None
        }
    }

    /// Get the first winning line, if any.
    pub fn winning_line(&self) -> Option<[Location; DIM]> {
        LINES.iter().find_map(|line| {
            let pieces = self.line_pieces(line)?;
            Board::common_attribute(&pieces)?;
            Some(line.map(Location))
        })
    }

    /// Check whether any line is full and shares an attribute.
    pub fn has_winner(&self) -> bool {
        self.winning_line().is_some()
    }

    /// The game is over once there is a winner or no field is left.
    pub fn game_over(&self) -> bool {
        self.has_winner() || self.is_full()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders piece ids in a grid, `.` for empty fields.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..DIM {
            for col in 0..DIM {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.field_at(row, col) {
                    Some(piece) => write!(f, "{:>2}", piece.id())?,
                    None => write!(f, " .")?,
                }
            }
            if row + 1 < DIM {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
