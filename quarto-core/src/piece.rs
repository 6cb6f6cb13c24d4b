//! Pieces and the four attribute domains.
//!
//! Every piece is one combination of four binary attributes, so there are
//! exactly 16 of them. A piece's id is its attribute bits packed as
//!
//! ```text
//! Bit 3: size    (0 = Small, 1 = Large)
//! Bit 2: shape   (0 = Round, 1 = Square)
//! Bit 1: colour  (0 = Red,   1 = Blue)
//! Bit 0: fill    (0 = Solid, 1 = Hollow)
//! ```
//!
//! which is the enumeration order size → shape → colour → fill with fill
//! varying fastest.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of distinct pieces in a game.
pub const PIECE_COUNT: usize = 16;

/// Piece size.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Size {
    Small,
    Large,
}

/// Piece shape.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Shape {
    Round,
    Square,
}

/// Piece colour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Colour {
    Red,
    Blue,
}

/// Piece fill.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Fill {
    Solid,
    Hollow,
}

impl Size {
    pub const ALL: [Size; 2] = [Size::Small, Size::Large];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Size::Small => 0,
            Size::Large => 1,
        }
    }
}

impl Shape {
    pub const ALL: [Shape; 2] = [Shape::Round, Shape::Square];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Shape::Round => 0,
            Shape::Square => 1,
        }
    }
}

impl Colour {
    pub const ALL: [Colour; 2] = [Colour::Red, Colour::Blue];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Colour::Red => 0,
            Colour::Blue => 1,
        }
    }
}

impl Fill {
    pub const ALL: [Fill; 2] = [Fill::Solid, Fill::Hollow];

    #[inline]
    fn bit(self) -> u8 {
        match self {
            Fill::Solid => 0,
            Fill::Hollow => 1,
        }
    }
}

/// Names one of the four attribute domains.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Size,
    Shape,
    Colour,
    Fill,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::Size,
        Attribute::Shape,
        Attribute::Colour,
        Attribute::Fill,
    ];
}

/// Stable piece identifier.
///
/// Ids 0-15 name real pieces. Larger values can be constructed (they arrive
/// from untrusted input) but are never valid.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Check if this id names one of the 16 pieces.
    #[inline]
    pub fn is_valid(self) -> bool {
        (self.0 as usize) < PIECE_COUNT
    }

    /// Iterate over all 16 valid ids in enumeration order.
    pub fn all() -> impl Iterator<Item = PieceId> {
        (0..PIECE_COUNT as u8).map(PieceId)
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An immutable Quarto piece.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub struct Piece {
    size: Size,
    shape: Shape,
    colour: Colour,
    fill: Fill,
}

impl Piece {
    pub fn new(size: Size, shape: Shape, colour: Colour, fill: Fill) -> Piece {
        Piece {
            size,
            shape,
            colour,
            fill,
        }
    }

    /// Decode a piece from its id. Returns None for ids >= 16.
    pub fn from_id(id: PieceId) -> Option<Piece> {
        if !id.is_valid() {
            return None;
        }
        let bits = id.0;
        Some(Piece {
            size: Size::ALL[((bits >> 3) & 1) as usize],
            shape: Shape::ALL[((bits >> 2) & 1) as usize],
            colour: Colour::ALL[((bits >> 1) & 1) as usize],
            fill: Fill::ALL[(bits & 1) as usize],
        })
    }

    /// The id this piece has in every game.
    #[inline]
    pub fn id(&self) -> PieceId {
        PieceId(
            (self.size.bit() << 3)
                | (self.shape.bit() << 2)
                | (self.colour.bit() << 1)
                | self.fill.bit(),
        )
    }

    /// All 16 pieces, indexed by id.
    pub fn all() -> [Piece; PIECE_COUNT] {
        let mut pieces = [Piece::new(Size::Small, Shape::Round, Colour::Red, Fill::Solid); PIECE_COUNT];
        let mut idx = 0;
        for size in Size::ALL {
            for shape in Shape::ALL {
                for colour in Colour::ALL {
                    for fill in Fill::ALL {
                        pieces[idx] = Piece::new(size, shape, colour, fill);
                        idx += 1;
                    }
                }
            }
        }
        pieces
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn colour(&self) -> Colour {
        self.colour
    }

    pub fn fill(&self) -> Fill {
        self.fill
    }

    /// Check whether two pieces carry the same value for one attribute.
    #[inline]
    pub fn shares(&self, other: &Piece, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Size => self.size == other.size,
            Attribute::Shape => self.shape == other.shape,
            Attribute::Colour => self.colour == other.colour,
            Attribute::Fill => self.fill == other.fill,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} {:?} {:?}",
            self.colour, self.shape, self.size, self.fill
        )
    }
}

/// The 16-piece arena of a game together with the set of ids still
/// available to be handed over.
///
/// Pieces never leave the arena; availability is a bitset, so an id can only
/// ever be taken once.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiecePool {
    pieces: [Piece; PIECE_COUNT],
    available: u16,
}

impl PiecePool {
    /// A fresh pool with every piece available.
    pub fn new() -> PiecePool {
        PiecePool {
            pieces: Piece::all(),
            available: u16::MAX,
        }
    }

    /// Look up a piece by id. Every valid id resolves, available or not.
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<Piece> {
        self.pieces.get(id.0 as usize).copied()
    }

    /// Check whether the id is valid and not yet taken.
    #[inline]
    pub fn contains(&self, id: PieceId) -> bool {
        id.is_valid() && self.available & (1 << id.0) != 0
    }

    /// Remove an id from the available set.
    /// Returns false if it was not available.
    pub fn take(&mut self, id: PieceId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.available &= !(1 << id.0);
        true
    }

    /// Available ids in ascending order.
    pub fn available(&self) -> impl Iterator<Item = PieceId> + '_ {
        PieceId::all().filter(move |&id| self.contains(id))
    }

    /// Number of available pieces.
    #[inline]
    pub fn len(&self) -> usize {
        self.available.count_ones() as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.available == 0
    }
}

impl Default for PiecePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_pieces_unique() {
        let pieces = Piece::all();
        let set: HashSet<Piece> = pieces.iter().copied().collect();
        assert_eq!(set.len(), PIECE_COUNT);
    }

    #[test]
    fn test_id_matches_enumeration_order() {
        for (idx, piece) in Piece::all().iter().enumerate() {
            assert_eq!(piece.id(), PieceId(idx as u8));
            assert_eq!(Piece::from_id(PieceId(idx as u8)), Some(*piece));
        }
    }

    #[test]
    fn test_first_and_last_piece() {
        let first = Piece::from_id(PieceId(0)).unwrap();
        assert_eq!(first, Piece::new(Size::Small, Shape::Round, Colour::Red, Fill::Solid));

        let last = Piece::from_id(PieceId(15)).unwrap();
        assert_eq!(last, Piece::new(Size::Large, Shape::Square, Colour::Blue, Fill::Hollow));
    }

    #[test]
    fn test_invalid_id() {
        assert!(!PieceId(16).is_valid());
        assert_eq!(Piece::from_id(PieceId(16)), None);
        assert_eq!(Piece::from_id(PieceId(255)), None);
    }

    #[test]
    fn test_shares() {
        let a = Piece::new(Size::Small, Shape::Round, Colour::Red, Fill::Solid);
        let b = Piece::new(Size::Large, Shape::Square, Colour::Red, Fill::Hollow);
        assert!(a.shares(&b, Attribute::Colour));
        assert!(!a.shares(&b, Attribute::Size));
        assert!(!a.shares(&b, Attribute::Shape));
        assert!(!a.shares(&b, Attribute::Fill));
    }

    #[test]
    fn test_display() {
        let piece = Piece::new(Size::Large, Shape::Square, Colour::Blue, Fill::Hollow);
        assert_eq!(piece.to_string(), "Blue Square Large Hollow");
    }

    #[test]
    fn test_pool_take() {
        let mut pool = PiecePool::new();
        assert_eq!(pool.len(), 16);
        assert!(pool.take(PieceId(3)));
        assert!(!pool.contains(PieceId(3)));
        assert!(!pool.take(PieceId(3)));
        assert_eq!(pool.len(), 15);

        // Taken pieces can still be looked up.
        assert_eq!(pool.piece(PieceId(3)), Piece::from_id(PieceId(3)));
    }

    #[test]
    fn test_pool_rejects_invalid_id() {
        let mut pool = PiecePool::new();
        assert!(!pool.contains(PieceId(16)));
        assert!(!pool.take(PieceId(16)));
        assert_eq!(pool.piece(PieceId(16)), None);
        assert_eq!(pool.len(), 16);
    }

    #[test]
    fn test_pool_drain() {
        let mut pool = PiecePool::new();
        for id in PieceId::all() {
            assert!(pool.take(id));
        }
        assert!(pool.is_empty());
        assert_eq!(pool.available().count(), 0);
    }
}
