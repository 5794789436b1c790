//! Legos, their legs and connections, and the network snapshots every
//! operation consumes and produces.
//!
//! A network is an explicit pair of a lego set and a connection set. Each leg
//! takes part in at most one connection; a leg in no connection is *dangling*
//! and exposed to the outside of the network.

use std::fmt;
use thiserror::Error;

/// Errors for operations that reference something absent from a network.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReferenceError {
    /// Returned when a lego does not exist under a given ID.
    #[error("missing lego {0}")]
    MissingLego(LegoId),

    /// Returned when a leg index is out of range for its lego.
    #[error("lego {0} has no leg {1}")]
    MissingLeg(LegoId, usize),

    /// Returned when a connection does not exist.
    #[error("missing connection {0}")]
    MissingConnection(Connection),

    /// Returned when a leg would take part in more than one connection.
    #[error("leg {0} is already connected")]
    LegConnected(LegRef),

    /// Returned when a connection would join a leg to itself.
    #[error("cannot connect leg {0} to itself")]
    SelfConnection(LegRef),

    /// Returned when a lego is added under an ID that is already in use.
    #[error("duplicate lego {0}")]
    DuplicateLego(LegoId),

    /// Returned when a lego's matrix does not have an even number of columns.
    #[error("lego {0} has a matrix with an odd number of columns ({1})")]
    OddColumns(LegoId, usize),
}
pub type ReferenceResult<T> = Result<T, ReferenceError>;

pub(crate) mod lego;
pub use lego::*;

pub(crate) mod tensor_network;
pub use tensor_network::*;

pub mod edit;

/// Identifies a lego in a network.
pub type LegoId = usize;

/// A position on the editor canvas.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Return the mean of a set of positions, or the origin if there are none.
    pub fn centroid<I>(positions: I) -> Self
    where I: IntoIterator<Item = Position>
    {
        let (n, sx, sy) =
            positions.into_iter()
            .fold((0_usize, 0.0, 0.0), |(n, sx, sy), p| (n + 1, sx + p.x, sy + p.y));
        if n == 0 {
            Self::default()
        } else {
            Self::new(sx / n as f64, sy / n as f64)
        }
    }

    /// Return the midpoint between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Identifies a single leg of a lego.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LegRef {
    pub lego: LegoId,
    pub leg: usize,
}

impl LegRef {
    /// Create a new leg reference.
    pub fn new(lego: LegoId, leg: usize) -> Self { Self { lego, leg } }

    /// Return `true` if `self` belongs to lego `id`.
    pub fn is_on(&self, id: LegoId) -> bool { self.lego == id }
}

impl From<(LegoId, usize)> for LegRef {
    fn from(pair: (LegoId, usize)) -> Self { Self::new(pair.0, pair.1) }
}

impl fmt::Display for LegRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.lego, self.leg)
    }
}

/// An unordered pair of legs joined by a wire.
///
/// Endpoints are stored with the smaller leg reference first, so that two
/// connections between the same legs compare equal regardless of the order in
/// which they were given.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Connection {
    a: LegRef,
    b: LegRef,
}

impl Connection {
    /// Create a new connection between two legs.
    pub fn new<A, B>(a: A, b: B) -> Self
    where
        A: Into<LegRef>,
        B: Into<LegRef>,
    {
        let a = a.into();
        let b = b.into();
        if a <= b { Self { a, b } } else { Self { a: b, b: a } }
    }

    /// Return both endpoints, smaller first.
    pub fn ends(&self) -> (LegRef, LegRef) { (self.a, self.b) }

    /// Return `true` if either endpoint is `leg`.
    pub fn has_leg(&self, leg: LegRef) -> bool { self.a == leg || self.b == leg }

    /// Return `true` if either endpoint is on lego `id`.
    pub fn touches(&self, id: LegoId) -> bool {
        self.a.is_on(id) || self.b.is_on(id)
    }

    /// Return `true` if the connection joins legos `id1` and `id2` (in either
    /// order).
    pub fn joins(&self, id1: LegoId, id2: LegoId) -> bool {
        (self.a.is_on(id1) && self.b.is_on(id2))
            || (self.a.is_on(id2) && self.b.is_on(id1))
    }

    /// Return the endpoint opposite `leg`, if `leg` is an endpoint.
    pub fn other(&self, leg: LegRef) -> Option<LegRef> {
        if self.a == leg {
            Some(self.b)
        } else if self.b == leg {
            Some(self.a)
        } else {
            None
        }
    }

    /// Return the endpoint on lego `id`, if there is one.
    ///
    /// For a connection between two legs of the same lego, the smaller leg is
    /// returned.
    pub fn end_on(&self, id: LegoId) -> Option<LegRef> {
        if self.a.is_on(id) {
            Some(self.a)
        } else if self.b.is_on(id) {
            Some(self.b)
        } else {
            None
        }
    }

    /// Return the endpoint *not* on lego `id`, if exactly one endpoint is on
    /// `id`.
    pub fn end_off(&self, id: LegoId) -> Option<LegRef> {
        match (self.a.is_on(id), self.b.is_on(id)) {
            (true, false) => Some(self.b),
            (false, true) => Some(self.a),
            _ => None,
        }
    }

    /// Apply a mapping function to both endpoints, returning `None` if the
    /// mapping drops either of them.
    pub fn map_legs<F>(&self, mut map: F) -> Option<Self>
    where F: FnMut(LegRef) -> Option<LegRef>
    {
        Some(Self::new(map(self.a)?, map(self.b)?))
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({} -- {})", self.a, self.b)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn connection_unordered() {
        let c1 = Connection::new((3, 1), (0, 2));
        let c2 = Connection::new((0, 2), (3, 1));
        assert_eq!(c1, c2);
        assert_eq!(c1.ends(), (LegRef::new(0, 2), LegRef::new(3, 1)));
        assert_eq!(c1.other(LegRef::new(3, 1)), Some(LegRef::new(0, 2)));
        assert_eq!(c1.other(LegRef::new(3, 0)), None);
        assert!(c1.joins(0, 3));
        assert!(c1.joins(3, 0));
        assert!(!c1.joins(0, 0));
        assert_eq!(c1.end_off(3), Some(LegRef::new(0, 2)));
        let loop_ = Connection::new((1, 0), (1, 2));
        assert_eq!(loop_.end_off(1), None);
        assert_eq!(loop_.end_on(1), Some(LegRef::new(1, 0)));
    }

    #[test]
    fn centroid() {
        let c = Position::centroid([
            Position::new(0.0, 0.0),
            Position::new(2.0, 4.0),
        ]);
        assert_eq!(c, Position::new(1.0, 2.0));
        assert_eq!(Position::centroid([]), Position::default());
    }
}
