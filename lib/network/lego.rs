use crate::{
    binmat::BinMatrix,
    bmat,
    network::{ LegoId, Position },
};

/// The two spider families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Color {
    /// Z-type spider: stabilized by `X⊗…⊗X` and every `Z_i Z_j`.
    Z,
    /// X-type spider: stabilized by `Z⊗…⊗Z` and every `X_i X_j`.
    X,
}

impl Color {
    /// Return the other color.
    pub fn flip(self) -> Self {
        match self {
            Self::Z => Self::X,
            Self::X => Self::Z,
        }
    }

    /// Return the spider kind of this color.
    pub fn kind(self) -> LegoKind {
        match self {
            Self::Z => LegoKind::ZSpider,
            Self::X => LegoKind::XSpider,
        }
    }
}

/// Closed set of lego families.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LegoKind {
    /// Z-repetition code of any size.
    ZSpider,
    /// X-repetition code of any size.
    XSpider,
    /// The two-legged Hadamard.
    Hadamard,
    /// The two-legged identity (Bell pair).
    Identity,
    /// One-legged `X` stabilizer state.
    StopperX,
    /// One-legged `Z` stabilizer state.
    StopperZ,
    /// One-legged free stopper, stabilized by nothing.
    StopperI,
    /// Closed network with no legs left.
    Scalar,
    /// Unrecognized result of a fusion.
    Fused,
}

impl LegoKind {
    /// Return the display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZSpider => "Z-repetition code",
            Self::XSpider => "X-repetition code",
            Self::Hadamard => "Hadamard",
            Self::Identity => "Identity",
            Self::StopperX => "X stopper",
            Self::StopperZ => "Z stopper",
            Self::StopperI => "Identity stopper",
            Self::Scalar => "Scalar",
            Self::Fused => "Fused lego",
        }
    }

    /// Return the short name.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::ZSpider => "Z",
            Self::XSpider => "X",
            Self::Hadamard => "H",
            Self::Identity => "I",
            Self::StopperX => "X-stop",
            Self::StopperZ => "Z-stop",
            Self::StopperI => "I-stop",
            Self::Scalar => "s",
            Self::Fused => "F",
        }
    }

    /// Return the spider color, if `self` is a spider.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::ZSpider => Some(Color::Z),
            Self::XSpider => Some(Color::X),
            _ => None,
        }
    }

    /// Return `true` if `self` is `ZSpider` or `XSpider`.
    pub fn is_spider(&self) -> bool { self.color().is_some() }
}

/// Build the parity-check matrix of an `n`-legged spider.
///
/// A Z spider has the row `X⊗…⊗X` followed by the rows `Z_i Z_{i+1}`; an X
/// spider has the row `Z⊗…⊗Z` followed by the rows `X_i X_{i+1}`. The result
/// has `n` rows and `2n` columns.
///
/// *Panics if `n == 0`.*
pub fn spider_matrix(color: Color, n: usize) -> BinMatrix {
    assert!(n > 0, "spider_matrix: a spider needs at least one leg");
    let (all, pair) = match color {
        Color::Z => (0, n),
        Color::X => (n, 0),
    };
    let mut m = BinMatrix::zeros(n, 2 * n);
    (0..n).for_each(|leg| { m.set(0, all + leg, true); });
    for k in 0..n - 1 {
        m.set(k + 1, pair + k, true);
        m.set(k + 1, pair + k + 1, true);
    }
    m
}

/// A lego prototype, as found in a lego library.
#[derive(Clone, Debug, PartialEq)]
pub struct LegoType {
    pub kind: LegoKind,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub matrix: BinMatrix,
    pub logical_legs: Vec<usize>,
    pub gauge_legs: Vec<usize>,
}

impl LegoType {
    fn basic(kind: LegoKind, description: &str, matrix: BinMatrix) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            short_name: kind.short_name().to_string(),
            description: description.to_string(),
            matrix,
            logical_legs: Vec::new(),
            gauge_legs: Vec::new(),
        }
    }

    /// The Hadamard lego.
    pub fn hadamard() -> Self {
        Self::basic(
            LegoKind::Hadamard,
            "Exchanges X and Z across its two legs.",
            bmat!([1, 0, 0, 1], [0, 1, 1, 0]),
        )
    }

    /// The identity lego.
    pub fn identity() -> Self {
        Self::basic(
            LegoKind::Identity,
            "Passes every Pauli unchanged between its two legs.",
            bmat!([1, 1, 0, 0], [0, 0, 1, 1]),
        )
    }

    /// The X stopper.
    pub fn stopper_x() -> Self {
        Self::basic(LegoKind::StopperX, "Terminates a leg with X.", bmat!([1, 0]))
    }

    /// The Z stopper.
    pub fn stopper_z() -> Self {
        Self::basic(LegoKind::StopperZ, "Terminates a leg with Z.", bmat!([0, 1]))
    }

    /// The free stopper.
    pub fn stopper_i() -> Self {
        Self::basic(
            LegoKind::StopperI,
            "Terminates a leg without constraining it.",
            bmat!([0, 0]),
        )
    }

    /// An `n`-legged spider.
    pub fn spider(color: Color, n: usize) -> Self {
        let kind = color.kind();
        Self::basic(
            kind,
            &format!("{}-legged repetition code.", n),
            spider_matrix(color, n),
        )
    }

    /// The built-in library.
    pub fn library() -> Vec<Self> {
        vec![
            Self::hadamard(),
            Self::identity(),
            Self::stopper_x(),
            Self::stopper_z(),
            Self::stopper_i(),
            Self::spider(Color::Z, 4),
            Self::spider(Color::X, 4),
        ]
    }

    /// Return the number of legs.
    pub fn num_legs(&self) -> usize { self.matrix.num_legs() }

    /// Place a copy of this prototype under a given ID.
    ///
    /// The instance owns its own copy of the matrix.
    pub fn instantiate(&self, id: LegoId, position: Position) -> LegoInstance {
        LegoInstance {
            id,
            kind: self.kind,
            name: self.name.clone(),
            short_name: self.short_name.clone(),
            matrix: self.matrix.clone(),
            logical_legs: self.logical_legs.clone(),
            gauge_legs: self.gauge_legs.clone(),
            position,
        }
    }
}

/// A lego placed in a network.
#[derive(Clone, Debug, PartialEq)]
pub struct LegoInstance {
    pub id: LegoId,
    pub kind: LegoKind,
    pub name: String,
    pub short_name: String,
    pub matrix: BinMatrix,
    pub logical_legs: Vec<usize>,
    pub gauge_legs: Vec<usize>,
    pub position: Position,
}

impl LegoInstance {
    /// Create a new lego of a given kind directly from a matrix.
    pub fn new(id: LegoId, kind: LegoKind, matrix: BinMatrix, position: Position)
        -> Self
    {
        Self {
            id,
            kind,
            name: kind.name().to_string(),
            short_name: kind.short_name().to_string(),
            matrix,
            logical_legs: Vec::new(),
            gauge_legs: Vec::new(),
            position,
        }
    }

    /// Return the number of legs.
    pub fn num_legs(&self) -> usize { self.matrix.num_legs() }

    /// Return `true` if `leg` is a valid leg index.
    pub fn has_leg(&self, leg: usize) -> bool { leg < self.num_legs() }

    /// Return the spider color, if `self` is a spider.
    pub fn color(&self) -> Option<Color> { self.kind.color() }

    /// Return `true` if `self` is a spider.
    pub fn is_spider(&self) -> bool { self.kind.is_spider() }

    /// Return `true` if `self` and `other` are spiders of different colors.
    pub fn is_diff_color(&self, other: &Self) -> bool {
        matches!(
            (self.color(), other.color()),
            (Some(c1), Some(c2)) if c1 != c2
        )
    }

    /// Return `true` if `self` and `other` are spiders of the same color.
    pub fn is_same_color(&self, other: &Self) -> bool {
        matches!(
            (self.color(), other.color()),
            (Some(c1), Some(c2)) if c1 == c2
        )
    }

    /// Return a copy of `self` at a different position.
    pub fn moved_to(&self, position: Position) -> Self {
        Self { position, ..self.clone() }
    }
}

/// Manufacture an `n`-legged spider of a given color.
///
/// *Panics if `legs == 0`.*
pub fn create_dynamic_lego(
    color: Color,
    legs: usize,
    id: LegoId,
    position: Position,
) -> LegoInstance {
    LegoInstance::new(id, color.kind(), spider_matrix(color, legs), position)
}

/// Manufacture a Hadamard lego.
pub fn create_hadamard(id: LegoId, position: Position) -> LegoInstance {
    LegoType::hadamard().instantiate(id, position)
}

/// Look a matrix up against the canonical small legos.
///
/// Matrices are compared by row space, so any generating set of a known
/// stabilizer group is recognized. Two-legged spiders are reported as
/// [`Identity`][LegoKind::Identity] and one-legged spiders as stoppers; spiders
/// with three or more legs are reported with their color.
pub fn recognize_type(matrix: &BinMatrix) -> Option<LegoKind> {
    if matrix.is_scalar() { return Some(LegoKind::Scalar); }
    if matrix.ncols() == 0 || matrix.ncols() % 2 != 0 { return None; }
    let canon = matrix.canonical();
    let n = matrix.num_legs();
    match n {
        1 => {
            [
                LegoType::stopper_x(),
                LegoType::stopper_z(),
            ]
            .into_iter()
            .find(|ty| ty.matrix.canonical() == canon)
            .map(|ty| ty.kind)
            .or_else(|| (canon.nrows() == 0).then_some(LegoKind::StopperI))
        },
        2 => {
            [
                LegoType::identity(),
                LegoType::hadamard(),
            ]
            .into_iter()
            .find(|ty| ty.matrix.canonical() == canon)
            .map(|ty| ty.kind)
        },
        _ => {
            [Color::Z, Color::X].into_iter()
                .find(|c| spider_matrix(*c, n).canonical() == canon)
                .map(|c| c.kind())
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn spider_matrices() {
        assert_eq!(spider_matrix(Color::Z, 1), bmat!([1, 0]));
        assert_eq!(spider_matrix(Color::X, 1), bmat!([0, 1]));
        assert_eq!(
            spider_matrix(Color::Z, 3),
            bmat!(
                [1, 1, 1, 0, 0, 0],
                [0, 0, 0, 1, 1, 0],
                [0, 0, 0, 0, 1, 1]
            )
        );
        assert_eq!(
            spider_matrix(Color::X, 3),
            bmat!(
                [0, 0, 0, 1, 1, 1],
                [1, 1, 0, 0, 0, 0],
                [0, 1, 1, 0, 0, 0]
            )
        );
        for n in 1..6 {
            assert_eq!(spider_matrix(Color::Z, n).rank(), n);
            assert_eq!(spider_matrix(Color::X, n).rank(), n);
        }
    }

    #[test]
    fn recognize() {
        assert_eq!(recognize_type(&bmat!([1])), Some(LegoKind::Scalar));
        assert_eq!(recognize_type(&bmat!([1, 0])), Some(LegoKind::StopperX));
        assert_eq!(recognize_type(&bmat!([0, 1])), Some(LegoKind::StopperZ));
        assert_eq!(recognize_type(&bmat!([0, 0])), Some(LegoKind::StopperI));
        assert_eq!(recognize_type(&bmat!([1, 1])), None);
        assert_eq!(
            recognize_type(&bmat!([0, 1, 1, 0], [1, 0, 0, 1])),
            Some(LegoKind::Hadamard),
        );
        assert_eq!(
            recognize_type(&spider_matrix(Color::X, 2)),
            Some(LegoKind::Identity),
        );
        assert_eq!(
            recognize_type(&spider_matrix(Color::X, 5)),
            Some(LegoKind::XSpider),
        );
        assert_eq!(
            recognize_type(&bmat!([1, 1, 1, 1, 0, 0, 0, 0])),
            None,
        );
    }

    #[test]
    fn instances_own_matrices() {
        let ty = LegoType::hadamard();
        let mut a = ty.instantiate(0, Position::default());
        let b = ty.instantiate(1, Position::default());
        a.matrix.set(0, 0, false);
        assert_ne!(a.matrix, b.matrix);
        assert_eq!(b.matrix, ty.matrix);
    }

    #[test]
    fn factory() {
        let z = create_dynamic_lego(Color::Z, 4, 7, Position::new(1.0, 1.0));
        assert_eq!(z.id, 7);
        assert_eq!(z.num_legs(), 4);
        assert_eq!(z.color(), Some(Color::Z));
        let x = create_dynamic_lego(Color::X, 2, 8, Position::default());
        assert!(z.is_diff_color(&x));
        assert!(!z.is_same_color(&x));
        assert!(!z.is_diff_color(&create_hadamard(9, Position::default())));
        assert_eq!(LegoType::library().len(), 7);
    }
}
