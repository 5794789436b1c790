//! Structure-preserving rewrites of a tensor network.
//!
//! Application of particular rules is facilitated through the [`RewriteRule`]
//! and [`Rewrite`] traits. A rule is represented by a type implementing
//! `RewriteRule` (usually a unit struct), whose [`find`][RewriteRule::find]
//! checks the rule's precondition against a selection of legos. On success it
//! returns a `Rewrite` holding everything needed to carry out the
//! transformation, which is then performed by [`apply`][Rewrite::apply]. The
//! same can be done in one step through [`TensorNetwork::apply_rule`].
//!
//! Transforms never fail: every check happens in `find`. Neither step mutates
//! the input network; the result is a new snapshot packaged with the
//! [`Operation`][crate::history::Operation] that produced it.
//!
//! Legos manufactured by a rule are given the IDs following the largest ID in
//! the network, in a fixed order, and are placed according to a [`Layout`].
//!
//! # Example
//! ```
//! use lego_calc::{
//!     network::{ Color, Connection, Position, TensorNetwork, create_dynamic_lego },
//!     rules::{ Hopf, Rewrite, RewriteRule },
//! };
//!
//! let net = TensorNetwork::from_parts(
//!     [
//!         create_dynamic_lego(Color::Z, 3, 0, Position::default()),
//!         create_dynamic_lego(Color::X, 3, 1, Position::default()),
//!     ],
//!     [
//!         Connection::new((0, 0), (1, 0)),
//!         Connection::new((0, 1), (1, 1)),
//!     ],
//! ).unwrap();
//!
//! let edit = Hopf.find(&net, &[0, 1]).unwrap().apply();
//! assert_eq!(edit.network.count_connections(), 0);
//! assert_eq!(edit.network.get_lego(0).unwrap().num_legs(), 1);
//! ```

use rustc_hash::{ FxHashMap, FxHashSet };
use thiserror::Error;
use crate::{
    LegoResult,
    config::Layout,
    history::{ Edit, OperationKind },
    network::{
        Connection,
        LegRef,
        LegoId,
        LegoInstance,
        TensorNetwork,
    },
};

/// Errors for unmet rule preconditions and malformed selections.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Returned when an operation is given an empty selection.
    #[error("{0}: nothing selected")]
    EmptySelection(&'static str),

    /// Returned when a lego is selected more than once.
    #[error("lego {0} selected twice")]
    DuplicateSelection(LegoId),

    /// Returned when a rule needs a fixed number of legos.
    #[error("{rule}: expected {expected} legos, got {found}")]
    SelectionSize { rule: &'static str, expected: usize, found: usize },

    /// Returned when a rule applies only to spiders.
    #[error("lego {0} is not a spider")]
    NotASpider(LegoId),

    /// Returned when the selection does not have the structure a rule needs.
    #[error("{0} does not apply: {1}")]
    NoMatch(&'static str, &'static str),

    /// Returned when a lego has the wrong number of legs.
    #[error("lego {id} must have {expected} legs, but has {found}")]
    LegCount { id: LegoId, expected: usize, found: usize },

    /// Returned when a leg is required to be dangling but is not.
    #[error("leg {0} is not dangling")]
    NotDangling(LegRef),

    /// Returned when a lego has no dangling leg.
    #[error("lego {0} has no dangling leg")]
    NoDanglingLeg(LegoId),

    /// Returned when a lego would be spliced into a wire it terminates.
    #[error("connection {0} touches lego {1}")]
    SpliceOnSelf(Connection, LegoId),

    /// Returned when a set of legs is empty, repeats a leg, names a missing
    /// leg, or covers every leg.
    #[error("invalid leg subset for lego {0}")]
    InvalidLegSubset(LegoId),
}
pub type ValidationResult<T> = Result<T, ValidationError>;

/// A trait for types that check a selection of legos for a particular
/// structure to rewrite.
///
/// Types implementing this trait have the only purpose of denoting the
/// existence of a particular rewrite rule, with the possible exception of
/// parameters needed to pin the rewrite down (see [`UnfuseIntoTwo`]).
pub trait RewriteRule {
    /// The type representing the matched (but not yet applied) rewrite.
    type Output<'a>: Rewrite;

    /// Check that the selection has the structure this rule rewrites.
    ///
    /// Fails with a [`ValidationError`] if it does not, or with a
    /// [`ReferenceError`][crate::network::ReferenceError] if the selection
    /// names a missing lego.
    fn find<'a>(self, network: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>;
}

/// A trait representing a matched rewrite.
pub trait Rewrite {
    /// The kind recorded for the resulting operation.
    fn kind(&self) -> OperationKind;

    /// Carry out the rewrite, placing new legos according to `layout`.
    fn apply_with(self, layout: &Layout) -> Edit;

    /// Carry out the rewrite with the default [`Layout`].
    fn apply(self) -> Edit
    where Self: Sized
    {
        self.apply_with(&Layout::default())
    }
}

impl TensorNetwork {
    /// Check a rule against a selection. See [`RewriteRule::find`].
    pub fn find_rule<R>(&self, rule: R, selection: &[LegoId])
        -> LegoResult<R::Output<'_>>
    where R: RewriteRule
    {
        rule.find(self, selection)
    }

    /// Return `true` if a rule's precondition holds for a selection.
    pub fn can_apply<R>(&self, rule: R, selection: &[LegoId]) -> bool
    where R: RewriteRule
    {
        rule.find(self, selection).is_ok()
    }

    /// Check a rule against a selection and apply it with the default
    /// [`Layout`] if it matches.
    pub fn apply_rule<R>(&self, rule: R, selection: &[LegoId]) -> LegoResult<Edit>
    where R: RewriteRule
    {
        Ok(rule.find(self, selection)?.apply())
    }
}

/// A partial map from the legs of a network before a rewrite to the legs after
/// it.
///
/// Legs with no entry do not survive the rewrite, and neither does any wire
/// attached to them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LegMap(FxHashMap<LegRef, LegRef>);

impl LegMap {
    /// Create a new, empty map.
    pub fn new() -> Self { Self::default() }

    /// Send `old` to `new`, returning the previous image of `old` if it had
    /// one.
    pub fn insert<A, B>(&mut self, old: A, new: B) -> Option<LegRef>
    where
        A: Into<LegRef>,
        B: Into<LegRef>,
    {
        self.0.insert(old.into(), new.into())
    }

    /// Return the image of a leg.
    pub fn get(&self, leg: LegRef) -> Option<LegRef> { self.0.get(&leg).copied() }

    /// Return the number of mapped legs.
    pub fn len(&self) -> usize { self.0.len() }

    /// Return `true` if no leg is mapped.
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Map both ends of a connection, returning `None` if either end does not
    /// survive.
    pub fn map_connection(&self, conn: &Connection) -> Option<Connection> {
        conn.map_legs(|leg| self.get(leg))
    }
}

// Builds the network produced by a rewrite.
//
// Replaced legos are taken out together with all their wires. Once the new
// legos are in, every cut wire is restored with its ends on replaced legos
// sent through the leg map; wires with an unmapped end on a replaced lego are
// dropped.
pub(crate) struct Rewiring<'a> {
    source: &'a TensorNetwork,
    net: TensorNetwork,
    replaced: FxHashSet<LegoId>,
    cut: Vec<Connection>,
    legs: LegMap,
    next_id: LegoId,
}

impl<'a> Rewiring<'a> {
    pub(crate) fn new(source: &'a TensorNetwork) -> Self {
        Self {
            source,
            net: source.clone(),
            replaced: FxHashSet::default(),
            cut: Vec::new(),
            legs: LegMap::new(),
            next_id: source.fresh_id(),
        }
    }

    pub(crate) fn fresh_id(&mut self) -> LegoId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn replace(&mut self, id: LegoId) {
        self.net.legos.remove(&id);
        for conn in self.net.connections_of(id).into_iter() {
            self.net.connections.remove(&conn);
            self.cut.push(conn);
        }
        self.replaced.insert(id);
    }

    pub(crate) fn put(&mut self, lego: LegoInstance) {
        self.net.legos.insert(lego.id, lego);
    }

    pub(crate) fn map_leg<A, B>(&mut self, old: A, new: B)
    where
        A: Into<LegRef>,
        B: Into<LegRef>,
    {
        self.legs.insert(old, new);
    }

    pub(crate) fn wire<A, B>(&mut self, a: A, b: B)
    where
        A: Into<LegRef>,
        B: Into<LegRef>,
    {
        self.net.connections.insert(Connection::new(a, b));
    }

    pub(crate) fn finish(self, kind: OperationKind) -> Edit {
        let Self { source, mut net, replaced, cut, legs, .. } = self;
        let restored =
            cut.iter()
            .filter_map(|conn| {
                conn.map_legs(|leg| {
                    if replaced.contains(&leg.lego) {
                        legs.get(leg)
                    } else {
                        Some(leg)
                    }
                })
            });
        net.connections.extend(restored);
        Edit::new(kind, source, net)
    }
}

// resolve a selection to distinct spiders, in selection order
pub(crate) fn select_spiders<'a>(
    network: &'a TensorNetwork,
    selection: &[LegoId],
    rule: &'static str,
) -> LegoResult<Vec<&'a LegoInstance>>
{
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection(rule).into());
    }
    let mut seen: FxHashSet<LegoId> = FxHashSet::default();
    let mut spiders: Vec<&LegoInstance> = Vec::with_capacity(selection.len());
    for id in selection.iter() {
        let lego = network.lego(*id)?;
        if !seen.insert(*id) {
            return Err(ValidationError::DuplicateSelection(*id).into());
        }
        if !lego.is_spider() {
            return Err(ValidationError::NotASpider(*id).into());
        }
        spiders.push(lego);
    }
    Ok(spiders)
}

// resolve a selection of exactly `n` spiders
pub(crate) fn select_n_spiders<'a>(
    network: &'a TensorNetwork,
    selection: &[LegoId],
    n: usize,
    rule: &'static str,
) -> LegoResult<Vec<&'a LegoInstance>>
{
    if selection.len() != n {
        return Err(
            ValidationError::SelectionSize {
                rule,
                expected: n,
                found: selection.len(),
            }
            .into()
        );
    }
    select_spiders(network, selection, rule)
}

mod bialgebra;
pub use bialgebra::*;
mod inverse_bialgebra;
pub use inverse_bialgebra::*;
mod hopf;
pub use hopf::*;
mod change_color;
pub use change_color::*;
mod pull_out_leg;
pub use pull_out_leg::*;
mod unfuse_to_legs;
pub use unfuse_to_legs::*;
mod unfuse_into_two;
pub use unfuse_into_two::*;
mod connect_center;
pub use connect_center::*;
mod complete_graph;
pub use complete_graph::*;


#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        LegoError,
        network::{ Color, LegoType, Position, create_dynamic_lego },
    };

    #[test]
    fn leg_map() {
        let mut map = LegMap::new();
        assert!(map.is_empty());
        assert_eq!(map.insert((0, 1), (3, 0)), None);
        assert_eq!(map.insert((0, 1), (3, 2)), Some(LegRef::new(3, 0)));
        map.insert((1, 0), (1, 0));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(LegRef::new(0, 1)), Some(LegRef::new(3, 2)));
        assert_eq!(map.get(LegRef::new(0, 0)), None);
        assert_eq!(
            map.map_connection(&Connection::new((0, 1), (1, 0))),
            Some(Connection::new((3, 2), (1, 0))),
        );
        assert_eq!(map.map_connection(&Connection::new((0, 0), (1, 0))), None);
    }

    #[test]
    fn selection_checks() {
        let net = TensorNetwork::from_parts(
            [
                create_dynamic_lego(Color::Z, 2, 0, Position::default()),
                LegoType::hadamard().instantiate(1, Position::default()),
            ],
            [],
        )
        .unwrap();
        assert!(matches!(
            select_spiders(&net, &[], "test"),
            Err(LegoError::Validation(ValidationError::EmptySelection("test"))),
        ));
        assert!(matches!(
            select_spiders(&net, &[0, 0], "test"),
            Err(LegoError::Validation(ValidationError::DuplicateSelection(0))),
        ));
        assert!(matches!(
            select_spiders(&net, &[0, 1], "test"),
            Err(LegoError::Validation(ValidationError::NotASpider(1))),
        ));
        assert!(matches!(
            select_spiders(&net, &[4], "test"),
            Err(LegoError::Reference(_)),
        ));
        assert!(matches!(
            select_n_spiders(&net, &[0], 2, "test"),
            Err(LegoError::Validation(
                ValidationError::SelectionSize { expected: 2, found: 1, .. }
            )),
        ));
        assert_eq!(select_spiders(&net, &[0], "test").unwrap().len(), 1);
    }

    #[test]
    fn shortcuts() {
        let net = TensorNetwork::from_parts(
            [create_dynamic_lego(Color::X, 3, 0, Position::default())],
            [],
        )
        .unwrap();
        assert!(net.can_apply(ChangeColor, &[0]));
        assert!(!net.can_apply(Hopf, &[0]));
        let edit = net.apply_rule(ChangeColor, &[0]).unwrap();
        assert_eq!(edit.operation.kind, OperationKind::ChangeColor);
        assert_eq!(
            net.find_rule(ChangeColor, &[0]).unwrap().apply(),
            edit,
        );
    }
}
