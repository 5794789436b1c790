//! Contraction of a selection of legos into a single equivalent lego.
//!
//! The parity-check matrices of the selected legos are stacked into one block
//! matrix over a shared column space. Each wire between two selected legs is
//! then contracted by keeping only the combinations of rows whose Pauli content
//! agrees on both of its ends, after which the wire's columns are dropped. What
//! remains generates the stabilizer group of the contracted network on its
//! surviving legs.

use log::{ debug, trace };
use rustc_hash::{ FxHashMap, FxHashSet };
use thiserror::Error;
use crate::{
    LegoResult,
    binmat::BinMatrix,
    history::{ Edit, OperationKind },
    network::{
        Connection,
        LegRef,
        LegoId,
        LegoInstance,
        LegoKind,
        Position,
        TensorNetwork,
        recognize_type,
    },
};

/// Errors for failed contractions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FusionError {
    /// Returned when the selection is empty.
    #[error("failed to fuse legos: nothing selected")]
    EmptySelection,

    /// Returned when a selected lego does not exist.
    #[error("failed to fuse legos: missing lego {0}")]
    MissingLego(LegoId),

    /// Returned when a lego is selected more than once.
    #[error("failed to fuse legos: lego {0} selected twice")]
    DuplicateSelection(LegoId),

    /// Returned when a selected lego's matrix cannot be contracted, i.e. it
    /// has an odd number of columns or is already a scalar.
    #[error("failed to fuse legos: lego {0} cannot be contracted")]
    Uncontractable(LegoId),

    /// Returned when a connection among the selection refers to a missing leg
    /// or reuses a leg.
    #[error("failed to fuse legos: inconsistent connection {0}")]
    InconsistentConnection(Connection),
}
pub type FusionResult<T> = Result<T, FusionError>;

/// The algebraic result of a contraction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contraction {
    /// Canonical parity-check matrix of the contracted network, or a `1 × 1`
    /// scalar if no legs remain.
    pub matrix: BinMatrix,
    /// Origin of each surviving leg: leg `k` of `matrix` is
    /// `leg_ordering[k]`.
    pub leg_ordering: Vec<LegRef>,
}

/// Contract every connection among a selection of legos.
///
/// Surviving legs are ordered lego by lego in selection order, and by leg
/// index within each lego. If every leg is wired internally, the result is the
/// scalar `[[1]]` when some stabilizer survives the contraction and `[[0]]`
/// otherwise.
pub fn contract(network: &TensorNetwork, selection: &[LegoId])
    -> FusionResult<Contraction>
{
    if selection.is_empty() { return Err(FusionError::EmptySelection); }

    let mut seen: FxHashSet<LegoId> = FxHashSet::default();
    let mut legos: Vec<&LegoInstance> = Vec::with_capacity(selection.len());
    for id in selection.iter() {
        let lego =
            network.get_lego(*id).ok_or(FusionError::MissingLego(*id))?;
        if !seen.insert(*id) {
            return Err(FusionError::DuplicateSelection(*id));
        }
        let m = &lego.matrix;
        if m.is_scalar() || m.ncols() % 2 != 0 {
            return Err(FusionError::Uncontractable(*id));
        }
        legos.push(lego);
    }

    let mut offsets: FxHashMap<LegoId, usize> = FxHashMap::default();
    let mut total: usize = 0;
    for lego in legos.iter() {
        offsets.insert(lego.id, total);
        total += lego.num_legs();
    }
    let column = |leg: LegRef| -> Option<usize> {
        let lego = network.get_lego(leg.lego)?;
        lego.has_leg(leg.leg).then_some(())?;
        offsets.get(&leg.lego).map(|offs| offs + leg.leg)
    };

    let mut m = BinMatrix::symplectic_union(legos.iter().map(|lego| &lego.matrix));
    m.row_reduce();
    m.drop_zero_rows();

    let mut wired: Vec<bool> = vec![false; total];
    let internal =
        network.connections()
        .filter(|conn| {
            let (a, b) = conn.ends();
            seen.contains(&a.lego) && seen.contains(&b.lego)
        });
    for conn in internal {
        let (a, b) = conn.ends();
        let (Some(ca), Some(cb)) = (column(a), column(b))
            else { return Err(FusionError::InconsistentConnection(*conn)); };
        if ca == cb || wired[ca] || wired[cb] {
            return Err(FusionError::InconsistentConnection(*conn));
        }
        trace!("contracting {} over columns {} and {}", conn, ca, cb);
        m.add_col(ca, cb);
        m.eliminate(ca);
        m.add_col(total + ca, total + cb);
        m.eliminate(total + ca);
        wired[ca] = true;
        wired[cb] = true;
    }

    let mut leg_ordering: Vec<LegRef> = Vec::new();
    let mut keep: Vec<usize> = Vec::new();
    for lego in legos.iter() {
        let offs = offsets[&lego.id];
        for leg in 0..lego.num_legs() {
            if !wired[offs + leg] {
                leg_ordering.push(LegRef::new(lego.id, leg));
                keep.push(offs + leg);
            }
        }
    }

    let matrix =
        if keep.is_empty() {
            BinMatrix::scalar(m.nrows() > 0)
        } else {
            let cols: Vec<usize> =
                keep.iter().copied()
                .chain(keep.iter().map(|c| total + c))
                .collect();
            let out = m.select_cols(&cols).canonical();
            if out.nrows() == 0 {
                BinMatrix::zeros(1, 2 * keep.len())
            } else {
                out
            }
        };
    Ok(Contraction { matrix, leg_ordering })
}

/// Fuse a selection of legos into one.
///
/// The selected legos and all their connections are removed; the fused lego is
/// added under a fresh ID at the centroid of the selection, and every
/// connection that led out of the selection is reattached to the fused lego's
/// corresponding leg. Logical and gauge legs that survive keep their roles.
/// The result is tagged by [`recognize_type`] where possible and
/// [`Fused`][LegoKind::Fused] otherwise.
pub fn fuse(network: &TensorNetwork, selection: &[LegoId]) -> LegoResult<Edit> {
    fuse_with_ordering(network, selection).map(|(edit, _)| edit)
}

/// Like [`fuse`], but also return the leg ordering of the contraction: leg `k`
/// of the fused lego stands for the `k`-th entry.
pub fn fuse_with_ordering(network: &TensorNetwork, selection: &[LegoId])
    -> LegoResult<(Edit, Vec<LegRef>)>
{
    let Contraction { matrix, leg_ordering } = contract(network, selection)?;
    let selected: FxHashSet<LegoId> = selection.iter().copied().collect();
    let new_index: FxHashMap<LegRef, usize> =
        leg_ordering.iter().enumerate()
        .map(|(k, leg)| (*leg, k))
        .collect();

    let id = network.fresh_id();
    let kind = recognize_type(&matrix).unwrap_or(LegoKind::Fused);
    let position =
        Position::centroid(
            selection.iter()
            .filter_map(|sid| network.get_lego(*sid))
            .map(|lego| lego.position)
        );
    let mut fused = LegoInstance::new(id, kind, matrix, position);
    for lego in selection.iter().filter_map(|sid| network.get_lego(*sid)) {
        let remap = |leg: &usize| -> Option<usize> {
            new_index.get(&LegRef::new(lego.id, *leg)).copied()
        };
        fused.logical_legs.extend(lego.logical_legs.iter().filter_map(&remap));
        fused.gauge_legs.extend(lego.gauge_legs.iter().filter_map(&remap));
    }
    fused.logical_legs.sort_unstable();
    fused.gauge_legs.sort_unstable();

    let external: Vec<Connection> =
        network.connections()
        .filter(|conn| {
            let (a, b) = conn.ends();
            selected.contains(&a.lego) != selected.contains(&b.lego)
        })
        .copied()
        .collect();

    let mut net = network.clone();
    for sid in selection.iter() {
        net.take_lego(*sid)?;
    }
    debug!(
        "fused {} legos into lego {} ({:?}, {} legs)",
        selection.len(), id, fused.kind, fused.num_legs(),
    );
    net.insert_lego(fused)?;
    for conn in external.into_iter() {
        let rewired =
            conn.map_legs(|leg| {
                if selected.contains(&leg.lego) {
                    new_index.get(&leg).map(|k| LegRef::new(id, *k))
                } else {
                    Some(leg)
                }
            })
            .ok_or(FusionError::InconsistentConnection(conn))?;
        net.insert_connection(rewired)?;
    }
    Ok((Edit::new(OperationKind::Fuse, network, net), leg_ordering))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        LegoError,
        bmat,
        network::{ Color, LegoType, create_dynamic_lego },
    };

    fn lego(id: LegoId, matrix: BinMatrix) -> LegoInstance {
        LegoInstance::new(
            id,
            recognize_type(&matrix).unwrap_or(LegoKind::Fused),
            matrix,
            Position::new(id as f64, 2.0 * id as f64),
        )
    }

    fn spider(color: Color, id: LegoId, legs: usize) -> LegoInstance {
        create_dynamic_lego(color, legs, id, Position::new(id as f64, 0.0))
    }

    #[test]
    fn matching_stoppers() {
        let net = TensorNetwork::from_parts(
            [lego(0, bmat!([1, 0])), lego(1, bmat!([1, 0]))],
            [Connection::new((0, 0), (1, 0))],
        )
        .unwrap();
        let edit = fuse(&net, &[0, 1]).unwrap();
        assert_eq!(edit.network.count_legos(), 1);
        assert_eq!(edit.network.count_connections(), 0);
        let fused = edit.network.get_lego(2).unwrap();
        assert_eq!(fused.matrix, bmat!([1]));
        assert_eq!(fused.kind, LegoKind::Scalar);
        assert_eq!(fused.num_legs(), 0);
        assert_eq!(fused.position, Position::new(0.5, 1.0));
    }

    #[test]
    fn mismatched_stoppers() {
        let net = TensorNetwork::from_parts(
            [lego(0, bmat!([1, 0])), lego(1, bmat!([0, 1]))],
            [Connection::new((0, 0), (1, 0))],
        )
        .unwrap();
        let c = contract(&net, &[0, 1]).unwrap();
        assert_eq!(c.matrix, bmat!([0]));
        assert!(c.leg_ordering.is_empty());
    }

    #[test]
    fn tensor_product() {
        let net = TensorNetwork::from_parts(
            [
                LegoType::hadamard().instantiate(0, Position::default()),
                LegoType::stopper_i().instantiate(1, Position::default()),
            ],
            [],
        )
        .unwrap();
        let edit = fuse(&net, &[0, 1]).unwrap();
        let fused = edit.network.get_lego(2).unwrap();
        assert_eq!(
            fused.matrix,
            bmat!([1, 0, 0, 0, 1, 0], [0, 1, 0, 1, 0, 0]),
        );
        assert_eq!(fused.kind, LegoKind::Fused);
        assert_eq!(fused.num_legs(), 3);
    }

    #[test]
    fn direct_sum() {
        let z = spider(Color::Z, 0, 3);
        let x = spider(Color::X, 1, 2);
        let s = lego(2, bmat!([0, 1]));
        let net = TensorNetwork::from_parts(
            [z.clone(), x.clone(), s.clone()],
            [Connection::new((1, 1), (2, 0))],
        )
        .unwrap();
        // lego 0 shares no connection with the others
        let c = contract(&net, &[0, 1, 2]).unwrap();
        let rest = contract(&net, &[1, 2]).unwrap();
        let expected = BinMatrix::symplectic_union([&z.matrix, &rest.matrix]);
        assert!(c.matrix.same_row_space(&expected));
        assert_eq!(
            c.leg_ordering,
            vec![
                LegRef::new(0, 0),
                LegRef::new(0, 1),
                LegRef::new(0, 2),
                LegRef::new(1, 0),
            ],
        );
        // an X spider capped with a Z stopper on one leg leaves a Z stopper
        assert_eq!(rest.matrix, bmat!([0, 1]));
    }

    #[test]
    fn spider_fusion() {
        let net = TensorNetwork::from_parts(
            [
                spider(Color::Z, 0, 3),
                spider(Color::Z, 1, 3),
                LegoType::hadamard().instantiate(2, Position::default()),
            ],
            [
                Connection::new((0, 2), (1, 0)),
                Connection::new((1, 2), (2, 0)),
            ],
        )
        .unwrap();
        let c = contract(&net, &[0, 1]).unwrap();
        assert_eq!(
            c.leg_ordering,
            vec![
                LegRef::new(0, 0),
                LegRef::new(0, 1),
                LegRef::new(1, 1),
                LegRef::new(1, 2),
            ],
        );
        assert!(c.matrix.same_row_space(&spider(Color::Z, 9, 4).matrix));

        let edit = fuse(&net, &[0, 1]).unwrap();
        let fused = edit.network.get_lego(3).unwrap();
        assert_eq!(fused.kind, LegoKind::ZSpider);
        assert_eq!(edit.network.count_legos(), 2);
        assert!(edit.network.has_connection(&Connection::new((3, 3), (2, 0))));
        assert_eq!(edit.network.count_connections(), 1);
        assert!(edit.network.validate().is_ok());
        assert_eq!(edit.operation.kind, OperationKind::Fuse);
        assert_eq!(edit.operation.removed_legos.len(), 2);
        assert_eq!(edit.operation.removed_connections.len(), 2);
        assert_eq!(edit.operation.added_connections.len(), 1);
    }

    #[test]
    fn fused_leg_ordering() {
        let net = TensorNetwork::from_parts(
            [
                spider(Color::Z, 0, 3),
                spider(Color::X, 1, 2),
                LegoType::hadamard().instantiate(2, Position::default()),
            ],
            [
                Connection::new((0, 0), (1, 1)),
                Connection::new((1, 0), (2, 1)),
            ],
        )
        .unwrap();
        let (edit, ordering) = fuse_with_ordering(&net, &[1, 0]).unwrap();
        assert_eq!(
            ordering,
            vec![LegRef::new(1, 0), LegRef::new(0, 1), LegRef::new(0, 2)],
        );
        assert_eq!(ordering, contract(&net, &[1, 0]).unwrap().leg_ordering);
        // the wire to the Hadamard follows its leg to the fused lego
        assert!(edit.network.has_connection(&Connection::new((3, 0), (2, 1))));
        assert_eq!(edit.network.get_lego(3).unwrap().num_legs(), ordering.len());
        assert_eq!(edit, fuse(&net, &[1, 0]).unwrap());
    }

    #[test]
    fn parallel_wires() {
        let net = TensorNetwork::from_parts(
            [spider(Color::Z, 0, 3), spider(Color::X, 1, 3)],
            [
                Connection::new((0, 1), (1, 1)),
                Connection::new((0, 2), (1, 2)),
            ],
        )
        .unwrap();
        let c = contract(&net, &[0, 1]).unwrap();
        assert_eq!(c.leg_ordering, vec![LegRef::new(0, 0), LegRef::new(1, 0)]);
        assert_eq!(c.matrix, bmat!([1, 0, 0, 0], [0, 0, 0, 1]));
    }

    #[test]
    fn self_wire() {
        // a Z spider traced onto itself is a smaller Z spider
        let net = TensorNetwork::from_parts(
            [spider(Color::Z, 0, 4)],
            [Connection::new((0, 1), (0, 3))],
        )
        .unwrap();
        let c = contract(&net, &[0]).unwrap();
        assert_eq!(c.leg_ordering, vec![LegRef::new(0, 0), LegRef::new(0, 2)]);
        assert!(c.matrix.same_row_space(&spider(Color::Z, 1, 2).matrix));
    }

    #[test]
    fn carries_logical_legs() {
        let mut a = LegoType::identity().instantiate(0, Position::default());
        a.logical_legs = vec![1];
        let b = LegoType::hadamard().instantiate(1, Position::default());
        let net = TensorNetwork::from_parts(
            [a, b],
            [Connection::new((0, 0), (1, 1))],
        )
        .unwrap();
        let edit = fuse(&net, &[1, 0]).unwrap();
        let fused = edit.network.get_lego(2).unwrap();
        // legs: [1:0, 0:1]
        assert_eq!(fused.logical_legs, vec![1]);
        assert_eq!(fused.kind, LegoKind::Hadamard);
    }

    #[test]
    fn failures() {
        let net = TensorNetwork::from_parts(
            [spider(Color::Z, 0, 2), lego(1, bmat!([1]))],
            [],
        )
        .unwrap();
        assert_eq!(contract(&net, &[]), Err(FusionError::EmptySelection));
        assert_eq!(contract(&net, &[0, 5]), Err(FusionError::MissingLego(5)));
        assert_eq!(
            contract(&net, &[0, 0]),
            Err(FusionError::DuplicateSelection(0)),
        );
        assert_eq!(contract(&net, &[1]), Err(FusionError::Uncontractable(1)));
        let err = fuse(&net, &[0, 1]).unwrap_err();
        assert!(matches!(err, LegoError::Fusion(FusionError::Uncontractable(1))));
        assert!(err.to_string().starts_with("failed to fuse legos"));
    }

    #[test]
    fn input_untouched() {
        let net = TensorNetwork::from_parts(
            [spider(Color::Z, 0, 2), spider(Color::X, 1, 2)],
            [Connection::new((0, 0), (1, 0))],
        )
        .unwrap();
        let copy = net.clone();
        let _ = fuse(&net, &[0, 1]).unwrap();
        let _ = fuse(&net, &[0, 7]).unwrap_err();
        assert_eq!(net, copy);
    }
}
