use super::*;
use crate::network::{ Color, create_dynamic_lego };

/// Expand a single wire between a Z spider and an X spider into a complete
/// bipartite graph.
///
/// Each outer leg of the X spider becomes a Z spider and each outer leg of the
/// Z spider becomes an X spider. Every new spider carries its outer leg at
/// index 0, followed by one leg for each spider of the opposite color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InverseBialgebra;

/// Output of [`InverseBialgebra::find`].
#[derive(Debug)]
pub struct InverseBialgebraData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) z: LegoId,
    pub(crate) x: LegoId,
    pub(crate) z_outer: Vec<usize>,
    pub(crate) x_outer: Vec<usize>,
}

const RULE: &str = "inverse bialgebra";

impl RewriteRule for InverseBialgebra {
    type Output<'a> = InverseBialgebraData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_n_spiders(net, selection, 2, RULE)?;
        if !spiders[0].is_diff_color(spiders[1]) {
            return Err(
                ValidationError::NoMatch(RULE, "needs one Z and one X spider")
                    .into()
            );
        }
        let (z, x) =
            if spiders[0].color() == Some(Color::Z) {
                (spiders[0], spiders[1])
            } else {
                (spiders[1], spiders[0])
            };
        let wires = net.connections_between(z.id, x.id);
        let [wire] = wires.as_slice() else {
            return Err(
                ValidationError::NoMatch(RULE, "spiders must share exactly one wire")
                    .into()
            );
        };
        if !net.connections_between(z.id, z.id).is_empty()
            || !net.connections_between(x.id, x.id).is_empty()
        {
            return Err(
                ValidationError::NoMatch(RULE, "spiders must not wire to themselves")
                    .into()
            );
        }
        if z.num_legs() < 2 || x.num_legs() < 2 {
            return Err(
                ValidationError::NoMatch(RULE, "each spider needs an outer leg")
                    .into()
            );
        }
        let outer = |s: &LegoInstance| -> Vec<usize> {
            (0..s.num_legs())
                .filter(|leg| !wire.has_leg(LegRef::new(s.id, *leg)))
                .collect()
        };
        Ok(InverseBialgebraData {
            net,
            z: z.id,
            x: x.id,
            z_outer: outer(z),
            x_outer: outer(x),
        })
    }
}

impl<'a> Rewrite for InverseBialgebraData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::InverseBialgebra }

    fn apply_with(self, layout: &Layout) -> Edit {
        let Self { net, z, x, z_outer, x_outer } = self;
        let z_pos = net.get_lego(z).map(|s| s.position).unwrap_or_default();
        let x_pos = net.get_lego(x).map(|s| s.position).unwrap_or_default();
        let m = x_outer.len();
        let n = z_outer.len();

        let mut rw = Rewiring::new(net);
        rw.replace(z);
        rw.replace(x);
        let new_zs: Vec<LegoId> = (0..m).map(|_| rw.fresh_id()).collect();
        let new_xs: Vec<LegoId> = (0..n).map(|_| rw.fresh_id()).collect();
        for (i, id) in new_zs.iter().enumerate() {
            let pos = layout.below(x_pos, i);
            rw.put(create_dynamic_lego(Color::Z, n + 1, *id, pos));
            rw.map_leg((x, x_outer[i]), (*id, 0));
        }
        for (j, id) in new_xs.iter().enumerate() {
            let pos = layout.below(z_pos, j);
            rw.put(create_dynamic_lego(Color::X, m + 1, *id, pos));
            rw.map_leg((z, z_outer[j]), (*id, 0));
        }
        for (i, zi) in new_zs.iter().enumerate() {
            for (j, xj) in new_xs.iter().enumerate() {
                rw.wire((*zi, 1 + j), (*xj, 1 + i));
            }
        }
        rw.finish(OperationKind::InverseBialgebra)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        LegoError,
        network::Position,
        rules::{
            Bialgebra,
            testing::{ assert_equivalent, assert_invertible, with_ports },
        },
    };

    fn spider(color: Color, id: LegoId, legs: usize) -> LegoInstance {
        create_dynamic_lego(color, legs, id, Position::new(id as f64, 0.0))
    }

    fn build_pair(z_legs: usize, x_legs: usize) -> TensorNetwork {
        TensorNetwork::from_parts(
            [spider(Color::Z, 0, z_legs), spider(Color::X, 1, x_legs)],
            [Connection::new((0, z_legs - 1), (1, 0))],
        )
        .unwrap()
    }

    #[test]
    fn two_by_two() {
        let net = with_ports(build_pair(3, 3));
        let edit = InverseBialgebra.find(&net, &[1, 0]).unwrap().apply();
        let after = &edit.network;
        // ports 2, 3 on 0:0, 0:1; ports 4, 5 on 1:1, 1:2
        assert_eq!(after.count_legos(), 8);
        assert_eq!(after.count_connections(), 8);
        for id in [6, 7] {
            assert_eq!(after.get_lego(id).unwrap().color(), Some(Color::Z));
            assert_eq!(after.get_lego(id).unwrap().num_legs(), 3);
        }
        for id in [8, 9] {
            assert_eq!(after.get_lego(id).unwrap().color(), Some(Color::X));
        }
        assert!(after.has_connection(&Connection::new((6, 0), (4, 0))));
        assert!(after.has_connection(&Connection::new((7, 0), (5, 0))));
        assert!(after.has_connection(&Connection::new((8, 0), (2, 0))));
        assert!(after.has_connection(&Connection::new((9, 0), (3, 0))));
        assert!(after.has_connection(&Connection::new((6, 2), (9, 1))));
        assert!(after.has_connection(&Connection::new((7, 1), (8, 2))));
        assert_equivalent(&net, after);
        assert_invertible(&net, &edit);

        // and back again
        let back = Bialgebra.find(after, &[6, 7, 8, 9]).unwrap().apply();
        assert_equivalent(&net, &back.network);
        assert_eq!(back.network.count_legos(), 6);
    }

    #[test]
    fn lopsided() {
        let net = with_ports(build_pair(2, 4));
        let edit = net.apply_rule(InverseBialgebra, &[0, 1]).unwrap();
        assert_eq!(edit.network.count_legos(), 4 + 3 + 1);
        assert_equivalent(&net, &edit.network);
        assert_invertible(&net, &edit);
    }

    #[test]
    fn preconditions() {
        let net = build_pair(3, 3);
        let no_match = |sel: &[LegoId], net: &TensorNetwork| {
            matches!(
                InverseBialgebra.find(net, sel),
                Err(LegoError::Validation(ValidationError::NoMatch(..))),
            )
        };
        assert!(InverseBialgebra.find(&net, &[0, 1]).is_ok());
        assert!(matches!(
            InverseBialgebra.find(&net, &[0]),
            Err(LegoError::Validation(ValidationError::SelectionSize { .. })),
        ));

        let mut doubled = net.clone();
        doubled.insert_connection(Connection::new((0, 0), (1, 1))).unwrap();
        assert!(no_match(&[0, 1], &doubled));

        let mut same = net.clone();
        same.put_lego(spider(Color::Z, 1, 3));
        assert!(no_match(&[0, 1], &same));

        let bare = TensorNetwork::from_parts(
            [spider(Color::Z, 0, 1), spider(Color::X, 1, 3)],
            [Connection::new((0, 0), (1, 0))],
        )
        .unwrap();
        assert!(no_match(&[0, 1], &bare));
    }
}
