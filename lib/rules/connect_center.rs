use super::*;
use crate::network::{ Color, Position, create_dynamic_lego, create_hadamard };

/// Connect a group of same-colored spiders to a new central spider through
/// Hadamards.
///
/// The hub has one leg per selected spider, in selection order. Leg `k` of the
/// hub is wired to leg 0 of a new Hadamard, whose leg 1 is wired to the first
/// dangling leg of the `k`-th selected spider.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectCenter;

/// Output of [`ConnectCenter::find`].
#[derive(Debug)]
pub struct ConnectCenterData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) color: Color,
    pub(crate) members: Vec<(LegoId, usize)>, // (spider, first dangling leg)
}

const RULE: &str = "connect with center";

impl RewriteRule for ConnectCenter {
    type Output<'a> = ConnectCenterData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_spiders(net, selection, RULE)?;
        let color = spiders[0].color();
        if spiders.iter().any(|s| s.color() != color) {
            return Err(
                ValidationError::NoMatch(RULE, "spiders must share one color")
                    .into()
            );
        }
        let Some(color) = color else {
            return Err(ValidationError::NotASpider(spiders[0].id).into());
        };
        let mut members: Vec<(LegoId, usize)> = Vec::with_capacity(spiders.len());
        for s in spiders.iter() {
            let leg = net.dangling_legs(s.id)?
                .first()
                .copied()
                .ok_or(ValidationError::NoDanglingLeg(s.id))?;
            members.push((s.id, leg));
        }
        Ok(ConnectCenterData { net, color, members })
    }
}

impl<'a> Rewrite for ConnectCenterData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::ConnectCenter }

    fn apply_with(self, layout: &Layout) -> Edit {
        let Self { net, color, members } = self;
        let positions: Vec<Position> =
            members.iter()
            .map(|(id, _)| {
                net.get_lego(*id).map(|s| s.position).unwrap_or_default()
            })
            .collect();
        let center = Position::centroid(positions.iter().copied());
        let center =
            if positions.len() == 1 {
                layout.right_of(center, 1)
            } else {
                center
            };

        let mut rw = Rewiring::new(net);
        let hub = rw.fresh_id();
        rw.put(create_dynamic_lego(color, members.len(), hub, center));
        for (k, ((id, leg), pos)) in members.iter().zip(positions).enumerate() {
            let h = rw.fresh_id();
            rw.put(create_hadamard(h, center.midpoint(pos)));
            rw.wire((hub, k), (h, 0));
            rw.wire((h, 1), (*id, *leg));
        }
        rw.finish(OperationKind::ConnectCenter)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        LegoError,
        network::LegoKind,
        rules::testing::assert_invertible,
    };

    fn build_line() -> TensorNetwork {
        TensorNetwork::from_parts(
            [
                create_dynamic_lego(Color::Z, 2, 0, Position::new(0.0, 0.0)),
                create_dynamic_lego(Color::Z, 3, 1, Position::new(10.0, 0.0)),
                create_dynamic_lego(Color::Z, 2, 2, Position::new(20.0, 30.0)),
                create_dynamic_lego(Color::X, 2, 3, Position::new(0.0, 0.0)),
            ],
            [
                Connection::new((0, 1), (1, 0)),
                Connection::new((1, 1), (2, 0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn star() {
        let net = build_line();
        let edit = ConnectCenter.find(&net, &[2, 0, 1]).unwrap().apply();
        let after = &edit.network;
        let hub = after.get_lego(4).unwrap();
        assert_eq!(hub.kind, LegoKind::ZSpider);
        assert_eq!(hub.num_legs(), 3);
        assert_eq!(hub.position, Position::new(10.0, 10.0));
        for (k, (h, member)) in [(5, (2, 1)), (6, (0, 0)), (7, (1, 2))].into_iter().enumerate() {
            assert_eq!(after.get_lego(h).unwrap().kind, LegoKind::Hadamard);
            assert!(after.has_connection(&Connection::new((4, k), (h, 0))));
            assert!(after.has_connection(&Connection::new((h, 1), member)));
        }
        assert_eq!(after.count_connections(), 2 + 6);
        assert!(after.validate().is_ok());
        assert_invertible(&net, &edit);
    }

    #[test]
    fn preconditions() {
        let net = build_line();
        assert!(matches!(
            ConnectCenter.find(&net, &[0, 3]),
            Err(LegoError::Validation(ValidationError::NoMatch(..))),
        ));
        let full = ConnectCenter.find(&net, &[0, 1, 2]).unwrap().apply().network;
        assert!(matches!(
            ConnectCenter.find(&full, &[0]),
            Err(LegoError::Validation(ValidationError::NoDanglingLeg(0))),
        ));
        assert!(matches!(
            ConnectCenter.find(&net, &[]),
            Err(LegoError::Validation(ValidationError::EmptySelection(_))),
        ));
    }
}
