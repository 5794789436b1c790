use super::*;
use crate::network::create_dynamic_lego;

/// Remove a pair of parallel wires between two spiders of opposite colors.
///
/// Both spiders lose the two legs the wires were attached to, and their
/// remaining legs are renumbered contiguously in their original order. A
/// spider left with no legs is removed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Hopf;

/// Output of [`Hopf::find`].
#[derive(Debug)]
pub struct HopfData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) s1: LegoId, // spider 1
    pub(crate) s2: LegoId, // spider 2
    pub(crate) wires: [Connection; 2],
}

const RULE: &str = "Hopf";

impl RewriteRule for Hopf {
    type Output<'a> = HopfData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_n_spiders(net, selection, 2, RULE)?;
        let (s1, s2) = (spiders[0], spiders[1]);
        if !s1.is_diff_color(s2) {
            return Err(
                ValidationError::NoMatch(RULE, "spiders must differ in color")
                    .into()
            );
        }
        let wires = net.connections_between(s1.id, s2.id);
        match wires.as_slice() {
            [w1, w2, ..] => Ok(HopfData {
                net,
                s1: s1.id,
                s2: s2.id,
                wires: [*w1, *w2],
            }),
            _ => Err(
                ValidationError::NoMatch(
                    RULE, "spiders must share more than one wire")
                    .into()
            ),
        }
    }
}

impl<'a> Rewrite for HopfData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::Hopf }

    fn apply_with(self, _layout: &Layout) -> Edit {
        let Self { net, s1, s2, wires } = self;
        let mut rw = Rewiring::new(net);
        for id in [s1, s2] {
            let Some(spider) = net.get_lego(id) else { continue; };
            let Some(color) = spider.color() else { continue; };
            rw.replace(id);
            let kept: Vec<usize> =
                (0..spider.num_legs())
                .filter(|leg| {
                    let leg = LegRef::new(id, *leg);
                    !wires.iter().any(|w| w.has_leg(leg))
                })
                .collect();
            if kept.is_empty() { continue; }
            rw.put(create_dynamic_lego(color, kept.len(), id, spider.position));
            for (new, old) in kept.into_iter().enumerate() {
                rw.map_leg((id, old), (id, new));
            }
        }
        rw.finish(OperationKind::Hopf)
    }
}
