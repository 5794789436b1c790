use super::*;
use crate::network::create_dynamic_lego;

/// Grow a spider by one leg, capped with a one-legged spider of the same
/// color.
///
/// Existing legs keep their indices; the new leg is the last.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PullOutLeg;

/// Output of [`PullOutLeg::find`].
#[derive(Debug)]
pub struct PullOutLegData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) s: LegoId, // spider
}

impl RewriteRule for PullOutLeg {
    type Output<'a> = PullOutLegData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_n_spiders(net, selection, 1, "pull out leg")?;
        Ok(PullOutLegData { net, s: spiders[0].id })
    }
}

impl<'a> Rewrite for PullOutLegData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::PullOutLeg }

    fn apply_with(self, layout: &Layout) -> Edit {
        let Self { net, s } = self;
        let mut rw = Rewiring::new(net);
        if let Some((spider, color)) =
            net.get_lego(s).and_then(|sp| sp.color().map(|c| (sp, c)))
        {
            let n = spider.num_legs();
            let cap = rw.fresh_id();
            rw.replace(s);
            rw.put(create_dynamic_lego(color, n + 1, s, spider.position));
            rw.put(
                create_dynamic_lego(
                    color, 1, cap, layout.right_of(spider.position, 1))
            );
            (0..n).for_each(|leg| { rw.map_leg((s, leg), (s, leg)); });
            rw.wire((s, n), (cap, 0));
        }
        rw.finish(OperationKind::PullOutLeg)
    }
}
