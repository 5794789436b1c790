use super::*;
use crate::network::create_dynamic_lego;

/// Splice a two-legged spider of the same color into every leg of a spider.
///
/// The spider itself is left unchanged. For each leg `k`, a new spider is
/// connected to it through leg 0 and takes over its previous connection (if
/// any) through leg 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnfuseToLegs;

/// Output of [`UnfuseToLegs::find`].
#[derive(Debug)]
pub struct UnfuseToLegsData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) s: LegoId, // spider
}

impl RewriteRule for UnfuseToLegs {
    type Output<'a> = UnfuseToLegsData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_n_spiders(net, selection, 1, "unfuse to legs")?;
        Ok(UnfuseToLegsData { net, s: spiders[0].id })
    }
}

impl<'a> Rewrite for UnfuseToLegsData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::UnfuseToLegs }

    fn apply_with(self, layout: &Layout) -> Edit {
        let Self { net, s } = self;
        let mut rw = Rewiring::new(net);
        if let Some((spider, color)) =
            net.get_lego(s).and_then(|sp| sp.color().map(|c| (sp, c)))
        {
            let n = spider.num_legs();
            rw.replace(s);
            rw.put(spider.clone());
            for leg in 0..n {
                let id = rw.fresh_id();
                let pos = layout.around(spider.position, leg, n);
                rw.put(create_dynamic_lego(color, 2, id, pos));
                rw.wire((s, leg), (id, 0));
                rw.map_leg((s, leg), (id, 1));
            }
        }
        rw.finish(OperationKind::UnfuseToLegs)
    }
}
