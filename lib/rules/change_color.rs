use super::*;
use crate::network::{ create_dynamic_lego, create_hadamard };

/// Change the color of a spider by surrounding it with Hadamards.
///
/// The spider keeps its ID, position, and number of legs. Each leg `k` is then
/// wired to leg 0 of a new Hadamard, whose leg 1 takes over whatever leg `k`
/// was previously connected to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ChangeColor;

/// Output of [`ChangeColor::find`].
#[derive(Debug)]
pub struct ChangeColorData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) s: LegoId, // spider
}

impl RewriteRule for ChangeColor {
    type Output<'a> = ChangeColorData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_n_spiders(net, selection, 1, "change color")?;
        Ok(ChangeColorData { net, s: spiders[0].id })
    }
}

impl<'a> Rewrite for ChangeColorData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::ChangeColor }

    fn apply_with(self, layout: &Layout) -> Edit {
        let Self { net, s } = self;
        let mut rw = Rewiring::new(net);
        let Some(spider) = net.get_lego(s) else {
            return rw.finish(OperationKind::ChangeColor);
        };
        let Some(color) = spider.color() else {
            return rw.finish(OperationKind::ChangeColor);
        };
        let n = spider.num_legs();
        rw.replace(s);
        rw.put(create_dynamic_lego(color.flip(), n, s, spider.position));
        for leg in 0..n {
            let h = rw.fresh_id();
            let pos =
                net.connection_at(LegRef::new(s, leg))
                .and_then(|conn| conn.other(LegRef::new(s, leg)))
                .and_then(|other| net.get_lego(other.lego))
                .map(|other| spider.position.midpoint(other.position))
                .unwrap_or_else(|| layout.around(spider.position, leg, n));
            rw.put(create_hadamard(h, pos));
            rw.wire((s, leg), (h, 0));
            rw.map_leg((s, leg), (h, 1));
        }
        rw.finish(OperationKind::ChangeColor)
    }
}
