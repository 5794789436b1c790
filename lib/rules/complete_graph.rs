use super::*;
use crate::network::{ Color, create_dynamic_lego, create_hadamard };

/// Join every pair in a group of same-colored spiders through a new Hadamard.
///
/// With `k` spiders selected, each grows by `k - 1` legs appended after its
/// existing ones, which keep their indices. Spider `i`'s new legs face the
/// other spiders in selection order. For each pair `i < j`, in lexicographic
/// order, a Hadamard is wired to `i` through leg 0 and to `j` through leg 1.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompleteGraph;

/// Output of [`CompleteGraph::find`].
#[derive(Debug)]
pub struct CompleteGraphData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) color: Color,
    pub(crate) spiders: Vec<LegoId>,
}

const RULE: &str = "complete graph";

impl RewriteRule for CompleteGraph {
    type Output<'a> = CompleteGraphData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_spiders(net, selection, RULE)?;
        if spiders.len() < 2 {
            return Err(
                ValidationError::NoMatch(RULE, "needs at least two spiders")
                    .into()
            );
        }
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
        let spiders = spiders.iter().map(|s| s.id).collect();
        Ok(CompleteGraphData { net, color, spiders })
    }
}

impl<'a> Rewrite for CompleteGraphData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::CompleteGraph }

    fn apply_with(self, _layout: &Layout) -> Edit {
        let Self { net, color, spiders } = self;
        let k = spiders.len();
        let mut rw = Rewiring::new(net);
        let mut sizes: Vec<usize> = Vec::with_capacity(k);
        for id in spiders.iter() {
            let Some(spider) = net.get_lego(*id) else { continue; };
            let n = spider.num_legs();
            rw.replace(*id);
            rw.put(create_dynamic_lego(color, n + k - 1, *id, spider.position));
            (0..n).for_each(|leg| { rw.map_leg((*id, leg), (*id, leg)); });
            sizes.push(n);
        }
        // leg of spider `i` facing spider `j`
        let slot = |i: usize, j: usize| sizes[i] + if j < i { j } else { j - 1 };
        for i in 0..k {
            for j in i + 1..k {
                let pos_i = net.get_lego(spiders[i]).map(|s| s.position);
                let pos_j = net.get_lego(spiders[j]).map(|s| s.position);
                let pos = pos_i.zip(pos_j)
                    .map(|(a, b)| a.midpoint(b))
                    .unwrap_or_default();
                let h = rw.fresh_id();
                rw.put(create_hadamard(h, pos));
                rw.wire((spiders[i], slot(i, j)), (h, 0));
                rw.wire((h, 1), (spiders[j], slot(j, i)));
            }
        }
        rw.finish(OperationKind::CompleteGraph)
    }
}
