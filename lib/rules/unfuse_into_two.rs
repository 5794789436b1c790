use itertools::Itertools;
use super::*;
use crate::network::create_dynamic_lego;

/// Split a spider in two along a subset of its legs.
///
/// The legs in `legs` move, in ascending order, to a spider that keeps the
/// original ID; the remaining legs move to a second spider under a fresh ID.
/// Each of the two gets one extra leg (its last), joining it to the other.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnfuseIntoTwo {
    pub legs: Vec<usize>,
}

impl UnfuseIntoTwo {
    /// Create a new split along `legs`.
    pub fn new<I>(legs: I) -> Self
    where I: IntoIterator<Item = usize>
    {
        Self { legs: legs.into_iter().collect() }
    }
}

/// Output of [`UnfuseIntoTwo::find`].
#[derive(Debug)]
pub struct UnfuseIntoTwoData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) s: LegoId, // spider
    pub(crate) part: Vec<usize>, // sorted subset staying under `s`
    pub(crate) rest: Vec<usize>,
}

impl RewriteRule for UnfuseIntoTwo {
    type Output<'a> = UnfuseIntoTwoData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_n_spiders(net, selection, 1, "unfuse into two")?;
        let spider = spiders[0];
        let n = spider.num_legs();
        let part: Vec<usize> = self.legs.iter().copied().sorted().collect();
        let valid =
            !part.is_empty()
            && part.len() < n
            && part.iter().all(|leg| *leg < n)
            && part.iter().tuple_windows().all(|(a, b)| a != b);
        if !valid {
            return Err(ValidationError::InvalidLegSubset(spider.id).into());
        }
        let rest: Vec<usize> =
            (0..n).filter(|leg| part.binary_search(leg).is_err()).collect();
        Ok(UnfuseIntoTwoData { net, s: spider.id, part, rest })
    }
}

impl<'a> Rewrite for UnfuseIntoTwoData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::UnfuseIntoTwo }

    fn apply_with(self, layout: &Layout) -> Edit {
        let Self { net, s, part, rest } = self;
        let mut rw = Rewiring::new(net);
        if let Some((spider, color)) =
            net.get_lego(s).and_then(|sp| sp.color().map(|c| (sp, c)))
        {
            let other = rw.fresh_id();
            rw.replace(s);
            rw.put(create_dynamic_lego(color, part.len() + 1, s, spider.position));
            rw.put(
                create_dynamic_lego(
                    color,
                    rest.len() + 1,
                    other,
                    layout.right_of(spider.position, 1),
                )
            );
            for (new, old) in part.iter().enumerate() {
                rw.map_leg((s, *old), (s, new));
            }
            for (new, old) in rest.iter().enumerate() {
                rw.map_leg((s, *old), (other, new));
            }
            rw.wire((s, part.len()), (other, rest.len()));
        }
        rw.finish(OperationKind::UnfuseIntoTwo)
    }
}
