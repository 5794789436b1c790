use super::*;
use crate::network::{ Color, Position, create_dynamic_lego };

/// Collapse a complete bipartite graph of single wires between Z spiders and X
/// spiders into one pair of spiders with the colors exchanged.
///
/// Every selected spider must have exactly one leg not used by the bipartite
/// wiring. The outer legs of the Z class are gathered in selection order onto a
/// new X spider, and those of the X class onto a new Z spider; the two are then
/// joined through the last leg of each.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Bialgebra;

/// Output of [`Bialgebra::find`].
#[derive(Debug)]
pub struct BialgebraData<'a> {
    pub(crate) net: &'a TensorNetwork,
    pub(crate) zs: Vec<(LegoId, usize)>, // (Z spider, outer leg)
    pub(crate) xs: Vec<(LegoId, usize)>, // (X spider, outer leg)
}

const RULE: &str = "bialgebra";

impl RewriteRule for Bialgebra {
    type Output<'a> = BialgebraData<'a>;

    fn find<'a>(self, net: &'a TensorNetwork, selection: &[LegoId])
        -> LegoResult<Self::Output<'a>>
    {
        let spiders = select_spiders(net, selection, RULE)?;
        let (zs, xs): (Vec<&LegoInstance>, Vec<&LegoInstance>) =
            spiders.into_iter()
            .partition(|s| s.color() == Some(Color::Z));
        if zs.is_empty() || xs.is_empty() {
            return Err(
                ValidationError::NoMatch(RULE, "needs spiders of both colors")
                    .into()
            );
        }
        for z in zs.iter() {
            for x in xs.iter() {
                if net.connections_between(z.id, x.id).len() != 1 {
                    return Err(
                        ValidationError::NoMatch(
                            RULE,
                            "every Z spider must share exactly one wire with \
                            every X spider",
                        )
                        .into()
                    );
                }
            }
        }
        for class in [&zs, &xs] {
            for (k, s1) in class.iter().enumerate() {
                for s2 in class.iter().skip(k) {
                    if !net.connections_between(s1.id, s2.id).is_empty() {
                        return Err(
                            ValidationError::NoMatch(
                                RULE,
                                "spiders of the same color must not be wired \
                                together",
                            )
                            .into()
                        );
                    }
                }
            }
        }

        let outer_leg = |s: &LegoInstance, others: &[&LegoInstance]| {
            if s.num_legs() != others.len() + 1 { return None; }
            (0..s.num_legs())
                .find(|leg| {
                    net.connection_at(LegRef::new(s.id, *leg))
                        .and_then(|conn| conn.end_off(s.id))
                        .map(|other| others.iter().all(|o| o.id != other.lego))
                        .unwrap_or(true)
                })
        };
        let mut z_outer: Vec<(LegoId, usize)> = Vec::with_capacity(zs.len());
        for z in zs.iter() {
            let leg = outer_leg(*z, xs.as_slice())
                .ok_or(ValidationError::NoMatch(
                    RULE, "every spider must have exactly one outer leg"))?;
            z_outer.push((z.id, leg));
        }
        let mut x_outer: Vec<(LegoId, usize)> = Vec::with_capacity(xs.len());
        for x in xs.iter() {
            let leg = outer_leg(*x, zs.as_slice())
                .ok_or(ValidationError::NoMatch(
                    RULE, "every spider must have exactly one outer leg"))?;
            x_outer.push((x.id, leg));
        }
        Ok(BialgebraData { net, zs: z_outer, xs: x_outer })
    }
}

impl<'a> Rewrite for BialgebraData<'a> {
    fn kind(&self) -> OperationKind { OperationKind::Bialgebra }

    fn apply_with(self, _layout: &Layout) -> Edit {
        let Self { net, zs, xs } = self;
        let centroid = |class: &[(LegoId, usize)]| {
            Position::centroid(
                class.iter()
                .filter_map(|(id, _)| net.get_lego(*id))
                .map(|s| s.position)
            )
        };
        let z_center = centroid(&zs);
        let x_center = centroid(&xs);

        let mut rw = Rewiring::new(net);
        let new_x = rw.fresh_id();
        let new_z = rw.fresh_id();
        zs.iter().chain(xs.iter()).for_each(|(id, _)| { rw.replace(*id); });
        rw.put(create_dynamic_lego(Color::X, zs.len() + 1, new_x, z_center));
        rw.put(create_dynamic_lego(Color::Z, xs.len() + 1, new_z, x_center));
        for (k, (id, leg)) in zs.iter().enumerate() {
            rw.map_leg((*id, *leg), (new_x, k));
        }
        for (k, (id, leg)) in xs.iter().enumerate() {
            rw.map_leg((*id, *leg), (new_z, k));
        }
        rw.wire((new_x, zs.len()), (new_z, xs.len()));
        rw.finish(OperationKind::Bialgebra)
    }
}
