//! Splicing small legos into an existing network: capping a dangling leg with
//! a stopper and inserting a two-legged lego into a wire.
//!
//! Both operations accept a lego whose ID is already present in the network,
//! in which case the lego is *relocated*: its old instance and every wire
//! attached to it are dropped before it is placed at the new site. This only
//! holds if the lego already there is the same one, i.e. it has the same kind
//! and leg count and an equivalent matrix; any other lego under that ID is a
//! collision.

use crate::{
    LegoResult,
    history::{ Edit, OperationKind },
    network::{
        Connection,
        LegRef,
        LegoInstance,
        ReferenceError,
        TensorNetwork,
    },
    rules::ValidationError,
};

// drop the prior placement of `lego`, if there is one
fn take_prior(network: &mut TensorNetwork, lego: &LegoInstance)
    -> LegoResult<()>
{
    let Some(prior) = network.get_lego(lego.id) else { return Ok(()); };
    let same =
        prior.kind == lego.kind
        && prior.num_legs() == lego.num_legs()
        && prior.matrix.same_row_space(&lego.matrix);
    if !same {
        return Err(ReferenceError::DuplicateLego(lego.id).into());
    }
    network.take_lego(lego.id)?;
    Ok(())
}

/// Connect leg 0 of a one-legged lego to a dangling leg.
pub fn add_stopper(network: &TensorNetwork, leg: LegRef, stopper: LegoInstance)
    -> LegoResult<Edit>
{
    network.check_leg(leg)?;
    if leg.is_on(stopper.id) {
        return Err(
            ValidationError::NoMatch("add stopper", "a stopper cannot cap itself")
                .into()
        );
    }
    if network.is_leg_connected(leg) {
        return Err(ValidationError::NotDangling(leg).into());
    }
    if stopper.num_legs() != 1 {
        return Err(
            ValidationError::LegCount {
                id: stopper.id,
                expected: 1,
                found: stopper.num_legs(),
            }
            .into()
        );
    }
    let id = stopper.id;
    let mut net = network.clone();
    take_prior(&mut net, &stopper)?;
    net.insert_lego(stopper)?;
    net.insert_connection(Connection::new((id, 0), leg))?;
    net.validate()?;
    Ok(Edit::new(OperationKind::AddStopper, network, net))
}

/// Replace a connection `a -- b` by `a -- (lego, 0)` and `(lego, 1) -- b`,
/// where `a` is the smaller end of the connection.
pub fn inject_two_legged(
    network: &TensorNetwork,
    conn: Connection,
    lego: LegoInstance,
) -> LegoResult<Edit>
{
    if !network.has_connection(&conn) {
        return Err(ReferenceError::MissingConnection(conn).into());
    }
    if conn.touches(lego.id) {
        return Err(ValidationError::SpliceOnSelf(conn, lego.id).into());
    }
    if lego.num_legs() != 2 {
        return Err(
            ValidationError::LegCount {
                id: lego.id,
                expected: 2,
                found: lego.num_legs(),
            }
            .into()
        );
    }
    let id = lego.id;
    let (a, b) = conn.ends();
    let mut net = network.clone();
    take_prior(&mut net, &lego)?;
    net.remove_connection(&conn)?;
    net.insert_lego(lego)?;
    net.insert_connection(Connection::new(a, (id, 0)))?;
    net.insert_connection(Connection::new((id, 1), b))?;
    net.validate()?;
    Ok(Edit::new(OperationKind::InjectTwoLegged, network, net))
}
