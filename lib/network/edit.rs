//! Plain structural edits: adding, removing, moving, connecting and
//! disconnecting legos.
//!
//! Each edit checks its references against the network and returns the new
//! network together with the [`Operation`][crate::history::Operation] that
//! produced it.

use crate::{
    LegoResult,
    history::{ Edit, OperationKind },
    network::{
        Connection,
        LegoId,
        LegoInstance,
        Position,
        TensorNetwork,
    },
};

/// Add new legos to the network.
///
/// Fails if any ID is already in use or a matrix is malformed.
pub fn add_legos<I>(network: &TensorNetwork, legos: I) -> LegoResult<Edit>
where I: IntoIterator<Item = LegoInstance>
{
    let mut net = network.clone();
    for lego in legos.into_iter() {
        net.insert_lego(lego)?;
    }
    net.validate()?;
    Ok(Edit::new(OperationKind::Add, network, net))
}

/// Remove legos from the network, along with every connection touching them.
pub fn remove_legos(network: &TensorNetwork, ids: &[LegoId]) -> LegoResult<Edit> {
    let mut net = network.clone();
    for id in ids.iter() {
        net.take_lego(*id)?;
    }
    Ok(Edit::new(OperationKind::Remove, network, net))
}

/// Move legos to new positions.
pub fn move_legos(network: &TensorNetwork, moves: &[(LegoId, Position)])
    -> LegoResult<Edit>
{
    let mut net = network.clone();
    for (id, pos) in moves.iter() {
        let moved = net.lego(*id)?.moved_to(*pos);
        net.put_lego(moved);
    }
    Ok(Edit::new(OperationKind::Move, network, net))
}

/// Connect two dangling legs.
pub fn connect(network: &TensorNetwork, conn: Connection) -> LegoResult<Edit> {
    let mut net = network.clone();
    net.insert_connection(conn)?;
    Ok(Edit::new(OperationKind::Connect, network, net))
}

/// Remove an existing connection.
pub fn disconnect(network: &TensorNetwork, conn: Connection) -> LegoResult<Edit> {
    let mut net = network.clone();
    net.remove_connection(&conn)?;
    Ok(Edit::new(OperationKind::Disconnect, network, net))
}
