//! Reversible edit records and the undo/redo log.
//!
//! Every operation stores the complete legos and connections it removed and
//! added, so replaying it in either direction is a matter of swapping sets;
//! nothing is ever recomputed. This matters because neither fusion nor the
//! rewrite rules can be inverted by running an algorithm backwards.

use log::debug;
use crate::network::{
    Connection,
    LegoInstance,
    ReferenceError,
    ReferenceResult,
    TensorNetwork,
};

/// The kind of mutation an [`Operation`] records.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Remove,
    Move,
    Connect,
    Disconnect,
    Fuse,
    UnfuseToLegs,
    UnfuseIntoTwo,
    Bialgebra,
    InverseBialgebra,
    Hopf,
    ConnectCenter,
    CompleteGraph,
    InjectTwoLegged,
    AddStopper,
    ChangeColor,
    PullOutLeg,
}

/// A reversible record of a single edit.
///
/// A lego that was modified in place (moved, resized, recolored) appears in
/// both `removed_legos` and `added_legos` under the same ID, holding its state
/// before and after the edit respectively.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub kind: OperationKind,
    pub added_legos: Vec<LegoInstance>,
    pub removed_legos: Vec<LegoInstance>,
    pub added_connections: Vec<Connection>,
    pub removed_connections: Vec<Connection>,
}

impl Operation {
    /// Record the difference between two snapshots.
    pub fn between(
        kind: OperationKind,
        before: &TensorNetwork,
        after: &TensorNetwork,
    ) -> Self {
        let removed_legos: Vec<LegoInstance> =
            before.legos.values()
            .filter(|lego| after.legos.get(&lego.id) != Some(*lego))
            .cloned()
            .collect();
        let added_legos: Vec<LegoInstance> =
            after.legos.values()
            .filter(|lego| before.legos.get(&lego.id) != Some(*lego))
            .cloned()
            .collect();
        let removed_connections: Vec<Connection> =
            before.connections.difference(&after.connections)
            .copied()
            .collect();
        let added_connections: Vec<Connection> =
            after.connections.difference(&before.connections)
            .copied()
            .collect();
        Self {
            kind,
            added_legos,
            removed_legos,
            added_connections,
            removed_connections,
        }
    }

    /// Return `true` if the operation changes nothing.
    pub fn is_empty(&self) -> bool {
        self.added_legos.is_empty()
            && self.removed_legos.is_empty()
            && self.added_connections.is_empty()
            && self.removed_connections.is_empty()
    }

    /// Return the operation undoing `self`: the added and removed sets are
    /// swapped.
    pub fn inverse(&self) -> Self {
        Self {
            kind: self.kind,
            added_legos: self.removed_legos.clone(),
            removed_legos: self.added_legos.clone(),
            added_connections: self.removed_connections.clone(),
            removed_connections: self.added_connections.clone(),
        }
    }

    /// Apply the operation to a snapshot, returning the new snapshot.
    ///
    /// Connections are removed first, then legos, then legos are added, then
    /// connections. Fails if anything to be removed is absent, if an added lego
    /// collides with a present one, or if the result breaks a structural
    /// invariant; `network` itself is never modified.
    pub fn apply(&self, network: &TensorNetwork) -> ReferenceResult<TensorNetwork> {
        let mut net = network.clone();
        for conn in self.removed_connections.iter() {
            net.remove_connection(conn)?;
        }
        for lego in self.removed_legos.iter() {
            net.legos.remove(&lego.id)
                .ok_or(ReferenceError::MissingLego(lego.id))?;
        }
        for lego in self.added_legos.iter() {
            net.insert_lego(lego.clone())?;
        }
        for conn in self.added_connections.iter() {
            net.insert_connection(*conn)?;
        }
        net.validate()?;
        Ok(net)
    }

    /// Apply the inverse of the operation to a snapshot.
    pub fn revert(&self, network: &TensorNetwork) -> ReferenceResult<TensorNetwork> {
        self.inverse().apply(network)
    }
}

/// The result of every mutating operation: the complete new network and the
/// record that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct Edit {
    pub network: TensorNetwork,
    pub operation: Operation,
}

impl Edit {
    /// Package a new snapshot with the operation leading to it from `before`.
    pub fn new(kind: OperationKind, before: &TensorNetwork, after: TensorNetwork)
        -> Self
    {
        let operation = Operation::between(kind, before, &after);
        debug!(
            "{:?}: -{} +{} legos, -{} +{} connections",
            kind,
            operation.removed_legos.len(),
            operation.added_legos.len(),
            operation.removed_connections.len(),
            operation.added_connections.len(),
        );
        Self { network: after, operation }
    }

    /// Push the operation into a history and return the new network.
    pub fn commit(self, history: &mut OperationHistory) -> TensorNetwork {
        history.add_operation(self.operation);
        self.network
    }
}

/// A linear log of operations with a cursor.
///
/// Operations before the cursor can be undone; operations at or after it can
/// be redone. Adding an operation discards everything after the cursor.
#[derive(Clone, Debug, Default)]
pub struct OperationHistory {
    ops: Vec<Operation>,
    cursor: usize,
}

impl OperationHistory {
    /// Create a new, empty history.
    pub fn new() -> Self { Self::default() }

    /// Return the number of recorded operations, undone or not.
    pub fn len(&self) -> usize { self.ops.len() }

    /// Return `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool { self.ops.is_empty() }

    /// Return `true` if there is an operation to undo.
    pub fn can_undo(&self) -> bool { self.cursor > 0 }

    /// Return `true` if there is an operation to redo.
    pub fn can_redo(&self) -> bool { self.cursor < self.ops.len() }

    /// Return the operations that can be undone, oldest first.
    pub fn done(&self) -> &[Operation] { &self.ops[..self.cursor] }

    /// Return the operations that can be redone, next first.
    pub fn undone(&self) -> &[Operation] { &self.ops[self.cursor..] }

    /// Record a new operation at the cursor, discarding the redo tail.
    pub fn add_operation(&mut self, op: Operation) {
        self.ops.truncate(self.cursor);
        self.ops.push(op);
        self.cursor = self.ops.len();
    }

    /// Undo the most recent operation on `network`, returning the restored
    /// snapshot, or `None` if there is nothing to undo.
    ///
    /// The cursor only moves if the operation could be applied.
    pub fn undo(&mut self, network: &TensorNetwork)
        -> ReferenceResult<Option<TensorNetwork>>
    {
        if !self.can_undo() { return Ok(None); }
        let op = &self.ops[self.cursor - 1];
        let net = op.revert(network)?;
        debug!("undo {:?}", op.kind);
        self.cursor -= 1;
        Ok(Some(net))
    }

    /// Redo the next undone operation on `network`, returning the new
    /// snapshot, or `None` if there is nothing to redo.
    ///
    /// The cursor only moves if the operation could be applied.
    pub fn redo(&mut self, network: &TensorNetwork)
        -> ReferenceResult<Option<TensorNetwork>>
    {
        if !self.can_redo() { return Ok(None); }
        let op = &self.ops[self.cursor];
        let net = op.apply(network)?;
        debug!("redo {:?}", op.kind);
        self.cursor += 1;
        Ok(Some(net))
    }

    /// Forget every operation.
    pub fn clear(&mut self) {
        self.ops.clear();
        self.cursor = 0;
    }
}
