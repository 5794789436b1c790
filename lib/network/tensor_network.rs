use std::{
    collections::{ BTreeMap, BTreeSet },
    hash::Hasher,
};
use rustc_hash::{ FxHashSet, FxHasher };
use crate::network::{
    Connection,
    LegRef,
    LegoId,
    LegoInstance,
    ReferenceError,
    ReferenceResult,
};
use ReferenceError::*;

/// A snapshot of legos and the connections between them.
///
/// Legos are keyed by ID and connections are kept normalized in a sorted set,
/// so two networks holding the same legos and wires compare equal no matter
/// the order in which they were built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TensorNetwork {
    pub(crate) legos: BTreeMap<LegoId, LegoInstance>,
    pub(crate) connections: BTreeSet<Connection>,
}

impl TensorNetwork {
    /// Create a new, empty network.
    pub fn new() -> Self { Self::default() }

    /// Create a new network from a set of legos and connections.
    ///
    /// Fails if any lego ID is repeated or if the result would break a
    /// structural invariant (see [`validate`][Self::validate]).
    pub fn from_parts<I, J>(legos: I, connections: J) -> ReferenceResult<Self>
    where
        I: IntoIterator<Item = LegoInstance>,
        J: IntoIterator<Item = Connection>,
    {
        let mut net = Self::new();
        for lego in legos.into_iter() {
            net.insert_lego(lego)?;
        }
        for conn in connections.into_iter() {
            net.insert_connection(conn)?;
        }
        net.validate()?;
        Ok(net)
    }

    /// Return the number of legos.
    pub fn count_legos(&self) -> usize { self.legos.len() }

    /// Return the number of connections.
    pub fn count_connections(&self) -> usize { self.connections.len() }

    /// Return `true` if the network holds no legos.
    pub fn is_empty(&self) -> bool { self.legos.is_empty() }

    /// Get the lego associated with a particular ID if it exists.
    pub fn get_lego(&self, id: LegoId) -> Option<&LegoInstance> {
        self.legos.get(&id)
    }

    /// Like [`get_lego`][Self::get_lego], but failing with a
    /// [`ReferenceError`].
    pub fn lego(&self, id: LegoId) -> ReferenceResult<&LegoInstance> {
        self.legos.get(&id).ok_or(MissingLego(id))
    }

    /// Return `true` if a lego exists with the given ID.
    pub fn has_lego(&self, id: LegoId) -> bool { self.legos.contains_key(&id) }

    /// Return `true` if a connection exists.
    pub fn has_connection(&self, conn: &Connection) -> bool {
        self.connections.contains(conn)
    }

    /// Iterate over all legos in ID order.
    pub fn legos(&self) -> impl Iterator<Item = &LegoInstance> + '_ {
        self.legos.values()
    }

    /// Iterate over all lego IDs in order.
    pub fn lego_ids(&self) -> impl Iterator<Item = LegoId> + '_ {
        self.legos.keys().copied()
    }

    /// Iterate over all connections in sorted order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> + '_ {
        self.connections.iter()
    }

    /// Return the smallest ID greater than every ID in use.
    pub fn fresh_id(&self) -> LegoId {
        self.legos.keys().next_back().map(|id| id + 1).unwrap_or(0)
    }

    /// Check that a leg exists.
    pub fn check_leg(&self, leg: LegRef) -> ReferenceResult<()> {
        self.lego(leg.lego)?
            .has_leg(leg.leg)
            .then_some(())
            .ok_or(MissingLeg(leg.lego, leg.leg))
    }

    /// Return the connection a leg takes part in, if any.
    pub fn connection_at(&self, leg: LegRef) -> Option<&Connection> {
        self.connections.iter().find(|conn| conn.has_leg(leg))
    }

    /// Return `true` if a leg takes part in a connection.
    pub fn is_leg_connected(&self, leg: LegRef) -> bool {
        self.connection_at(leg).is_some()
    }

    /// Return all connections with at least one endpoint on lego `id`.
    pub fn connections_of(&self, id: LegoId) -> Vec<Connection> {
        self.connections.iter()
            .filter(|conn| conn.touches(id))
            .copied()
            .collect()
    }

    /// Return all connections joining legos `a` and `b`.
    pub fn connections_between(&self, a: LegoId, b: LegoId) -> Vec<Connection> {
        self.connections.iter()
            .filter(|conn| conn.joins(a, b))
            .copied()
            .collect()
    }

    /// Return the indices of the legs of lego `id` that take part in no
    /// connection, in ascending order.
    pub fn dangling_legs(&self, id: LegoId) -> ReferenceResult<Vec<usize>> {
        let lego = self.lego(id)?;
        let used: FxHashSet<usize> =
            self.connections.iter()
            .flat_map(|conn| {
                let (a, b) = conn.ends();
                [a, b].into_iter()
            })
            .filter(|leg| leg.is_on(id))
            .map(|leg| leg.leg)
            .collect();
        Ok((0..lego.num_legs()).filter(|k| !used.contains(k)).collect())
    }

    /// Return the sub-network induced by a set of legos: the legos themselves
    /// and every connection with both endpoints among them.
    pub fn subnetwork(&self, ids: &[LegoId]) -> ReferenceResult<Self> {
        let mut sub = Self::new();
        for id in ids.iter() {
            let lego = self.lego(*id)?;
            sub.legos.insert(*id, lego.clone());
        }
        sub.connections =
            self.connections.iter()
            .filter(|conn| {
                let (a, b) = conn.ends();
                sub.has_lego(a.lego) && sub.has_lego(b.lego)
            })
            .copied()
            .collect();
        Ok(sub)
    }

    /// Return a deterministic hash of the lego IDs and connections.
    ///
    /// The signature does not depend on the order in which legos or
    /// connections were added, and changes whenever either set changes. It is
    /// intended as a cache key for quantities derived from the network.
    pub fn signature(&self) -> String {
        let mut hasher = FxHasher::default();
        hasher.write_usize(self.legos.len());
        self.legos.keys().for_each(|id| { hasher.write_usize(*id); });
        hasher.write_usize(self.connections.len());
        for conn in self.connections.iter() {
            let (a, b) = conn.ends();
            hasher.write_usize(a.lego);
            hasher.write_usize(a.leg);
            hasher.write_usize(b.lego);
            hasher.write_usize(b.leg);
        }
        format!("{:016x}", hasher.finish())
    }

    /// Check every structural invariant:
    /// - every matrix has an even number of columns (scalars excepted);
    /// - every connection joins two distinct, existing legs;
    /// - no leg takes part in more than one connection.
    pub fn validate(&self) -> ReferenceResult<()> {
        for (id, lego) in self.legos.iter() {
            let m = &lego.matrix;
            if !m.is_scalar() && m.ncols() % 2 != 0 {
                return Err(OddColumns(*id, m.ncols()));
            }
        }
        let mut seen: FxHashSet<LegRef> = FxHashSet::default();
        for conn in self.connections.iter() {
            let (a, b) = conn.ends();
            if a == b { return Err(SelfConnection(a)); }
            for leg in [a, b] {
                self.check_leg(leg)?;
                if !seen.insert(leg) { return Err(LegConnected(leg)); }
            }
        }
        Ok(())
    }

    // add a lego, failing on duplicate IDs
    pub(crate) fn insert_lego(&mut self, lego: LegoInstance)
        -> ReferenceResult<()>
    {
        if self.legos.contains_key(&lego.id) {
            return Err(DuplicateLego(lego.id));
        }
        self.legos.insert(lego.id, lego);
        Ok(())
    }

    // add or overwrite a lego
    pub(crate) fn put_lego(&mut self, lego: LegoInstance) {
        self.legos.insert(lego.id, lego);
    }

    // remove a lego and every connection touching it
    pub(crate) fn take_lego(&mut self, id: LegoId)
        -> ReferenceResult<(LegoInstance, Vec<Connection>)>
    {
        let lego = self.legos.remove(&id).ok_or(MissingLego(id))?;
        let conns = self.connections_of(id);
        conns.iter().for_each(|conn| { self.connections.remove(conn); });
        Ok((lego, conns))
    }

    // add a connection between existing, free legs
    pub(crate) fn insert_connection(&mut self, conn: Connection)
        -> ReferenceResult<()>
    {
        let (a, b) = conn.ends();
        if a == b { return Err(SelfConnection(a)); }
        for leg in [a, b] {
            self.check_leg(leg)?;
            if self.is_leg_connected(leg) { return Err(LegConnected(leg)); }
        }
        self.connections.insert(conn);
        Ok(())
    }

    // remove an existing connection
    pub(crate) fn remove_connection(&mut self, conn: &Connection)
        -> ReferenceResult<()>
    {
        self.connections.remove(conn)
            .then_some(())
            .ok_or(MissingConnection(*conn))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::network::{ Color, Position, create_dynamic_lego };

    fn z(id: LegoId, legs: usize) -> LegoInstance {
        create_dynamic_lego(Color::Z, legs, id, Position::default())
    }

    fn build_simple() -> TensorNetwork {
        TensorNetwork::from_parts(
            [z(0, 3), z(1, 2), z(4, 1)],
            [
                Connection::new((0, 0), (1, 1)),
                Connection::new((0, 2), (4, 0)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn counts() {
        let net = build_simple();
        assert_eq!(net.count_legos(), 3);
        assert_eq!(net.count_connections(), 2);
        assert_eq!(net.fresh_id(), 5);
        assert_eq!(TensorNetwork::new().fresh_id(), 0);
        assert_eq!(net.dangling_legs(0).unwrap(), vec![1]);
        assert_eq!(net.dangling_legs(1).unwrap(), vec![0]);
        assert_eq!(net.dangling_legs(4).unwrap(), Vec::<usize>::new());
        assert_eq!(net.dangling_legs(2), Err(MissingLego(2)));
        assert_eq!(net.connections_of(0).len(), 2);
        assert_eq!(net.connections_between(4, 0).len(), 1);
        assert!(net.is_leg_connected(LegRef::new(1, 1)));
        assert!(!net.is_leg_connected(LegRef::new(1, 0)));
    }

    #[test]
    fn invariants() {
        let dup = TensorNetwork::from_parts([z(0, 2), z(0, 2)], []);
        assert_eq!(dup, Err(DuplicateLego(0)));

        let degree = TensorNetwork::from_parts(
            [z(0, 2), z(1, 2), z(2, 2)],
            [
                Connection::new((0, 0), (1, 0)),
                Connection::new((0, 0), (2, 0)),
            ],
        );
        assert_eq!(degree, Err(LegConnected(LegRef::new(0, 0))));

        let range = TensorNetwork::from_parts(
            [z(0, 2), z(1, 2)],
            [Connection::new((0, 2), (1, 0))],
        );
        assert_eq!(range, Err(MissingLeg(0, 2)));

        let missing = TensorNetwork::from_parts(
            [z(0, 2)],
            [Connection::new((0, 0), (1, 0))],
        );
        assert_eq!(missing, Err(MissingLego(1)));

        let selfconn = TensorNetwork::from_parts(
            [z(0, 2)],
            [Connection::new((0, 1), (0, 1))],
        );
        assert_eq!(selfconn, Err(SelfConnection(LegRef::new(0, 1))));

        let mut odd = z(0, 2);
        odd.matrix = crate::bmat!([1, 0, 1]);
        assert_eq!(
            TensorNetwork::from_parts([odd], []),
            Err(OddColumns(0, 3)),
        );
    }

    #[test]
    fn signature() {
        let net = build_simple();
        let reordered = TensorNetwork::from_parts(
            [z(4, 1), z(1, 2), z(0, 3)],
            [
                Connection::new((4, 0), (0, 2)),
                Connection::new((1, 1), (0, 0)),
            ],
        )
        .unwrap();
        assert_eq!(net, reordered);
        assert_eq!(net.signature(), reordered.signature());
        assert_eq!(net.signature().len(), 16);

        let mut rewired = net.clone();
        rewired.remove_connection(&Connection::new((0, 0), (1, 1))).unwrap();
        assert_ne!(net.signature(), rewired.signature());
        rewired.insert_connection(Connection::new((0, 1), (1, 0))).unwrap();
        assert_ne!(net.signature(), rewired.signature());

        let mut grown = net.clone();
        grown.insert_lego(z(9, 1)).unwrap();
        assert_ne!(net.signature(), grown.signature());
    }

    #[test]
    fn subnetwork() {
        let net = build_simple();
        let sub = net.subnetwork(&[0, 1]).unwrap();
        assert_eq!(sub.count_legos(), 2);
        assert_eq!(sub.count_connections(), 1);
        assert!(sub.has_connection(&Connection::new((0, 0), (1, 1))));
        assert_eq!(net.subnetwork(&[7]), Err(MissingLego(7)));
    }

    #[test]
    fn take_lego() {
        let mut net = build_simple();
        let (lego, conns) = net.take_lego(0).unwrap();
        assert_eq!(lego.id, 0);
        assert_eq!(conns.len(), 2);
        assert_eq!(net.count_connections(), 0);
        assert!(net.validate().is_ok());
    }
}
