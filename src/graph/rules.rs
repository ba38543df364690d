// src/graph/rules.rs
//! Edge validity.
//!
//! An edge `source -> candidate` is legal only if every rule below holds. The
//! checks are read-only, so a rejected edge never changes the graph.
//!
//! * the candidate is not the none/unassigned type
//! * a boss-room candidate is refused once any boss room in the graph has a parent
//! * no duplicate edges, no self-loops, no edge back to one of the source's parents
//! * the candidate has no parent yet (one parent per node)
//! * exactly one endpoint is a corridor
//! * a room may branch into at most `max_child_corridors` corridors
//! * the entrance never receives an edge
//! * a corridor leads to at most one room

use thiserror::Error;

use super::graph::RoomGraph;
use super::node::NodeId;

/// Why an edge was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionRejection {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("room type '{0}' is not in the catalog")]
    UnknownRoomType(String),
    #[error("the target has no room type assigned")]
    CandidateUnassigned,
    #[error("a boss room is already connected")]
    BossRoomAlreadyConnected,
    #[error("the target is already a child of the source")]
    AlreadyChild,
    #[error("a node cannot connect to itself")]
    SelfLoop,
    #[error("the target is a parent of the source")]
    CandidateIsParent,
    #[error("the target already has a parent")]
    CandidateHasParent,
    #[error("corridors cannot connect to corridors")]
    CorridorToCorridor,
    #[error("rooms must be connected through a corridor")]
    RoomToRoom,
    #[error("the source already has {max} corridors")]
    CorridorLimitReached { max: usize },
    #[error("the entrance cannot have a parent")]
    CandidateIsEntrance,
    #[error("a corridor leads to a single room")]
    SourceAlreadyHasChild,
}

impl RoomGraph {
    /// True when `source -> candidate` may be added.
    pub fn can_connect(&self, source: &NodeId, candidate: &NodeId) -> bool {
        self.check_connection(source, candidate).is_ok()
    }

    /// Evaluates every connection rule, reporting the first one that fails.
    pub fn check_connection(
        &self,
        source: &NodeId,
        candidate: &NodeId,
    ) -> Result<(), ConnectionRejection> {
        let source_node = self
            .get_node(source)
            .ok_or_else(|| ConnectionRejection::UnknownNode(source.clone()))?;
        let candidate_node = self
            .get_node(candidate)
            .ok_or_else(|| ConnectionRejection::UnknownNode(candidate.clone()))?;
        let source_type = self
            .catalog()
            .get(source_node.room_type())
            .ok_or_else(|| ConnectionRejection::UnknownRoomType(source_node.room_type().into()))?;
        let candidate_type = self
            .catalog()
            .get(candidate_node.room_type())
            .ok_or_else(|| {
                ConnectionRejection::UnknownRoomType(candidate_node.room_type().into())
            })?;

        if candidate_type.is_none {
            return Err(ConnectionRejection::CandidateUnassigned);
        }
        if candidate_type.is_boss_room && self.has_connected_boss_room() {
            return Err(ConnectionRejection::BossRoomAlreadyConnected);
        }
        if source_node.has_child(candidate) {
            return Err(ConnectionRejection::AlreadyChild);
        }
        if source == candidate {
            return Err(ConnectionRejection::SelfLoop);
        }
        if source_node.has_parent(candidate) {
            return Err(ConnectionRejection::CandidateIsParent);
        }
        if !candidate_node.parents().is_empty() {
            return Err(ConnectionRejection::CandidateHasParent);
        }
        match (source_type.is_corridor, candidate_type.is_corridor) {
            (true, true) => return Err(ConnectionRejection::CorridorToCorridor),
            (false, false) => return Err(ConnectionRejection::RoomToRoom),
            _ => {}
        }
        // The source is a room here, so all of its children are corridors.
        if candidate_type.is_corridor && source_node.children().len() >= self.max_child_corridors()
        {
            return Err(ConnectionRejection::CorridorLimitReached {
                max: self.max_child_corridors(),
            });
        }
        if candidate_type.is_entrance {
            return Err(ConnectionRejection::CandidateIsEntrance);
        }
        if !candidate_type.is_corridor && !source_node.children().is_empty() {
            return Err(ConnectionRejection::SourceAlreadyHasChild);
        }
        Ok(())
    }

    /// True if any boss room in the graph already has a parent.
    pub fn has_connected_boss_room(&self) -> bool {
        self.nodes().iter().any(|node| {
            !node.parents().is_empty()
                && self
                    .catalog()
                    .get(node.room_type())
                    .map_or(false, |t| t.is_boss_room)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::{catalog, rect};

    fn graph(max_child_corridors: usize) -> RoomGraph {
        RoomGraph::new(catalog(), max_child_corridors)
    }

    fn rejection(g: &RoomGraph, a: &NodeId, b: &NodeId) -> ConnectionRejection {
        g.check_connection(a, b).unwrap_err()
    }

    #[test]
    fn test_entrance_scenario_with_single_corridor_limit() {
        let mut g = graph(1);
        let e = g.add_node("entrance", rect(0.0, 0.0));
        let small = g.add_node("small_room", rect(0.0, 100.0));
        assert!(!g.can_connect(&e, &small));
        assert_eq!(rejection(&g, &e, &small), ConnectionRejection::RoomToRoom);

        let c1 = g.add_node("corridor", rect(0.0, 200.0));
        assert!(g.can_connect(&e, &c1));
        assert!(g.add_edge(&e, &c1));

        let c2 = g.add_node("corridor", rect(0.0, 300.0));
        assert!(!g.can_connect(&e, &c2));
        assert_eq!(
            rejection(&g, &e, &c2),
            ConnectionRejection::CorridorLimitReached { max: 1 }
        );
    }

    #[test]
    fn test_only_one_boss_room_may_be_connected() {
        let mut g = graph(3);
        let c = g.add_node("corridor", rect(0.0, 0.0));
        let s = g.add_node("small_room", rect(0.0, 100.0));
        assert!(g.add_edge(&c, &s));

        // Retyping a parented node is refused, so the boss room is wired up fresh.
        assert!(!g.set_node_type(&s, "boss_room"));
        let boss = g.add_node("boss_room", rect(0.0, 200.0));
        let c2 = g.add_node("corridor", rect(100.0, 0.0));
        assert!(g.add_edge(&c2, &boss));
        assert!(g.has_connected_boss_room());

        let second_boss = g.add_node("boss_room", rect(0.0, 300.0));
        let c3 = g.add_node("corridor", rect(200.0, 0.0));
        assert_eq!(
            rejection(&g, &c3, &second_boss),
            ConnectionRejection::BossRoomAlreadyConnected
        );
    }

    #[test]
    fn test_unassigned_and_entrance_candidates() {
        let mut g = graph(3);
        let c = g.add_node("corridor", rect(0.0, 0.0));
        let none = g.add_node("none", rect(0.0, 100.0));
        let e = g.add_node("entrance", rect(0.0, 200.0));
        assert_eq!(rejection(&g, &c, &none), ConnectionRejection::CandidateUnassigned);
        assert_eq!(rejection(&g, &c, &e), ConnectionRejection::CandidateIsEntrance);
    }

    #[test]
    fn test_duplicates_self_loops_and_back_edges() {
        let mut g = graph(3);
        let s = g.add_node("small_room", rect(0.0, 0.0));
        let c = g.add_node("corridor", rect(0.0, 100.0));
        assert!(g.add_edge(&s, &c));
        assert_eq!(rejection(&g, &s, &c), ConnectionRejection::AlreadyChild);
        assert_eq!(rejection(&g, &c, &c), ConnectionRejection::SelfLoop);
        assert_eq!(rejection(&g, &c, &s), ConnectionRejection::CandidateIsParent);
    }

    #[test]
    fn test_one_parent_per_node() {
        let mut g = graph(3);
        let s1 = g.add_node("small_room", rect(0.0, 0.0));
        let s2 = g.add_node("medium_room", rect(0.0, 100.0));
        let c = g.add_node("corridor", rect(0.0, 200.0));
        assert!(g.add_edge(&s1, &c));
        assert_eq!(rejection(&g, &s2, &c), ConnectionRejection::CandidateHasParent);
    }

    #[test]
    fn test_corridor_to_corridor_rejected() {
        let mut g = graph(3);
        let c1 = g.add_node("corridor", rect(0.0, 0.0));
        let c2 = g.add_node("corridor", rect(0.0, 100.0));
        assert_eq!(rejection(&g, &c1, &c2), ConnectionRejection::CorridorToCorridor);
    }

    #[test]
    fn test_corridor_leads_to_a_single_room() {
        let mut g = graph(3);
        let c = g.add_node("corridor", rect(0.0, 0.0));
        let s1 = g.add_node("small_room", rect(0.0, 100.0));
        let s2 = g.add_node("medium_room", rect(0.0, 200.0));
        assert!(g.add_edge(&c, &s1));
        assert_eq!(rejection(&g, &c, &s2), ConnectionRejection::SourceAlreadyHasChild);
    }

    #[test]
    fn test_room_branches_up_to_limit() {
        let mut g = graph(3);
        let s = g.add_node("small_room", rect(0.0, 0.0));
        for i in 0..3 {
            let c = g.add_node("corridor", rect(100.0 * i as f32, 100.0));
            assert!(g.add_edge(&s, &c));
        }
        let extra = g.add_node("corridor", rect(0.0, 200.0));
        assert!(!g.add_edge(&s, &extra));
        assert_eq!(g.get_node(&s).unwrap().children().len(), 3);
    }

    #[test]
    fn test_unknown_ids_and_types_are_rejected() {
        let mut g = graph(3);
        let c = g.add_node("corridor", rect(0.0, 0.0));
        let ghost = NodeId::from("ghost");
        assert_eq!(rejection(&g, &c, &ghost), ConnectionRejection::UnknownNode(ghost.clone()));
        assert_eq!(rejection(&g, &ghost, &c), ConnectionRejection::UnknownNode(ghost));

        let odd = g.add_node("retired_type", rect(0.0, 100.0));
        assert_eq!(
            rejection(&g, &c, &odd),
            ConnectionRejection::UnknownRoomType("retired_type".into())
        );
    }

    #[test]
    fn test_longer_cycles_are_unreachable() {
        // Every node accepts one parent and the entrance accepts none, so closing a
        // loop back onto any node of a chain always hits a parent check.
        let mut g = graph(3);
        let e = g.add_node("entrance", rect(0.0, 0.0));
        let c1 = g.add_node("corridor", rect(0.0, 100.0));
        let s = g.add_node("small_room", rect(0.0, 200.0));
        let c2 = g.add_node("corridor", rect(0.0, 300.0));
        assert!(g.add_edge(&e, &c1));
        assert!(g.add_edge(&c1, &s));
        assert!(g.add_edge(&s, &c2));
        assert!(!g.can_connect(&c2, &e));
        assert!(!g.can_connect(&c2, &s));
        assert!(!g.can_connect(&c2, &c1));
        assert!(g.find_cycle().is_none());
    }
}
