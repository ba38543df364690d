// src/graph/diagnostics.rs
//! Read-only structural checks over a [`RoomGraph`], used after loading a file
//! and by the side panel.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use union_find::{QuickUnionUf, UnionBySize, UnionFind};

use super::graph::RoomGraph;
use super::node::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphIssue {
    DuplicateId(NodeId),
    UnknownRoomType { node: NodeId, room_type: String },
    DanglingChild { node: NodeId, child: NodeId },
    DanglingParent { node: NodeId, parent: NodeId },
    /// `parent` lists `child`, but `child` does not list `parent`.
    MissingParentHalf { parent: NodeId, child: NodeId },
    /// `child` lists `parent`, but `parent` does not list `child`.
    MissingChildHalf { parent: NodeId, child: NodeId },
    DuplicateEdge { parent: NodeId, child: NodeId },
}

impl fmt::Display for GraphIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphIssue::DuplicateId(id) => write!(f, "node id {} appears more than once", id),
            GraphIssue::UnknownRoomType { node, room_type } => {
                write!(f, "node {} has unknown room type '{}'", node, room_type)
            }
            GraphIssue::DanglingChild { node, child } => {
                write!(f, "node {} lists missing child {}", node, child)
            }
            GraphIssue::DanglingParent { node, parent } => {
                write!(f, "node {} lists missing parent {}", node, parent)
            }
            GraphIssue::MissingParentHalf { parent, child } => {
                write!(f, "edge {} -> {} is missing on the child", parent, child)
            }
            GraphIssue::MissingChildHalf { parent, child } => {
                write!(f, "edge {} -> {} is missing on the parent", parent, child)
            }
            GraphIssue::DuplicateEdge { parent, child } => {
                write!(f, "edge {} -> {} is recorded twice", parent, child)
            }
        }
    }
}

impl RoomGraph {
    /// Every violation of the edge-symmetry and id invariants. Empty for any
    /// graph built through the public operations.
    pub fn consistency_issues(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for node in self.nodes() {
            if !seen.insert(node.id()) {
                issues.push(GraphIssue::DuplicateId(node.id().clone()));
            }
            if self.catalog().get(node.room_type()).is_none() {
                issues.push(GraphIssue::UnknownRoomType {
                    node: node.id().clone(),
                    room_type: node.room_type().to_string(),
                });
            }

            let mut children = HashSet::new();
            for child in node.children() {
                if !children.insert(child) {
                    issues.push(GraphIssue::DuplicateEdge {
                        parent: node.id().clone(),
                        child: child.clone(),
                    });
                }
                match self.get_node(child) {
                    None => issues.push(GraphIssue::DanglingChild {
                        node: node.id().clone(),
                        child: child.clone(),
                    }),
                    Some(c) if !c.has_parent(node.id()) => {
                        issues.push(GraphIssue::MissingParentHalf {
                            parent: node.id().clone(),
                            child: child.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }

            for parent in node.parents() {
                match self.get_node(parent) {
                    None => issues.push(GraphIssue::DanglingParent {
                        node: node.id().clone(),
                        parent: parent.clone(),
                    }),
                    Some(p) if !p.has_child(node.id()) => {
                        issues.push(GraphIssue::MissingChildHalf {
                            parent: parent.clone(),
                            child: node.id().clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
        issues
    }

    /// Number of connected components, ignoring edge direction.
    pub fn island_count(&self) -> usize {
        let positions: HashMap<&NodeId, usize> = self
            .nodes()
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id(), pos))
            .collect();
        let mut islands = QuickUnionUf::<UnionBySize>::new(self.len());
        for (pos, node) in self.nodes().iter().enumerate() {
            for child in node.children() {
                if let Some(&child_pos) = positions.get(child) {
                    islands.union(pos, child_pos);
                }
            }
        }
        (0..self.len())
            .map(|pos| islands.find(pos))
            .collect::<HashSet<_>>()
            .len()
    }

    /// Nodes that cannot be reached from any entrance by following child edges,
    /// in node-list order.
    pub fn unreachable_from_entrance(&self) -> Vec<NodeId> {
        let mut reached: HashSet<&NodeId> = HashSet::new();
        let mut queue: VecDeque<&NodeId> = self
            .nodes()
            .iter()
            .filter(|node| {
                self.catalog()
                    .get(node.room_type())
                    .map_or(false, |t| t.is_entrance)
            })
            .map(|node| node.id())
            .collect();

        while let Some(id) = queue.pop_front() {
            if !reached.insert(id) {
                continue;
            }
            if let Some(node) = self.get_node(id) {
                queue.extend(node.children().iter());
            }
        }

        self.nodes()
            .iter()
            .map(|node| node.id())
            .filter(|id| !reached.contains(id))
            .cloned()
            .collect()
    }

    /// A directed cycle through child edges, if one exists (only possible in a
    /// hand-edited file). The returned path starts and ends on the same node.
    pub fn find_cycle(&self) -> Option<Vec<NodeId>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        let mut marks: HashMap<&NodeId, Mark> = HashMap::new();
        for root in self.nodes() {
            if marks.contains_key(root.id()) {
                continue;
            }
            // Iterative DFS; the stack holds (node, next child index).
            let mut stack: Vec<(&NodeId, usize)> = vec![(root.id(), 0)];
            marks.insert(root.id(), Mark::Visiting);
            while let Some(&(id, next)) = stack.last() {
                let children = self.get_node(id).map(|n| n.children()).unwrap_or(&[]);
                if let Some(child) = children.get(next) {
                    if let Some(top) = stack.last_mut() {
                        top.1 += 1;
                    }
                    match marks.get(child) {
                        Some(Mark::Visiting) => {
                            let start = stack.iter().position(|(n, _)| *n == child)?;
                            let mut cycle: Vec<NodeId> =
                                stack[start..].iter().map(|(n, _)| (*n).clone()).collect();
                            cycle.push(child.clone());
                            return Some(cycle);
                        }
                        Some(Mark::Done) => {}
                        None => {
                            if self.contains(child) {
                                marks.insert(child, Mark::Visiting);
                                stack.push((child, 0));
                            }
                        }
                    }
                } else {
                    marks.insert(id, Mark::Done);
                    stack.pop();
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::{catalog, rect};

    #[test]
    fn test_built_graph_is_consistent() {
        let mut g = RoomGraph::new(catalog(), 3);
        let e = g.add_node("entrance", rect(0.0, 0.0));
        let c = g.add_node("corridor", rect(0.0, 100.0));
        let s = g.add_node("small_room", rect(0.0, 200.0));
        assert!(g.add_edge(&e, &c));
        assert!(g.add_edge(&c, &s));
        assert!(g.consistency_issues().is_empty());
        assert_eq!(g.island_count(), 1);
        assert!(g.unreachable_from_entrance().is_empty());
        assert!(g.find_cycle().is_none());
    }

    #[test]
    fn test_islands_and_unreachable_nodes() {
        let mut g = RoomGraph::new(catalog(), 3);
        let e = g.add_node("entrance", rect(0.0, 0.0));
        let c = g.add_node("corridor", rect(0.0, 100.0));
        let s = g.add_node("small_room", rect(300.0, 0.0));
        let c2 = g.add_node("corridor", rect(300.0, 100.0));
        let lone = g.add_node("none", rect(600.0, 0.0));
        assert!(g.add_edge(&e, &c));
        assert!(g.add_edge(&s, &c2));
        assert_eq!(g.island_count(), 3);
        assert_eq!(g.unreachable_from_entrance(), vec![s, c2, lone]);
    }

    #[test]
    fn test_hand_edited_file_problems_are_reported() {
        let json = r#"{
            "format_version": 1,
            "nodes": [
                { "id": "a", "room_type": "corridor", "children": ["b", "ghost"],
                  "rect": { "min": { "x": 0.0, "y": 0.0 }, "width": 1.0, "height": 1.0 } },
                { "id": "b", "room_type": "small_room", "children": ["a"],
                  "rect": { "min": { "x": 0.0, "y": 0.0 }, "width": 1.0, "height": 1.0 } }
            ]
        }"#;
        let g = RoomGraph::deserialize(json.as_bytes(), catalog(), 3).unwrap();
        let issues = g.consistency_issues();
        let a = NodeId::from("a");
        let b = NodeId::from("b");
        assert!(issues.contains(&GraphIssue::DanglingChild { node: a.clone(), child: "ghost".into() }));
        assert!(issues.contains(&GraphIssue::MissingParentHalf { parent: a.clone(), child: b.clone() }));
        assert!(issues.contains(&GraphIssue::MissingParentHalf { parent: b.clone(), child: a.clone() }));

        let cycle = g.find_cycle().unwrap();
        assert_eq!(cycle.first(), cycle.last());
        assert_eq!(cycle.len(), 3);
    }
}
