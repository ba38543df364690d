// src/graph/node.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::{Rect, Vector2D};

/// Opaque, globally unique identifier of a room node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// A random version-4 GUID string.
    pub fn generate() -> Self {
        let mut bits: u128 = rand::random();
        bits = (bits & !(0xFu128 << 76)) | (0x4u128 << 76);
        bits = (bits & !(0x3u128 << 62)) | (0x2u128 << 62);
        let hex = format!("{:032x}", bits);
        NodeId(format!(
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One placed room in the layout graph.
///
/// `parents` and `children` are the two halves of every edge. They are only
/// mutated through [`super::RoomGraph`], which keeps them symmetric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomNode {
    pub(crate) id: NodeId,
    /// Catalog id of the assigned room type.
    pub(crate) room_type: String,
    #[serde(default)]
    pub(crate) parents: Vec<NodeId>,
    #[serde(default)]
    pub(crate) children: Vec<NodeId>,
    pub rect: Rect,
    #[serde(default)]
    pub selected: bool,
    #[serde(skip)]
    pub dragging: bool,
}

impl RoomNode {
    pub(crate) fn new(room_type: impl Into<String>, rect: Rect) -> Self {
        Self {
            id: NodeId::generate(),
            room_type: room_type.into(),
            parents: Vec::new(),
            children: Vec::new(),
            rect,
            selected: false,
            dragging: false,
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn room_type(&self) -> &str {
        &self.room_type
    }

    pub fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn has_parent(&self, id: &NodeId) -> bool {
        self.parents.contains(id)
    }

    pub fn has_child(&self, id: &NodeId) -> bool {
        self.children.contains(id)
    }

    pub fn move_by(&mut self, delta: Vector2D) {
        self.rect.translate(delta);
    }

    pub(crate) fn remove_child(&mut self, id: &NodeId) -> bool {
        match self.children.iter().position(|c| c == id) {
            Some(pos) => {
                self.children.remove(pos);
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_parent(&mut self, id: &NodeId) -> bool {
        match self.parents.iter().position(|p| p == id) {
            Some(pos) => {
                self.parents.remove(pos);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_guid_shaped_and_unique() {
        let ids: HashSet<NodeId> = (0..500).map(|_| NodeId::generate()).collect();
        assert_eq!(ids.len(), 500);
        for id in &ids {
            let parts: Vec<&str> = id.as_str().split('-').collect();
            assert_eq!(parts.iter().map(|p| p.len()).collect::<Vec<_>>(), vec![8, 4, 4, 4, 12]);
            assert!(parts[2].starts_with('4'));
        }
    }

    #[test]
    fn test_remove_child_reports_absence() {
        let mut node = RoomNode::new("corridor", Rect::default());
        let other = NodeId::from("other");
        assert!(!node.remove_child(&other));
        node.children.push(other.clone());
        assert!(node.remove_child(&other));
        assert!(node.children().is_empty());
    }
}
