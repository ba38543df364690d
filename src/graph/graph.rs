// src/graph/graph.rs

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{RoomType, RoomTypeCatalog};
use crate::utils::{Point2D, Rect, Vector2D};

use super::node::{NodeId, RoomNode};

/// Version written into every saved graph file.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("failed to access graph file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed graph file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported graph format version {0}")]
    UnsupportedVersion(u32),
}

/// An in-progress drag-to-connect gesture: the node the line starts from and
/// where the cursor currently is.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingConnection {
    pub from: NodeId,
    pub cursor: Point2D,
}

#[derive(Serialize)]
struct GraphFileRef<'a> {
    format_version: u32,
    nodes: &'a [RoomNode],
}

#[derive(Deserialize)]
struct GraphFile {
    format_version: u32,
    #[serde(default)]
    nodes: Vec<RoomNode>,
}

/// The room-node graph: an ordered node list plus an id -> position index.
///
/// Edges live as parent/child id lists on both endpoints. Every method that
/// touches those lists updates both halves before returning.
#[derive(Debug, Clone)]
pub struct RoomGraph {
    catalog: Arc<RoomTypeCatalog>,
    max_child_corridors: usize,
    nodes: Vec<RoomNode>,
    index: HashMap<NodeId, usize>,
    pending: Option<PendingConnection>,
}

impl RoomGraph {
    /// Create an empty graph over the given catalog.
    pub fn new(catalog: Arc<RoomTypeCatalog>, max_child_corridors: usize) -> Self {
        Self {
            catalog,
            max_child_corridors,
            nodes: Vec::new(),
            index: HashMap::new(),
            pending: None,
        }
    }

    pub fn catalog(&self) -> &Arc<RoomTypeCatalog> {
        &self.catalog
    }

    pub fn max_child_corridors(&self) -> usize {
        self.max_child_corridors
    }

    pub fn nodes(&self) -> &[RoomNode] {
        &self.nodes
    }

    pub fn nodes_mut(&mut self) -> std::slice::IterMut<'_, RoomNode> {
        self.nodes.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // --- Storage & lookup ---

    /// Adds a node of the given type and returns its fresh id.
    pub fn add_node(&mut self, room_type: &str, rect: Rect) -> NodeId {
        let node = RoomNode::new(room_type, rect);
        let id = node.id.clone();
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(node);
        debug!("Added {} node {}", room_type, id);
        id
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&RoomNode> {
        self.index.get(id).and_then(|&pos| self.nodes.get(pos))
    }

    pub fn get_node_mut(&mut self, id: &NodeId) -> Option<&mut RoomNode> {
        match self.index.get(id) {
            Some(&pos) => self.nodes.get_mut(pos),
            None => None,
        }
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// The catalog entry of a node's type, if both exist.
    pub fn room_type_of(&self, id: &NodeId) -> Option<&RoomType> {
        self.get_node(id).and_then(|node| self.catalog.get(&node.room_type))
    }

    /// Rebuilds the id index from the node list. Idempotent.
    pub fn rebuild_index(&mut self) {
        self.index.clear();
        for (pos, node) in self.nodes.iter().enumerate() {
            self.index.insert(node.id.clone(), pos);
        }
    }

    /// Removes a node from the list and index. Neighbors are not touched; see
    /// [`RoomGraph::delete_nodes`] for the detaching variant.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<RoomNode> {
        let pos = self.index.remove(id)?;
        let node = self.nodes.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        if self.pending.as_ref().map_or(false, |p| &p.from == id) {
            self.pending = None;
        }
        Some(node)
    }

    // --- Edges ---

    /// Validates and adds the edge `source -> child`, writing both halves.
    pub fn add_edge(&mut self, source: &NodeId, child: &NodeId) -> bool {
        if let Err(rejection) = self.check_connection(source, child) {
            debug!("Rejected edge {} -> {}: {}", source, child, rejection);
            return false;
        }
        // check_connection has resolved both ids.
        let (Some(&source_pos), Some(&child_pos)) = (self.index.get(source), self.index.get(child))
        else {
            return false;
        };
        self.nodes[source_pos].children.push(child.clone());
        self.nodes[child_pos].parents.push(source.clone());
        true
    }

    /// Removes the edge `parent -> child`. Returns false if neither half exists.
    pub fn remove_edge(&mut self, parent: &NodeId, child: &NodeId) -> bool {
        let removed_child = self
            .get_node_mut(parent)
            .map_or(false, |node| node.remove_child(child));
        let removed_parent = self
            .get_node_mut(child)
            .map_or(false, |node| node.remove_parent(parent));
        removed_child || removed_parent
    }

    /// Removes every edge touching `id`, on both ends.
    fn detach(&mut self, id: &NodeId) {
        let (children, parents) = match self.get_node_mut(id) {
            Some(node) => (
                std::mem::take(&mut node.children),
                std::mem::take(&mut node.parents),
            ),
            None => return,
        };
        for child in &children {
            if let Some(node) = self.get_node_mut(child) {
                node.remove_parent(id);
            }
        }
        for parent in &parents {
            if let Some(node) = self.get_node_mut(parent) {
                node.remove_child(id);
            }
        }
    }

    // --- Deletion ---

    /// Deletes every node matching `predicate`. All matches are detached from
    /// their neighbors before any of them is removed. Returns the deleted ids.
    pub fn delete_nodes<F>(&mut self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&RoomNode) -> bool,
    {
        let doomed: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|node| predicate(node))
            .map(|node| node.id.clone())
            .collect();
        for id in &doomed {
            self.detach(id);
        }
        for id in &doomed {
            self.remove_node(id);
        }
        doomed
    }

    /// Deletes the selected nodes. Entrances are never deleted.
    pub fn delete_selected(&mut self) -> Vec<NodeId> {
        let catalog = Arc::clone(&self.catalog);
        self.delete_nodes(|node| {
            node.selected && !catalog.get(&node.room_type).map_or(false, |t| t.is_entrance)
        })
    }

    /// Removes every edge whose endpoints are both selected, then clears the
    /// selection. Returns how many edges were removed.
    pub fn delete_selected_links(&mut self) -> usize {
        let links: Vec<(NodeId, NodeId)> = self
            .nodes
            .iter()
            .filter(|node| node.selected)
            .flat_map(|node| {
                node.children
                    .iter()
                    .filter(|child| self.get_node(child).map_or(false, |c| c.selected))
                    .map(move |child| (node.id.clone(), child.clone()))
            })
            .collect();
        let mut removed = 0;
        for (parent, child) in &links {
            if self.remove_edge(parent, child) {
                removed += 1;
            }
        }
        self.clear_selection();
        removed
    }

    // --- Type reassignment ---

    /// Reassigns a node's room type. Only nodes without parents that are not
    /// entrances can change type. Crossing the corridor boundary, or gaining or
    /// losing the boss role, severs all of the node's child edges.
    pub fn set_node_type(&mut self, id: &NodeId, room_type: &str) -> bool {
        let Some(new_type) = self.catalog.get(room_type).cloned() else {
            return false;
        };
        let Some(node) = self.get_node(id) else {
            return false;
        };
        if !node.parents.is_empty() {
            return false;
        }
        let old_type = self.catalog.get(&node.room_type);
        if old_type.map_or(false, |t| t.is_entrance) {
            return false;
        }
        let sever = match old_type {
            Some(old) => {
                old.is_corridor != new_type.is_corridor || old.is_boss_room != new_type.is_boss_room
            }
            None => true,
        };
        if sever {
            let children = node.children.clone();
            for child in &children {
                self.remove_edge(id, child);
            }
            if !children.is_empty() {
                debug!("Type change on {} severed {} child edges", id, children.len());
            }
        }
        if let Some(node) = self.get_node_mut(id) {
            node.room_type = new_type.id;
        }
        true
    }

    // --- Selection & placement ---

    pub fn select_all(&mut self) {
        for node in &mut self.nodes {
            node.selected = true;
        }
    }

    pub fn clear_selection(&mut self) {
        for node in &mut self.nodes {
            node.selected = false;
        }
    }

    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|node| node.selected)
            .map(|node| node.id.clone())
            .collect()
    }

    pub fn move_node(&mut self, id: &NodeId, delta: Vector2D) -> bool {
        match self.get_node_mut(id) {
            Some(node) => {
                node.move_by(delta);
                true
            }
            None => false,
        }
    }

    // --- Pending connection ---

    pub fn pending_connection(&self) -> Option<&PendingConnection> {
        self.pending.as_ref()
    }

    pub fn begin_connection(&mut self, from: &NodeId, cursor: Point2D) -> bool {
        if !self.contains(from) {
            return false;
        }
        self.pending = Some(PendingConnection { from: from.clone(), cursor });
        true
    }

    pub fn drag_connection(&mut self, delta: Vector2D) {
        if let Some(pending) = &mut self.pending {
            pending.cursor = pending.cursor.offset(delta);
        }
    }

    /// Completes the gesture: tries `from -> target` when a target is given,
    /// and always clears the pending state.
    pub fn finish_connection(&mut self, target: Option<&NodeId>) -> bool {
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match target {
            Some(target) => self.add_edge(&pending.from, target),
            None => false,
        }
    }

    pub fn clear_connection(&mut self) {
        self.pending = None;
    }

    // --- Persistence ---

    pub fn serialize(&self) -> Result<Vec<u8>, GraphError> {
        let file = GraphFileRef {
            format_version: FORMAT_VERSION,
            nodes: &self.nodes,
        };
        Ok(serde_json::to_vec_pretty(&file)?)
    }

    /// Rebuilds a graph from [`RoomGraph::serialize`] output. The index is
    /// rebuilt and consistency problems are logged.
    pub fn deserialize(
        bytes: &[u8],
        catalog: Arc<RoomTypeCatalog>,
        max_child_corridors: usize,
    ) -> Result<Self, GraphError> {
        let file: GraphFile = serde_json::from_slice(bytes)?;
        if file.format_version != FORMAT_VERSION {
            return Err(GraphError::UnsupportedVersion(file.format_version));
        }
        let mut graph = Self::new(catalog, max_child_corridors);
        graph.nodes = file.nodes;
        graph.rebuild_index();
        for issue in graph.consistency_issues() {
            warn!("Loaded graph: {}", issue);
        }
        Ok(graph)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), GraphError> {
        let path = path.as_ref();
        let bytes = self.serialize()?;
        fs::write(path, bytes).map_err(|source| GraphError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved {} room nodes to {}", self.nodes.len(), path.display());
        Ok(())
    }

    pub fn load_from_path<P: AsRef<Path>>(
        path: P,
        catalog: Arc<RoomTypeCatalog>,
        max_child_corridors: usize,
    ) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| GraphError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let graph = Self::deserialize(&bytes, catalog, max_child_corridors)?;
        info!("Loaded {} room nodes from {}", graph.nodes.len(), path.display());
        Ok(graph)
    }

    /// Checksum over ids, types, edges and placement. Selection is ignored.
    pub fn checksum(&self) -> u32 {
        self.nodes
            .par_iter()
            .enumerate()
            .map(|(pos, node)| {
                let mut crc = pos as u32;
                checksum_node(&mut crc, node);
                crc
            })
            .reduce(|| 0, u32::wrapping_add)
    }
}

// --- Checksum helper functions ---

fn add_crc(crc: &mut u32, value: u32) {
    *crc = crc.rotate_left(5).wrapping_add(value);
}

fn add_crc_str(crc: &mut u32, value: &str) {
    for byte in value.as_bytes() {
        add_crc(crc, *byte as u32);
    }
}

fn checksum_node(crc: &mut u32, node: &RoomNode) {
    add_crc_str(crc, node.id.as_str());
    add_crc_str(crc, &node.room_type);
    for child in &node.children {
        add_crc_str(crc, child.as_str());
    }
    for parent in &node.parents {
        add_crc_str(crc, parent.as_str());
    }
    add_crc(crc, node.rect.min.x.to_bits());
    add_crc(crc, node.rect.min.y.to_bits());
    add_crc(crc, node.rect.width.to_bits());
    add_crc(crc, node.rect.height.to_bits());
}
