// src/editor/core.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, error, warn};

use crate::catalog::{RoomType, RoomTypeCatalog};
use crate::config::Settings;
use crate::editor::commands::{Command, CommandType};
use crate::graph::{GraphError, NodeId, RoomGraph};
use crate::utils::Point2D;

/// The editor session: the graph being edited, where it lives on disk, and the
/// messages shown to the user.
pub struct Editor {
    graph: RoomGraph,
    settings: Settings,

    /// File the graph was loaded from or last saved to.
    path: Option<PathBuf>,
    /// Graph checksum at the last save/load.
    saved_checksum: u32,

    /// Messages or status for UI.
    pub status_message: String,
    pub error_message: Option<String>,

    pub show_side_panel: bool,
}

impl Editor {
    /// Create an editor with an empty graph over `catalog`.
    pub fn new(catalog: Arc<RoomTypeCatalog>, settings: Settings) -> Self {
        let graph = RoomGraph::new(catalog, settings.max_child_corridors);
        let saved_checksum = graph.checksum();
        Self {
            graph,
            settings,
            path: None,
            saved_checksum,
            status_message: String::new(),
            error_message: None,
            show_side_panel: true,
        }
    }

    pub fn graph(&self) -> &RoomGraph {
        &self.graph
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &Arc<RoomTypeCatalog> {
        self.graph.catalog()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Execute a command, recording the outcome in the status or error message.
    /// Returns whether it succeeded.
    pub fn execute_command(&mut self, mut command: CommandType) -> bool {
        match command.execute(&mut self.graph, &self.settings) {
            Ok(()) => {
                // Selection and drag updates arrive every frame and must not hide errors.
                if command.modifies_graph() {
                    self.error_message = None;
                }
                true
            }
            Err(err) => {
                debug!("Command failed: {}", err);
                self.error_message = Some(err.to_string());
                false
            }
        }
    }

    /// The top-most node whose rectangle contains `point`.
    pub fn node_at(&self, point: Point2D) -> Option<NodeId> {
        self.graph
            .nodes()
            .iter()
            .rev()
            .find(|node| node.rect.contains(point))
            .map(|node| node.id().clone())
    }

    /// Types offered in the type picker of `id`, or `None` when the node's type is
    /// fixed (it has a parent or is an entrance).
    pub fn type_choices(&self, id: &NodeId) -> Option<Vec<&RoomType>> {
        let node = self.graph.get_node(id)?;
        let is_entrance = self.graph.room_type_of(id).map_or(false, |t| t.is_entrance);
        if !node.parents().is_empty() || is_entrance {
            return None;
        }
        Some(self.catalog().displayable().collect())
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.graph.checksum() != self.saved_checksum
    }

    // ----------------- Document Management  -----------------

    /// Start over with an empty graph.
    pub fn new_document(&mut self) {
        let catalog = Arc::clone(self.graph.catalog());
        self.graph = RoomGraph::new(catalog, self.settings.max_child_corridors);
        self.saved_checksum = self.graph.checksum();
        self.path = None;
        self.status_message = "Created new graph.".to_string();
        self.error_message = None;
    }

    pub fn open(&mut self, path: &Path) -> Result<(), GraphError> {
        let catalog = Arc::clone(self.graph.catalog());
        let graph = RoomGraph::load_from_path(path, catalog, self.settings.max_child_corridors)?;
        let islands = graph.island_count();
        if islands > 1 {
            warn!("{} has {} disconnected islands", path.display(), islands);
        }
        self.saved_checksum = graph.checksum();
        self.graph = graph;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    pub fn save_as(&mut self, path: &Path) -> Result<(), GraphError> {
        self.graph.save_to_path(path)?;
        self.saved_checksum = self.graph.checksum();
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Save to the current path. Returns `Ok(false)` when there is none yet.
    pub fn save(&mut self) -> Result<bool, GraphError> {
        match self.path.clone() {
            Some(path) => self.save_as(&path).map(|_| true),
            None => Ok(false),
        }
    }

    /// Opens `path`, reporting the outcome in the status bar.
    pub fn open_wrapper(&mut self, path: &Path) {
        match self.open(path) {
            Ok(()) => {
                self.status_message = format!("Loaded {}", path.display());
                self.error_message = None;
            }
            Err(e) => {
                error!("Failed to open {}: {}", path.display(), e);
                self.error_message = Some(format!("Failed to open: {}", e));
            }
        }
    }

    /// Saves to `path`, or the current path when `None`, reporting the outcome.
    pub fn save_wrapper(&mut self, path: Option<&Path>) {
        let result = match path {
            Some(path) => self.save_as(path).map(|_| true),
            None => self.save(),
        };
        match result {
            Ok(true) => {
                self.status_message = "Graph saved.".to_string();
                self.error_message = None;
            }
            Ok(false) => {
                self.error_message = Some("Choose a file name first (File > Save As).".to_string());
            }
            Err(e) => {
                error!("Failed to save graph: {}", e);
                self.error_message = Some(format!("Failed to save: {}", e));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_support::catalog;
    use crate::utils::Vector2D;
    use std::env;
    use std::fs;

    fn editor() -> Editor {
        Editor::new(catalog(), Settings::default())
    }

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(format!("dungeon_ed_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn test_node_at_prefers_top_most() {
        let mut ed = editor();
        assert!(ed.execute_command(CommandType::CreateNode {
            position: Point2D::new(200.0, 200.0),
            created: Vec::new(),
        }));
        let top = ed.graph().nodes()[1].id().clone();
        assert_eq!(ed.node_at(Point2D::new(210.0, 210.0)), Some(top));
        assert_eq!(ed.node_at(Point2D::new(5.0, 5.0)), None);
    }

    #[test]
    fn test_failed_command_sets_error_message() {
        let mut ed = editor();
        assert!(!ed.execute_command(CommandType::ToggleSelected { node: NodeId::from("gone") }));
        assert!(ed.error_message.is_some());
        assert!(ed.execute_command(CommandType::SelectAll));
        assert!(ed.error_message.is_some());
        assert!(ed.execute_command(CommandType::DeleteSelectedLinks));
        assert!(ed.error_message.is_none());
    }

    #[test]
    fn test_type_choices_only_for_unparented_non_entrances() {
        let mut ed = editor();
        ed.execute_command(CommandType::CreateNode { position: Point2D::ZERO, created: Vec::new() });
        let entrance = ed.graph().nodes()[0].id().clone();
        let fresh = ed.graph().nodes()[1].id().clone();
        assert!(ed.type_choices(&entrance).is_none());
        let choices = ed.type_choices(&fresh).unwrap();
        assert_eq!(choices.len(), ed.catalog().displayable().count());
    }

    #[test]
    fn test_dirty_tracking_through_save_and_open() {
        let mut ed = editor();
        assert!(!ed.has_unsaved_changes());
        ed.execute_command(CommandType::CreateNode { position: Point2D::ZERO, created: Vec::new() });
        assert!(ed.has_unsaved_changes());
        assert_eq!(ed.save().unwrap(), false);

        let path = temp_path("dirty");
        ed.save_as(&path).unwrap();
        assert!(!ed.has_unsaved_changes());

        let moved = ed.graph().nodes()[1].id().clone();
        ed.execute_command(CommandType::MoveNode { node: moved, delta: Vector2D::new(3.0, 3.0) });
        assert!(ed.has_unsaved_changes());

        let mut other = editor();
        other.open(&path).unwrap();
        assert_eq!(other.graph().len(), 2);
        assert!(!other.has_unsaved_changes());
        assert_eq!(other.path(), Some(path.as_path()));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_open_missing_file_keeps_current_graph() {
        let mut ed = editor();
        ed.execute_command(CommandType::CreateNode { position: Point2D::ZERO, created: Vec::new() });
        ed.open_wrapper(Path::new("/no/such/graph.json"));
        assert!(ed.error_message.is_some());
        assert_eq!(ed.graph().len(), 2);
    }
}
