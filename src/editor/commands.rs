// src/editor/commands.rs

use log::debug;
use thiserror::Error;

use crate::config::Settings;
use crate::graph::{ConnectionRejection, NodeId, RoomGraph};
use crate::utils::{Point2D, Rect, Vector2D};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    #[error("connection refused: {0}")]
    Rejected(#[from] ConnectionRejection),
    #[error("room type of node {node} cannot be changed to '{room_type}'")]
    TypeChangeRefused { node: NodeId, room_type: String },
    #[error("no edge {parent} -> {child}")]
    NoSuchEdge { parent: NodeId, child: NodeId },
    #[error("the catalog has no {0} room type")]
    MissingRoomType(&'static str),
    #[error("no connection is being dragged")]
    NoPendingConnection,
}

pub trait Command {
    fn execute(&mut self, graph: &mut RoomGraph, settings: &Settings) -> Result<(), CommandError>;

    /// Whether the command changes anything that is saved to disk.
    fn modifies_graph(&self) -> bool {
        true
    }
}

/// Every gesture a presentation layer can send to the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandType {
    /// Creates an unassigned node at `position`. An empty graph first gets its
    /// entrance. Filled with the new ids on success.
    CreateNode {
        position: Point2D,
        created: Vec<NodeId>,
    },
    SetNodeType {
        node: NodeId,
        room_type: String,
    },
    MoveNode {
        node: NodeId,
        delta: Vector2D,
    },
    /// Clears every node's dragging flag.
    EndDrag,
    ToggleSelected {
        node: NodeId,
    },
    SelectAll,
    ClearSelection,
    Connect {
        source: NodeId,
        target: NodeId,
    },
    RemoveEdge {
        parent: NodeId,
        child: NodeId,
    },
    BeginConnection {
        from: NodeId,
        cursor: Point2D,
    },
    DragConnection {
        delta: Vector2D,
    },
    /// Ends the drag, connecting to `target` if there is one.
    FinishConnection {
        target: Option<NodeId>,
    },
    CancelConnection,
    DeleteSelectedLinks,
    DeleteSelectedNodes,

    // Batch Operations
    BatchCommand { commands: Vec<CommandType> },
}

impl Command for CommandType {
    fn execute(&mut self, graph: &mut RoomGraph, settings: &Settings) -> Result<(), CommandError> {
        debug!("Executing {:?}", self);
        match self {
            CommandType::BatchCommand { ref mut commands } => {
                for command in commands {
                    command.execute(graph, settings)?;
                }
                Ok(())
            }
            CommandType::CreateNode { position, ref mut created } => {
                let catalog = graph.catalog().clone();
                created.clear();
                // Resolve both types up front so a failure leaves the graph untouched.
                let none = catalog.none().ok_or(CommandError::MissingRoomType("none"))?;
                if graph.is_empty() {
                    let entrance = catalog
                        .entrance()
                        .ok_or(CommandError::MissingRoomType("entrance"))?;
                    let rect = node_rect(settings.entrance_position, settings);
                    created.push(graph.add_node(&entrance.id, rect));
                }
                created.push(graph.add_node(&none.id, node_rect(*position, settings)));
                Ok(())
            }
            CommandType::SetNodeType { node, room_type } => {
                if graph.set_node_type(node, room_type) {
                    Ok(())
                } else {
                    Err(CommandError::TypeChangeRefused {
                        node: node.clone(),
                        room_type: room_type.clone(),
                    })
                }
            }
            CommandType::MoveNode { node, delta } => {
                let node_ref = graph
                    .get_node_mut(node)
                    .ok_or_else(|| CommandError::UnknownNode(node.clone()))?;
                node_ref.dragging = true;
                node_ref.move_by(*delta);
                Ok(())
            }
            CommandType::EndDrag => {
                for node in graph.nodes_mut() {
                    node.dragging = false;
                }
                Ok(())
            }
            CommandType::ToggleSelected { node } => {
                let node_ref = graph
                    .get_node_mut(node)
                    .ok_or_else(|| CommandError::UnknownNode(node.clone()))?;
                node_ref.selected = !node_ref.selected;
                Ok(())
            }
            CommandType::SelectAll => {
                graph.select_all();
                Ok(())
            }
            CommandType::ClearSelection => {
                graph.clear_selection();
                Ok(())
            }
            CommandType::Connect { source, target } => {
                graph.check_connection(source, target)?;
                graph.add_edge(source, target);
                Ok(())
            }
            CommandType::RemoveEdge { parent, child } => {
                if graph.remove_edge(parent, child) {
                    Ok(())
                } else {
                    Err(CommandError::NoSuchEdge {
                        parent: parent.clone(),
                        child: child.clone(),
                    })
                }
            }
            CommandType::BeginConnection { from, cursor } => {
                if graph.begin_connection(from, *cursor) {
                    Ok(())
                } else {
                    Err(CommandError::UnknownNode(from.clone()))
                }
            }
            CommandType::DragConnection { delta } => {
                graph.drag_connection(*delta);
                Ok(())
            }
            CommandType::FinishConnection { target } => {
                let pending = graph
                    .pending_connection()
                    .cloned()
                    .ok_or(CommandError::NoPendingConnection)?;
                let Some(target) = target else {
                    graph.clear_connection();
                    return Ok(());
                };
                let checked = graph.check_connection(&pending.from, target);
                graph.finish_connection(Some(&*target));
                checked.map_err(CommandError::from)
            }
            CommandType::CancelConnection => {
                graph.clear_connection();
                Ok(())
            }
            CommandType::DeleteSelectedLinks => {
                graph.delete_selected_links();
                Ok(())
            }
            CommandType::DeleteSelectedNodes => {
                graph.delete_selected();
                Ok(())
            }
        }
    }

    fn modifies_graph(&self) -> bool {
        match self {
            CommandType::EndDrag
            | CommandType::ToggleSelected { .. }
            | CommandType::SelectAll
            | CommandType::ClearSelection
            | CommandType::BeginConnection { .. }
            | CommandType::DragConnection { .. }
            | CommandType::CancelConnection => false,
            CommandType::BatchCommand { commands } => commands.iter().any(|c| c.modifies_graph()),
            _ => true,
        }
    }
}

fn node_rect(position: Point2D, settings: &Settings) -> Rect {
    Rect::new(position, settings.node_width, settings.node_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RoomType, RoomTypeCatalog};
    use crate::graph::test_support::{catalog, rect};
    use assert_approx_eq::assert_approx_eq;
    use std::sync::Arc;

    fn setup() -> (RoomGraph, Settings) {
        let settings = Settings { max_child_corridors: 1, ..Settings::default() };
        (RoomGraph::new(catalog(), settings.max_child_corridors), settings)
    }

    #[test]
    fn test_first_create_adds_entrance() {
        let (mut graph, settings) = setup();
        let mut cmd = CommandType::CreateNode { position: Point2D::new(400.0, 300.0), created: Vec::new() };
        cmd.execute(&mut graph, &settings).unwrap();
        let CommandType::CreateNode { created, .. } = &cmd else { unreachable!() };
        assert_eq!(created.len(), 2);
        assert_eq!(graph.get_node(&created[0]).unwrap().room_type(), "entrance");
        assert_approx_eq!(graph.get_node(&created[0]).unwrap().rect.min.x, 200.0);
        let second = graph.get_node(&created[1]).unwrap();
        assert_eq!(second.room_type(), "none");
        assert_approx_eq!(second.rect.min.x, 400.0);
        assert_approx_eq!(second.rect.width, settings.node_width);

        let mut again = CommandType::CreateNode { position: Point2D::ZERO, created: Vec::new() };
        again.execute(&mut graph, &settings).unwrap();
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_create_without_none_type_changes_nothing() {
        let settings = Settings::default();
        let catalog = Arc::new(RoomTypeCatalog::new(vec![
            RoomType::entrance("entrance", "Entrance"),
            RoomType::corridor("corridor", "Corridor"),
        ]));
        let mut graph = RoomGraph::new(catalog, settings.max_child_corridors);
        let mut cmd = CommandType::CreateNode { position: Point2D::ZERO, created: Vec::new() };
        let err = cmd.execute(&mut graph, &settings).unwrap_err();
        assert_eq!(err, CommandError::MissingRoomType("none"));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_connect_reports_rejection() {
        let (mut graph, settings) = setup();
        let e = graph.add_node("entrance", rect(0.0, 0.0));
        let s = graph.add_node("small_room", rect(0.0, 100.0));
        let err = CommandType::Connect { source: e, target: s }
            .execute(&mut graph, &settings)
            .unwrap_err();
        assert_eq!(err, CommandError::Rejected(ConnectionRejection::RoomToRoom));
    }

    #[test]
    fn test_drag_to_connect_gesture() {
        let (mut graph, settings) = setup();
        let e = graph.add_node("entrance", rect(0.0, 0.0));
        let c = graph.add_node("corridor", rect(0.0, 100.0));
        let mut batch = CommandType::BatchCommand {
            commands: vec![
                CommandType::BeginConnection { from: e.clone(), cursor: Point2D::new(80.0, 37.5) },
                CommandType::DragConnection { delta: Vector2D::new(0.0, 100.0) },
                CommandType::FinishConnection { target: Some(c.clone()) },
            ],
        };
        batch.execute(&mut graph, &settings).unwrap();
        assert!(graph.get_node(&e).unwrap().has_child(&c));
        assert!(graph.pending_connection().is_none());
        assert!(batch.modifies_graph());
    }

    #[test]
    fn test_rejected_finish_still_clears_pending() {
        let (mut graph, settings) = setup();
        let e = graph.add_node("entrance", rect(0.0, 0.0));
        let s = graph.add_node("small_room", rect(0.0, 100.0));
        CommandType::BeginConnection { from: e, cursor: Point2D::ZERO }
            .execute(&mut graph, &settings)
            .unwrap();
        let result = CommandType::FinishConnection { target: Some(s) }.execute(&mut graph, &settings);
        assert!(matches!(result, Err(CommandError::Rejected(_))));
        assert!(graph.pending_connection().is_none());
    }

    #[test]
    fn test_move_and_select() {
        let (mut graph, settings) = setup();
        let s = graph.add_node("small_room", rect(0.0, 0.0));
        CommandType::MoveNode { node: s.clone(), delta: Vector2D::new(12.0, -4.0) }
            .execute(&mut graph, &settings)
            .unwrap();
        assert!(graph.get_node(&s).unwrap().dragging);
        CommandType::EndDrag.execute(&mut graph, &settings).unwrap();
        let node = graph.get_node(&s).unwrap();
        assert!(!node.dragging);
        assert_approx_eq!(node.rect.min.x, 12.0);
        assert_approx_eq!(node.rect.min.y, -4.0);

        let mut toggle = CommandType::ToggleSelected { node: s.clone() };
        toggle.execute(&mut graph, &settings).unwrap();
        assert!(graph.get_node(&s).unwrap().selected);
        assert!(!toggle.modifies_graph());

        let missing = CommandType::ToggleSelected { node: NodeId::from("gone") }.execute(&mut graph, &settings);
        assert_eq!(missing, Err(CommandError::UnknownNode(NodeId::from("gone"))));
    }

    #[test]
    fn test_delete_selected_nodes_scenario() {
        let (mut graph, settings) = setup();
        let c = graph.add_node("corridor", rect(0.0, 0.0));
        let s = graph.add_node("small_room", rect(0.0, 100.0));
        assert!(graph.add_edge(&c, &s));
        graph.get_node_mut(&s).unwrap().selected = true;
        CommandType::DeleteSelectedNodes.execute(&mut graph, &settings).unwrap();
        assert!(graph.get_node(&c).unwrap().children().is_empty());
        assert!(graph.get_node(&s).is_none());
        assert!(!graph.nodes().iter().any(|n| n.id() == &s));
    }
}
