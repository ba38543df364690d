// src/ui/side_panel.rs

use std::sync::Arc;
use eframe::egui::{self, Color32, Context, Ui};
use parking_lot::RwLock;

use crate::editor::{CommandType, Editor};

/// Manages the left-side panel: the room type catalog, the selected node's
/// properties and the graph diagnostics.
pub struct SidePanel {
    editor: Arc<RwLock<Editor>>,
}

impl SidePanel {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        Self { editor }
    }

    /// Called each frame, updates the side panel UI if it's visible.
    pub fn update(&mut self, ctx: &Context) {
        if !self.editor.read().show_side_panel {
            return;
        }

        egui::SidePanel::left("graph_panel")
            .default_width(250.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.show_properties(ui);
                    ui.separator();
                    self.show_catalog(ui);
                    ui.separator();
                    self.show_diagnostics(ui);
                });
            });
    }

    fn show_catalog(&self, ui: &mut Ui) {
        ui.heading("Room Types");
        let editor = self.editor.read();
        for room_type in editor.catalog().iter() {
            let mut roles = Vec::new();
            if room_type.is_entrance {
                roles.push("entrance");
            }
            if room_type.is_boss_room {
                roles.push("boss");
            }
            if room_type.is_corridor {
                roles.push("corridor");
            }
            if room_type.is_none {
                roles.push("unassigned");
            }
            if !room_type.displayable_in_editor {
                roles.push("hidden");
            }
            if roles.is_empty() {
                ui.label(&room_type.name);
            } else {
                ui.label(format!("{} ({})", room_type.name, roles.join(", ")));
            }
        }
    }

    /// Shows the first selected node, with a type picker while its type may change.
    fn show_properties(&self, ui: &mut Ui) {
        ui.heading("Properties");

        let (id, details, choices, current) = {
            let editor = self.editor.read();
            let graph = editor.graph();
            let Some(node) = graph.nodes().iter().find(|n| n.selected) else {
                ui.label("Nothing selected.");
                return;
            };
            let details = format!(
                "Node {}\nParents: {}\nChildren: {}",
                node.id(),
                node.parents().len(),
                node.children().len()
            );
            let current = graph
                .room_type_of(node.id())
                .map_or_else(|| node.room_type().to_string(), |t| t.name.clone());
            let choices: Option<Vec<(String, String)>> = editor.type_choices(node.id()).map(|types| {
                types
                    .into_iter()
                    .map(|t| (t.id.clone(), t.name.clone()))
                    .collect()
            });
            (node.id().clone(), details, choices, current)
        };

        ui.label(details);
        let Some(choices) = choices else {
            ui.label(format!("Type: {}", current));
            return;
        };

        let mut chosen = None;
        egui::ComboBox::from_label("Type")
            .selected_text(current.as_str())
            .show_ui(ui, |ui| {
                for (type_id, name) in &choices {
                    if ui.selectable_label(*name == current, name).clicked() {
                        chosen = Some(type_id.clone());
                    }
                }
            });
        if let Some(room_type) = chosen {
            self.editor
                .write()
                .execute_command(CommandType::SetNodeType { node: id, room_type });
        }
    }

    fn show_diagnostics(&self, ui: &mut Ui) {
        ui.heading("Diagnostics");
        let editor = self.editor.read();
        let graph = editor.graph();
        ui.label(format!("Nodes: {}", graph.len()));
        ui.label(format!("Islands: {}", graph.island_count()));
        ui.label(format!(
            "Unreachable from entrance: {}",
            graph.unreachable_from_entrance().len()
        ));
        for issue in graph.consistency_issues() {
            ui.colored_label(Color32::LIGHT_RED, issue.to_string());
        }
        if let Some(cycle) = graph.find_cycle() {
            let path: Vec<String> = cycle.iter().map(|id| id.to_string()).collect();
            ui.colored_label(Color32::LIGHT_RED, format!("Cycle: {}", path.join(" -> ")));
        }
    }
}
