// src/ui/menu.rs

use std::path::PathBuf;
use std::sync::Arc;
use eframe::egui::{self, Context};
use parking_lot::RwLock;
use crate::editor::{CommandType, Editor};

/// File actions that may discard the current graph, so the window decides when
/// they run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileAction {
    New,
    Open(PathBuf),
}

pub struct MenuBar {
    editor: Arc<RwLock<Editor>>,
    /// Path typed into the File menu, used by Open and Save As.
    path_input: String,
}

impl MenuBar {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        let path_input = editor
            .read()
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Self { editor, path_input }
    }

    pub fn update(&mut self, ctx: &Context) -> Option<FileAction> {
        let mut action = None;
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Path:");
                        ui.text_edit_singleline(&mut self.path_input);
                    });
                    ui.separator();
                    if ui.button("New").clicked() {
                        action = Some(FileAction::New);
                        ui.close_menu();
                    }
                    if ui.button("Open").clicked() {
                        action = typed_path(&self.path_input, &self.editor).map(FileAction::Open);
                        ui.close_menu();
                    }
                    if ui.button("Save").clicked() {
                        self.editor.write().save_wrapper(None);
                        ui.close_menu();
                    }
                    if ui.button("Save As").clicked() {
                        if let Some(path) = typed_path(&self.path_input, &self.editor) {
                            self.editor.write().save_wrapper(Some(&path));
                        }
                        ui.close_menu();
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let mut editor = self.editor.write();
                    if ui.button("Select All").clicked() {
                        editor.execute_command(CommandType::SelectAll);
                        ui.close_menu();
                    }
                    if ui.button("Delete Selected Links").clicked() {
                        editor.execute_command(CommandType::DeleteSelectedLinks);
                        ui.close_menu();
                    }
                    if ui.button("Delete Selected Nodes").clicked() {
                        editor.execute_command(CommandType::DeleteSelectedNodes);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    let mut editor = self.editor.write();
                    if ui.checkbox(&mut editor.show_side_panel, "Side Panel").clicked() {
                        ui.close_menu();
                    }
                });
            });
        });
        action
    }
}

fn typed_path(path_input: &str, editor: &RwLock<Editor>) -> Option<PathBuf> {
    let trimmed = path_input.trim();
    if trimmed.is_empty() {
        editor.write().error_message = Some("Type a file path first.".to_string());
        None
    } else {
        Some(PathBuf::from(trimmed))
    }
}
