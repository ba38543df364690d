// src/ui/status_bar.rs

use std::sync::Arc;
use eframe::egui::{self, Color32, Context};
use parking_lot::RwLock;
use crate::editor::Editor;

pub struct StatusBar {
    editor: Arc<RwLock<Editor>>,
}

impl StatusBar {
    pub fn new(editor: Arc<RwLock<Editor>>) -> Self {
        Self { editor }
    }

    pub fn update(&mut self, ctx: &Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let editor = self.editor.read(); // Keep the read lock short.

            let file_label = match editor.path() {
                Some(path) => path.display().to_string(),
                None => "untitled".to_string(),
            };
            let dirty = if editor.has_unsaved_changes() { " *" } else { "" };

            ui.horizontal(|ui| {
                match &editor.error_message {
                    Some(err) => ui.colored_label(Color32::LIGHT_RED, err),
                    None => ui.label(&editor.status_message),
                };
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{}{}", file_label, dirty));
                    ui.label(format!("Nodes: {}", editor.graph().len()));
                });
            });
        });
    }
}
