// src/ui/dialog.rs

use eframe::egui::{self, Context};

use crate::ui::menu::FileAction;

/// The possible outcomes when the unsaved-changes dialog is closed.
#[derive(Debug, PartialEq, Eq)]
pub enum DialogResult {
    Save,
    DontSave,
    Cancel,
}

/// Holds the file action waiting on the unsaved-changes dialog, if any.
#[derive(Default)]
pub struct DialogManager {
    deferred: Option<FileAction>,
    result: Option<DialogResult>,
}

impl DialogManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask whether to save before `action` replaces the current graph.
    pub fn ask_save_changes(&mut self, action: FileAction) {
        self.deferred = Some(action);
        self.result = None;
    }

    /// Call this method on every UI frame. Once the user answers, returns the
    /// answer together with the deferred action and closes the dialog.
    pub fn update(&mut self, ctx: &Context) -> Option<(DialogResult, FileAction)> {
        let action = self.deferred.as_ref()?;
        let message = match action {
            FileAction::New => "The graph has unsaved changes. Save them before starting a new one?".to_string(),
            FileAction::Open(path) => format!(
                "The graph has unsaved changes. Save them before opening {}?",
                path.display()
            ),
        };

        egui::Window::new("Unsaved Changes")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        self.result = Some(DialogResult::Save);
                    }
                    if ui.button("Don't Save").clicked() {
                        self.result = Some(DialogResult::DontSave);
                    }
                    if ui.button("Cancel").clicked() {
                        self.result = Some(DialogResult::Cancel);
                    }
                });
            });

        let result = self.result.take()?;
        let action = self.deferred.take()?;
        Some((result, action))
    }
}
