//! # Main Window Module
//!
//! Composes the editor panels into an eframe application and routes the file
//! actions that could discard unsaved work through the unsaved-changes dialog.

use std::sync::Arc;

use eframe::egui;
use log::info;
use parking_lot::RwLock;

use crate::editor::Editor;
use crate::ui::central_panel::CentralPanel;
use crate::ui::dialog::{DialogManager, DialogResult};
use crate::ui::menu::{FileAction, MenuBar};
use crate::ui::side_panel::SidePanel;
use crate::ui::status_bar::StatusBar;

pub struct DungeonEdApp {
    editor: Arc<RwLock<Editor>>,
    menu_bar: MenuBar,
    side_panel: SidePanel,
    central_panel: CentralPanel,
    status_bar: StatusBar,
    dialogs: DialogManager,
}

impl DungeonEdApp {
    pub fn new(editor: Editor) -> Self {
        let editor = Arc::new(RwLock::new(editor));
        Self {
            menu_bar: MenuBar::new(Arc::clone(&editor)),
            side_panel: SidePanel::new(Arc::clone(&editor)),
            central_panel: CentralPanel::new(Arc::clone(&editor)),
            status_bar: StatusBar::new(Arc::clone(&editor)),
            dialogs: DialogManager::new(),
            editor,
        }
    }

    /// Runs `action` now, or asks first when there are unsaved changes.
    fn request(&mut self, action: FileAction) {
        if self.editor.read().has_unsaved_changes() {
            self.dialogs.ask_save_changes(action);
        } else {
            self.perform(action);
        }
    }

    fn perform(&mut self, action: FileAction) {
        let mut editor = self.editor.write();
        match action {
            FileAction::New => editor.new_document(),
            FileAction::Open(path) => editor.open_wrapper(&path),
        }
    }
}

impl eframe::App for DungeonEdApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(action) = self.menu_bar.update(ctx) {
            self.request(action);
        }
        self.side_panel.update(ctx);
        self.status_bar.update(ctx);
        self.central_panel.update(ctx);

        if let Some((result, action)) = self.dialogs.update(ctx) {
            match result {
                DialogResult::Save => {
                    let saved = {
                        let mut editor = self.editor.write();
                        editor.save_wrapper(None);
                        !editor.has_unsaved_changes()
                    };
                    if saved {
                        self.perform(action);
                    }
                }
                DialogResult::DontSave => self.perform(action),
                DialogResult::Cancel => info!("Kept the current graph"),
            }
        }
    }
}

/// Runs the editor as a native egui application.
pub fn run(editor: Editor) {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Dungeon Room Graph Editor",
        native_options,
        Box::new(move |_cc| Box::new(DungeonEdApp::new(editor))),
    );
}
