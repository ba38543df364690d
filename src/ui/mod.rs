// src/ui/mod.rs
pub mod central_panel;
pub mod dialog;
pub mod main_window;
pub mod menu;
pub mod side_panel;
pub mod status_bar;

pub use dialog::DialogManager;
pub use main_window::DungeonEdApp;
