//! # Dungeon Room Graph Editor
//!
//! Loads the settings and the room type catalog, optionally opens the graph file
//! named on the command line, and starts the egui editor. Built without the `gui`
//! feature (or with `headless`), it only reports on the graph file instead.
//!
//! Usage: `dungeon_ed [GRAPH_FILE]`

use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use log::{info, warn};

use dungeon_ed::catalog::RoomTypeCatalog;
use dungeon_ed::config::Settings;
use dungeon_ed::editor::Editor;

fn load_catalog(settings: &Settings) -> Result<RoomTypeCatalog, Box<dyn Error>> {
    let catalog = match &settings.catalog_path {
        Some(path) => RoomTypeCatalog::load_file(path)?,
        None => RoomTypeCatalog::builtin()?,
    };
    info!("Room type catalog has {} types", catalog.len());
    Ok(catalog)
}

/// Logs what is known about the opened graph.
fn report(editor: &Editor) {
    let graph = editor.graph();
    info!("{} nodes in {} islands", graph.len(), graph.island_count());
    for id in graph.unreachable_from_entrance() {
        warn!("Node {} cannot be reached from an entrance", id);
    }
    for issue in graph.consistency_issues() {
        warn!("{}", issue);
    }
    if let Some(cycle) = graph.find_cycle() {
        warn!("Graph contains a cycle of {} edges", cycle.len().saturating_sub(1));
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging.
    env_logger::init();
    info!("dungeon_ed starting...");

    let settings = Settings::from_env()?;
    let catalog = Arc::new(load_catalog(&settings)?);
    let mut editor = Editor::new(catalog, settings);

    if let Some(path) = env::args_os().nth(1).map(PathBuf::from) {
        editor.open_wrapper(&path);
    }
    report(&editor);

    #[cfg(all(feature = "gui", not(feature = "headless")))]
    dungeon_ed::ui::main_window::run(editor);

    info!("dungeon_ed exiting.");
    Ok(())
}
