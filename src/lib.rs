// src/lib.rs

pub mod catalog;
pub mod config;
pub mod editor;
pub mod graph;
#[cfg(feature = "gui")]
pub mod ui;
pub mod utils;
