// src/editor/mod.rs

mod commands;
pub mod core;

pub use self::commands::{Command, CommandError, CommandType};
pub use self::core::Editor;
