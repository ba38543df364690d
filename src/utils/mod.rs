// src/utils/mod.rs
pub mod geometry;

pub use geometry::{Point2D, Rect, Vector2D};
