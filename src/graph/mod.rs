// src/graph/mod.rs
mod diagnostics;
mod graph;
mod node;
mod rules;

pub use self::diagnostics::GraphIssue;
pub use self::graph::{GraphError, PendingConnection, RoomGraph, FORMAT_VERSION};
pub use self::node::{NodeId, RoomNode};
pub use self::rules::ConnectionRejection;
