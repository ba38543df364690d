// src/catalog/catalog.rs

use std::fs;
use std::path::Path;

use include_dir::{include_dir, Dir};
use log::{info, warn};
use thiserror::Error;

use super::room_type::RoomType;
use super::validate::{validate, CatalogIssue};

static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// File name of the catalog embedded in the binary.
pub const BUILTIN_CATALOG: &str = "room_node_types.json";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("embedded asset {0} is missing or not UTF-8")]
    MissingAsset(&'static str),
}

/// The ordered, read-only list of room types available to a graph.
///
/// Loaded once at startup and shared by reference (usually behind an `Arc`) with
/// every graph and panel that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomTypeCatalog {
    types: Vec<RoomType>,
}

impl RoomTypeCatalog {
    pub fn new(types: Vec<RoomType>) -> Self {
        Self { types }
    }

    /// Parses a JSON array of room types. Problems found by [`validate`] are
    /// logged, not returned.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let types: Vec<RoomType> = serde_json::from_str(json)?;
        let catalog = Self::new(types);
        catalog.log_issues();
        Ok(catalog)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Loading room type catalog from {}", path.display());
        Self::from_json_str(&json)
    }

    /// The catalog shipped with the editor.
    pub fn builtin() -> Result<Self, CatalogError> {
        let json = ASSETS
            .get_file(BUILTIN_CATALOG)
            .and_then(|file| file.contents_utf8())
            .ok_or(CatalogError::MissingAsset(BUILTIN_CATALOG))?;
        Self::from_json_str(json)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoomType> {
        self.types.iter()
    }

    pub fn get(&self, id: &str) -> Option<&RoomType> {
        self.types.iter().find(|t| t.id == id)
    }

    pub fn get_index(&self, index: usize) -> Option<&RoomType> {
        self.types.get(index)
    }

    /// Position of the type with the given id in catalog order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.types.iter().position(|t| t.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&RoomType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// The first entrance type.
    pub fn entrance(&self) -> Option<&RoomType> {
        self.types.iter().find(|t| t.is_entrance)
    }

    /// The first none/unassigned type.
    pub fn none(&self) -> Option<&RoomType> {
        self.types.iter().find(|t| t.is_none)
    }

    /// Types offered in the editor's type picker, in catalog order.
    pub fn displayable(&self) -> impl Iterator<Item = &RoomType> {
        self.types.iter().filter(|t| t.displayable_in_editor)
    }

    pub fn validate(&self) -> Vec<CatalogIssue> {
        validate(&self.types)
    }

    fn log_issues(&self) {
        for issue in self.validate() {
            warn!("Room type catalog: {}", issue);
        }
    }
}
