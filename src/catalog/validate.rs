// src/catalog/validate.rs
//! Author-time checks for a room type catalog.
//!
//! [`validate`] returns every problem it finds. An empty list means the catalog is
//! well formed. The graph never enforces any of this; callers log the issues.

use std::collections::HashSet;
use std::fmt;

use super::room_type::RoomType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    Empty,
    EmptyId { index: usize },
    EmptyName { index: usize },
    DuplicateId { id: String },
    DuplicateName { name: String },
    MissingEntrance,
    MultipleEntrances { count: usize },
    MissingNone,
    MultipleNone { count: usize },
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::Empty => write!(f, "catalog has no room types"),
            CatalogIssue::EmptyId { index } => write!(f, "room type #{} has an empty id", index),
            CatalogIssue::EmptyName { index } => write!(f, "room type #{} has an empty name", index),
            CatalogIssue::DuplicateId { id } => write!(f, "room type id '{}' is used more than once", id),
            CatalogIssue::DuplicateName { name } => {
                write!(f, "room type name '{}' is used more than once", name)
            }
            CatalogIssue::MissingEntrance => write!(f, "no room type is flagged as the entrance"),
            CatalogIssue::MultipleEntrances { count } => {
                write!(f, "{} room types are flagged as the entrance, expected one", count)
            }
            CatalogIssue::MissingNone => write!(f, "no room type is flagged as none (unassigned)"),
            CatalogIssue::MultipleNone { count } => {
                write!(f, "{} room types are flagged as none, expected one", count)
            }
        }
    }
}

pub fn validate(types: &[RoomType]) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    if types.is_empty() {
        issues.push(CatalogIssue::Empty);
        return issues;
    }

    let mut ids = HashSet::new();
    let mut names = HashSet::new();
    for (index, room_type) in types.iter().enumerate() {
        if room_type.id.trim().is_empty() {
            issues.push(CatalogIssue::EmptyId { index });
        } else if !ids.insert(room_type.id.as_str()) {
            issues.push(CatalogIssue::DuplicateId { id: room_type.id.clone() });
        }
        if room_type.name.trim().is_empty() {
            issues.push(CatalogIssue::EmptyName { index });
        } else if !names.insert(room_type.name.as_str()) {
            issues.push(CatalogIssue::DuplicateName { name: room_type.name.clone() });
        }
    }

    match types.iter().filter(|t| t.is_entrance).count() {
        0 => issues.push(CatalogIssue::MissingEntrance),
        1 => {}
        count => issues.push(CatalogIssue::MultipleEntrances { count }),
    }
    match types.iter().filter(|t| t.is_none).count() {
        0 => issues.push(CatalogIssue::MissingNone),
        1 => {}
        count => issues.push(CatalogIssue::MultipleNone { count }),
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn well_formed() -> Vec<RoomType> {
        vec![
            RoomType::entrance("entrance", "Entrance"),
            RoomType::none("none", "None"),
            RoomType::corridor("corridor", "Corridor"),
            RoomType::boss_room("boss_room", "Boss Room"),
            RoomType::room("small_room", "Small Room"),
        ]
    }

    #[test]
    fn test_well_formed_catalog_has_no_issues() {
        assert!(validate(&well_formed()).is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        assert_eq!(validate(&[]), vec![CatalogIssue::Empty]);
    }

    #[test]
    fn test_missing_roles() {
        let types = vec![RoomType::room("small_room", "Small Room")];
        let issues = validate(&types);
        assert!(issues.contains(&CatalogIssue::MissingEntrance));
        assert!(issues.contains(&CatalogIssue::MissingNone));
    }

    #[test]
    fn test_duplicates_and_blank_names() {
        let mut types = well_formed();
        types.push(RoomType::entrance("entrance", "  "));
        types.push(RoomType::room("medium_room", "Small Room"));
        let issues = validate(&types);
        assert!(issues.contains(&CatalogIssue::DuplicateId { id: "entrance".into() }));
        assert!(issues.contains(&CatalogIssue::EmptyName { index: 5 }));
        assert!(issues.contains(&CatalogIssue::DuplicateName { name: "Small Room".into() }));
        assert!(issues.contains(&CatalogIssue::MultipleEntrances { count: 2 }));
    }
}
