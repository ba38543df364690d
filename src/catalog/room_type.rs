// src/catalog/room_type.rs
use serde::{Deserialize, Serialize};

/// A reusable category of dungeon room. The role flags drive the connection rules
/// in [`crate::graph::rules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomType {
    pub id: String,
    pub name: String,
    #[serde(default = "default_displayable")]
    pub displayable_in_editor: bool,
    #[serde(default)]
    pub is_entrance: bool,
    #[serde(default)]
    pub is_boss_room: bool,
    #[serde(default)]
    pub is_corridor: bool,
    #[serde(default)]
    pub is_corridor_ns: bool,
    #[serde(default)]
    pub is_corridor_ew: bool,
    #[serde(default)]
    pub is_none: bool,
}

fn default_displayable() -> bool {
    true
}

impl RoomType {
    /// A plain room with no role flags set.
    pub fn room(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            displayable_in_editor: true,
            is_entrance: false,
            is_boss_room: false,
            is_corridor: false,
            is_corridor_ns: false,
            is_corridor_ew: false,
            is_none: false,
        }
    }

    pub fn entrance(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { is_entrance: true, ..Self::room(id, name) }
    }

    pub fn boss_room(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { is_boss_room: true, ..Self::room(id, name) }
    }

    pub fn corridor(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { is_corridor: true, ..Self::room(id, name) }
    }

    pub fn none(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self { is_none: true, ..Self::room(id, name) }
    }

    pub fn hidden(mut self) -> Self {
        self.displayable_in_editor = false;
        self
    }

    /// True for plain rooms: not a corridor, entrance, boss room or placeholder.
    pub fn is_plain_room(&self) -> bool {
        !(self.is_corridor || self.is_entrance || self.is_boss_room || self.is_none)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_flags_default_to_false() {
        let json = r#"{ "id": "small", "name": "Small Room" }"#;
        let room: RoomType = serde_json::from_str(json).unwrap();
        assert!(room.displayable_in_editor);
        assert!(room.is_plain_room());
        assert!(!room.is_corridor_ns);
    }

    #[test]
    fn test_constructors_set_one_role() {
        assert!(RoomType::entrance("e", "Entrance").is_entrance);
        assert!(RoomType::corridor("c", "Corridor").is_corridor);
        assert!(!RoomType::corridor("c", "Corridor").is_plain_room());
        assert!(!RoomType::none("n", "None").hidden().displayable_in_editor);
    }
}
