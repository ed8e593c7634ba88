//! Node identity and tool-attached metadata

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of a tree node
///
/// Ids are never consulted by parsing or printing; they let external tools
/// track a node across edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id(Uuid);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Id {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A piece of metadata attached to a node by a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: Id,
    pub kind: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Marker {
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: Id::random(),
            kind: kind.into(),
            data,
        }
    }
}

/// Ordered marker list carried by every node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Markers(Vec<Marker>);

impl Markers {
    pub const EMPTY: Markers = Markers(Vec::new());

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.0.iter()
    }

    /// Copy of this list with `marker` appended
    pub fn add(&self, marker: Marker) -> Self {
        let mut markers = self.0.clone();
        markers.push(marker);
        Self(markers)
    }

    pub fn find(&self, kind: &str) -> Option<&Marker> {
        self.0.iter().find(|marker| marker.kind == kind)
    }

    /// Copy of this list without markers of `kind`
    pub fn remove(&self, kind: &str) -> Self {
        Self(
            self.0
                .iter()
                .filter(|marker| marker.kind != kind)
                .cloned()
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(Id::random(), Id::random());
    }

    #[test]
    fn test_markers_add_find_remove() {
        let markers = Markers::EMPTY.add(Marker::new("search-result", json!({"rule": "pin"})));
        assert!(!markers.is_empty());
        assert_eq!(
            markers.find("search-result").map(|marker| &marker.data),
            Some(&json!({"rule": "pin"}))
        );
        assert!(markers.remove("search-result").is_empty());
        assert!(markers.find("other").is_none());
    }

    #[test]
    fn test_markers_serialize_as_list() {
        let marker = Marker::new("note", serde_json::Value::Null);
        let markers = Markers::EMPTY.add(marker.clone());
        let value = serde_json::to_value(&markers).unwrap();
        assert_eq!(value[0]["kind"], "note");
        assert_eq!(value[0]["id"], json!(marker.id.to_string()));
    }
}
