use serde::{Deserialize, Serialize};

/// A 2D grid placement: cell coordinates plus span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl GridRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> GridRect {
        GridRect {
            x,
            y,
            width,
            height,
        }
    }
}

/// A grid placement bound to the entity it positions. The reconciliation
/// scheduler owns these while a drag is pending; once persisted the remote
/// copy becomes the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutEntry {
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl LayoutEntry {
    pub fn new(id: impl Into<String>, x: i32, y: i32, width: i32, height: i32) -> LayoutEntry {
        LayoutEntry {
            id: id.into(),
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_rect(id: impl Into<String>, rect: GridRect) -> LayoutEntry {
        LayoutEntry::new(id, rect.x, rect.y, rect.width, rect.height)
    }

    pub fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.width, self.height)
    }

    /// Same placement, ignoring which entity it belongs to.
    pub fn same_rect(&self, other: &LayoutEntry) -> bool {
        self.rect() == other.rect()
    }
}
