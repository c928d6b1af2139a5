//! Core types for the GitOps starter

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Id every created item is reported with; nothing is actually stored
pub const CREATED_ITEM_ID: i64 = 999;

/// An example item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    /// Item identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
}

impl Item {
    pub fn new(id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Build the record reported for an arbitrary id
    pub fn synthesize(id: i64) -> Self {
        Self {
            id,
            name: format!("Item {}", id),
            description: format!("This is item number {}", id),
        }
    }

    /// The fixed catalog returned by the list endpoint
    pub fn catalog() -> Vec<Item> {
        vec![
            Item::new(1, "Item 1", "First item"),
            Item::new(2, "Item 2", "Second item"),
            Item::new(3, "Item 3", "Third item"),
        ]
    }
}

/// Echo of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedItem {
    /// Always 999
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Always true
    pub created: bool,
}

impl CreatedItem {
    pub fn new(name: String, description: String) -> Self {
        Self {
            id: CREATED_ITEM_ID,
            name,
            description,
            created: true,
        }
    }
}
