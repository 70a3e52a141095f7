//! Row types for the `items` and `predictions` tables.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Input for creating a new item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A field in a partial update.
///
/// `Absent` means the key was not sent and the column is left alone; `Null`
/// means the client sent an explicit `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }
}

// Only reached when the key is present; `#[serde(default)]` covers absence.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// Input for a partial update of an item.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_absent() && self.description.is_absent()
    }

    /// Apply the present fields on top of `item`.
    ///
    /// `name: null` is left to the caller to reject; here it keeps the stored name.
    pub fn apply(&self, mut item: Item) -> Item {
        if let Patch::Value(name) = &self.name {
            item.name = name.clone();
        }
        match &self.description {
            Patch::Absent => {}
            Patch::Null => item.description = None,
            Patch::Value(description) => item.description = Some(description.clone()),
        }
        item
    }
}

/// A persisted model output.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Prediction {
    pub id: i64,
    pub file_name: String,
    pub prediction: f64,
    pub created_at: DateTime<FixedOffset>,
}

/// Input for appending a prediction row.
#[derive(Debug, Clone)]
pub struct NewPrediction {
    pub file_name: String,
    pub prediction: f64,
    pub created_at: DateTime<FixedOffset>,
}
