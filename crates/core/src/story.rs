//! Story document assembly.
//!
//! Builds the renderer-facing JSON document from a story's stored fields and
//! its ordered sections, and handles the `versionNumber` annotation used for
//! published snapshots.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_TITLE: &str = "Story";
pub const DEFAULT_STANDFIRST: &str = "";
pub const DEFAULT_FONT: &str = "Montserrat";
pub const DEFAULT_PRIMARY_COLOR: &str = "#00007a";

/// Key under which the snapshot number is embedded in a document.
pub const VERSION_NUMBER_KEY: &str = "versionNumber";

// ---------------------------------------------------------------------------
// Input views
// ---------------------------------------------------------------------------

/// Borrowed view of a story row.
#[derive(Debug, Clone, Copy)]
pub struct StoryHeader<'a> {
    pub id: DbId,
    pub title: Option<&'a str>,
    pub version: Option<&'a str>,
    pub standfirst: Option<&'a str>,
    pub theme_font: Option<&'a str>,
    pub theme_primary_color: Option<&'a str>,
}

/// Borrowed view of a section row. Callers pass these in `sort_order`.
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
    pub section_type: &'a str,
    pub data: Option<&'a str>,
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub font: String,
    pub primary_color: String,
}

/// The story document served to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryDocument {
    pub id: DbId,
    pub version: String,
    pub title: String,
    pub standfirst: String,
    pub theme: Theme,
    pub sections: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_number: Option<i32>,
    /// Indices of sections whose stored data could not be parsed.
    #[serde(skip)]
    pub degraded_sections: Vec<usize>,
}

impl StoryDocument {
    /// Serialize a copy of this document with `versionNumber` embedded.
    pub fn snapshot_payload(&self, version_number: i32) -> Result<String, CoreError> {
        let mut snapshot = self.clone();
        snapshot.version_number = Some(version_number);
        serde_json::to_string(&snapshot)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize snapshot: {e}")))
    }
}

/// Parse one section's stored data, substituting `{"type": ...}` when it is
/// not valid JSON. Absent data counts as an empty object.
pub fn section_value(section: SectionView<'_>) -> Result<Value, Value> {
    let raw = section.data.unwrap_or("{}");
    serde_json::from_str(raw)
        .map_err(|_| serde_json::json!({ "type": section.section_type }))
}

/// Assemble a story document. Never fails: a malformed section degrades to
/// a placeholder and its index is recorded in `degraded_sections`.
pub fn assemble<'a, I>(story: StoryHeader<'_>, sections: I) -> StoryDocument
where
    I: IntoIterator<Item = SectionView<'a>>,
{
    let mut degraded_sections = Vec::new();
    let sections: Vec<Value> = sections
        .into_iter()
        .enumerate()
        .map(|(idx, section)| {
            section_value(section).unwrap_or_else(|placeholder| {
                degraded_sections.push(idx);
                placeholder
            })
        })
        .collect();

    StoryDocument {
        id: story.id,
        version: or_default(story.version, DEFAULT_VERSION),
        title: or_default(story.title, DEFAULT_TITLE),
        standfirst: or_default(story.standfirst, DEFAULT_STANDFIRST),
        theme: Theme {
            font: or_default(story.theme_font, DEFAULT_FONT),
            primary_color: or_default(story.theme_primary_color, DEFAULT_PRIMARY_COLOR),
        },
        sections,
        version_number: None,
        degraded_sections,
    }
}

/// Stored value, or `default` when it is absent or empty.
fn or_default(value: Option<&str>, default: &str) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or(default).to_string()
}

/// Parse a stored snapshot payload and force its `versionNumber` to the
/// ledger's value.
pub fn read_snapshot(payload: &str, version_number: i32) -> Result<Value, CoreError> {
    let mut value: Value = serde_json::from_str(payload)
        .map_err(|e| CoreError::Internal(format!("Corrupted version payload: {e}")))?;
    let object = value
        .as_object_mut()
        .ok_or_else(|| CoreError::Internal("Corrupted version payload: not an object".into()))?;
    object.insert(VERSION_NUMBER_KEY.to_string(), Value::from(version_number));
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
