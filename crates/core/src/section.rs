//! Typed view over section payloads.
//!
//! Section data is stored as opaque JSON keyed by its `type` tag. The
//! ordering and assembly code never look inside it; the post importers do,
//! through [`SectionBody`]. Unrecognised tags, and recognised tags whose
//! payload does not fit the expected shape, fall back to
//! [`SectionBody::Unknown`] with the original value kept intact.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// Type tags
// ---------------------------------------------------------------------------

pub mod section_types {
    pub const PARAGRAPH: &str = "paragraph";
    pub const PULLQUOTE: &str = "pullquote";
    pub const IMAGE_GIF: &str = "imagegif";
    pub const VIDEO: &str = "video";
    pub const IMAGE_GROUP: &str = "imagegroup";
}

/// Tag used when an imported section carries no `type`.
pub const UNKNOWN_SECTION_TYPE: &str = "unknown";

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Paragraph {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Pullquote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub cite: Option<String>,
}

/// A single captioned media reference (`imagegif`, `video`, group items).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MediaRef {
    #[serde(default)]
    pub src: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub credit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageGroup {
    #[serde(default)]
    pub images: Vec<MediaRef>,
}

// ---------------------------------------------------------------------------
// SectionBody
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SectionBody {
    Paragraph(Paragraph),
    Pullquote(Pullquote),
    ImageGif(MediaRef),
    Video(MediaRef),
    ImageGroup(ImageGroup),
    Unknown { tag: Option<String>, raw: Value },
}

impl SectionBody {
    /// Interpret a section JSON object by its `type` field.
    pub fn from_value(value: &Value) -> Self {
        let tag = value.get("type").and_then(Value::as_str);
        let parsed = match tag {
            Some(section_types::PARAGRAPH) => decode(value).map(Self::Paragraph),
            Some(section_types::PULLQUOTE) => decode(value).map(Self::Pullquote),
            Some(section_types::IMAGE_GIF) => decode(value).map(Self::ImageGif),
            Some(section_types::VIDEO) => decode(value).map(Self::Video),
            Some(section_types::IMAGE_GROUP) => decode(value).map(Self::ImageGroup),
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Unknown {
            tag: tag.map(str::to_string),
            raw: value.clone(),
        })
    }

    /// The type tag this body was read from, if any.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Paragraph(_) => Some(section_types::PARAGRAPH),
            Self::Pullquote(_) => Some(section_types::PULLQUOTE),
            Self::ImageGif(_) => Some(section_types::IMAGE_GIF),
            Self::Video(_) => Some(section_types::VIDEO),
            Self::ImageGroup(_) => Some(section_types::IMAGE_GROUP),
            Self::Unknown { tag, .. } => tag.as_deref(),
        }
    }
}

fn decode<T: DeserializeOwned>(value: &Value) -> Option<T> {
    T::deserialize(value).ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
