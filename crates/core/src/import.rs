//! Conversions from a story document (`story.json` shape) into stories and
//! legacy posts.
//!
//! Three importers exist:
//! - [`ImportedStory::from_slice`] turns an uploaded document into a story
//!   with one section per array element.
//! - [`posts_per_section`] produces one post per section.
//! - [`merged_post`] folds the whole document into a single post.

use serde_json::Value;

use crate::error::CoreError;
use crate::media::{image_kind_for, media_kinds};
use crate::section::{MediaRef, SectionBody, UNKNOWN_SECTION_TYPE};
use crate::story::{DEFAULT_TITLE, DEFAULT_VERSION};

// ---------------------------------------------------------------------------
// Story import
// ---------------------------------------------------------------------------

/// One section extracted from an uploaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedSection {
    pub section_type: String,
    /// The element re-serialized as JSON text.
    pub data: String,
    pub sort_order: i32,
}

/// A story document ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedStory {
    pub title: String,
    pub version: String,
    pub standfirst: String,
    pub theme_font: Option<String>,
    pub theme_primary_color: Option<String>,
    pub sections: Vec<ImportedSection>,
}

impl ImportedStory {
    /// Parse raw upload bytes. Malformed JSON is a validation error.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let doc: Value = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::Validation(format!("Invalid JSON: {e}")))?;
        Self::from_value(&doc)
    }

    pub fn from_value(doc: &Value) -> Result<Self, CoreError> {
        if !doc.is_object() {
            return Err(CoreError::Validation(
                "Story document must be a JSON object".into(),
            ));
        }

        let sections = sections_of(doc)?
            .iter()
            .enumerate()
            .map(|(idx, section)| {
                let section_type = SectionBody::from_value(section)
                    .tag()
                    .unwrap_or(UNKNOWN_SECTION_TYPE)
                    .to_string();
                let data = serde_json::to_string(section)
                    .map_err(|e| CoreError::Internal(format!("Failed to encode section: {e}")))?;
                Ok(ImportedSection {
                    section_type,
                    data,
                    sort_order: idx as i32,
                })
            })
            .collect::<Result<Vec<_>, CoreError>>()?;

        let theme = doc.get("theme");
        Ok(Self {
            title: non_empty_str(doc, "title").unwrap_or(DEFAULT_TITLE).to_string(),
            version: str_field(doc, "version").unwrap_or(DEFAULT_VERSION).to_string(),
            standfirst: str_field(doc, "standfirst").unwrap_or_default().to_string(),
            theme_font: theme.and_then(|t| str_field(t, "font")).map(str::to_string),
            theme_primary_color: theme
                .and_then(|t| str_field(t, "primaryColor"))
                .map(str::to_string),
            sections,
        })
    }
}

// ---------------------------------------------------------------------------
// Post drafts
// ---------------------------------------------------------------------------

/// A media item destined for a post.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaDraft {
    pub kind: &'static str,
    pub url: String,
    pub caption: Option<String>,
    pub alt_text: String,
    pub credit: String,
    pub sort_order: i32,
}

/// A post built from story content.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub title: String,
    pub content: Option<String>,
    pub media: Vec<MediaDraft>,
}

impl MediaDraft {
    fn from_ref(kind: &'static str, media: &MediaRef, sort_order: i32) -> Option<Self> {
        let url = media.src.as_deref().filter(|s| !s.is_empty())?;
        Some(Self {
            kind,
            url: url.to_string(),
            caption: media.caption.clone(),
            alt_text: media.alt.clone().unwrap_or_default(),
            credit: media.credit.clone().unwrap_or_default(),
            sort_order,
        })
    }
}

/// One post per section: textual sections contribute content, media
/// sections contribute media. Every post is titled after the story.
pub fn posts_per_section(doc: &Value) -> Result<Vec<PostDraft>, CoreError> {
    let story_title = str_field(doc, "title");
    let drafts = sections_of(doc)?
        .iter()
        .enumerate()
        .map(|(idx, section)| {
            let mut text = Vec::new();
            let mut media = Vec::new();
            match SectionBody::from_value(section) {
                SectionBody::Paragraph(p) => text.push(p.content),
                SectionBody::Pullquote(q) => {
                    text.push(q.text);
                    if let Some(cite) = q.cite.filter(|c| !c.is_empty()) {
                        text.push(format!("— {cite}"));
                    }
                }
                SectionBody::ImageGif(m) => {
                    let kind = image_kind_for(m.src.as_deref().unwrap_or_default());
                    media.extend(MediaDraft::from_ref(kind, &m, 0));
                }
                SectionBody::Video(m) => {
                    media.extend(MediaDraft::from_ref(media_kinds::VIDEO, &m, 0));
                }
                SectionBody::ImageGroup(group) => {
                    media.extend(group.images.iter().enumerate().filter_map(|(i, im)| {
                        MediaDraft::from_ref(media_kinds::IMAGE, im, i as i32)
                    }));
                }
                SectionBody::Unknown { .. } => {}
            }
            PostDraft {
                title: story_title
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Section {}", idx + 1)),
                content: join_text(text),
                media,
            }
        })
        .collect();
    Ok(drafts)
}

/// Fold the whole document into one post: the standfirst and all text in
/// order, and every media item with a running `sort_order`.
pub fn merged_post(doc: &Value) -> Result<PostDraft, CoreError> {
    let mut text = Vec::new();
    let mut media: Vec<MediaDraft> = Vec::new();

    if let Some(standfirst) = non_empty_str(doc, "standfirst") {
        text.push(standfirst.to_string());
    }

    for section in sections_of(doc)? {
        let next = media.len() as i32;
        match SectionBody::from_value(section) {
            SectionBody::Paragraph(p) => text.push(p.content),
            SectionBody::Pullquote(q) if !q.text.is_empty() => match q.cite {
                Some(cite) if !cite.is_empty() => text.push(format!("{}\n— {cite}", q.text)),
                _ => text.push(q.text),
            },
            SectionBody::ImageGif(m) => {
                let kind = image_kind_for(m.src.as_deref().unwrap_or_default());
                media.extend(MediaDraft::from_ref(kind, &m, next));
            }
            SectionBody::Video(m) => {
                media.extend(MediaDraft::from_ref(media_kinds::VIDEO, &m, next));
            }
            SectionBody::ImageGroup(group) => {
                for im in &group.images {
                    let next = media.len() as i32;
                    media.extend(MediaDraft::from_ref(media_kinds::IMAGE, im, next));
                }
            }
            _ => {}
        }
    }

    Ok(PostDraft {
        title: non_empty_str(doc, "title").unwrap_or(DEFAULT_TITLE).to_string(),
        content: join_text(text),
        media,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sections_of(doc: &Value) -> Result<&[Value], CoreError> {
    match doc.get("sections") {
        None | Some(Value::Null) => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(CoreError::Validation("'sections' must be an array".into())),
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

fn non_empty_str<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    str_field(value, key).filter(|s| !s.is_empty())
}

fn join_text(parts: Vec<String>) -> Option<String> {
    let joined = parts
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    (!joined.is_empty()).then_some(joined)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
