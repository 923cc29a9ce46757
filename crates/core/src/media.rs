//! Media kinds for the legacy post model.

use crate::error::CoreError;

pub mod media_kinds {
    pub const IMAGE: &str = "image";
    pub const GIF: &str = "gif";
    pub const VIDEO: &str = "video";
}

/// Valid values for `media.kind`.
pub const VALID_MEDIA_KINDS: &[&str] = &[media_kinds::IMAGE, media_kinds::GIF, media_kinds::VIDEO];

/// Validate that `kind` is one of [`VALID_MEDIA_KINDS`].
pub fn validate_media_kind(kind: &str) -> Result<(), CoreError> {
    if VALID_MEDIA_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid media kind '{kind}'. Must be one of: {VALID_MEDIA_KINDS:?}"
        )))
    }
}

/// Classify an image URL: `.gif` files are gifs, everything else an image.
pub fn image_kind_for(url: &str) -> &'static str {
    if url.to_ascii_lowercase().ends_with(".gif") {
        media_kinds::GIF
    } else {
        media_kinds::IMAGE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_kinds() {
        for kind in VALID_MEDIA_KINDS {
            assert!(validate_media_kind(kind).is_ok());
        }
    }

    #[test]
    fn rejects_unknown_kind() {
        assert!(validate_media_kind("audio").is_err());
        assert!(validate_media_kind("IMAGE").is_err());
    }

    #[test]
    fn gif_extension_is_case_insensitive() {
        assert_eq!(image_kind_for("/a/b/Loop.GIF"), media_kinds::GIF);
        assert_eq!(image_kind_for("/a/b/still.png"), media_kinds::IMAGE);
    }
}
