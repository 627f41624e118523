//! Media attachment model, deserialized from the server API.

use serde::{Deserialize, Serialize};

/// A media attachment as returned by `/api/v1/media/:id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: AttachmentKind,
    /// URL of the full-size media, if processing has finished.
    #[serde(default)]
    pub url: Option<String>,
    /// URL of the smaller preview rendition.
    #[serde(default)]
    pub preview_url: Option<String>,
    /// The accessibility caption, absent or null when none has been set.
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Gifv,
    Video,
    Audio,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AttachmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "image",
            AttachmentKind::Gifv => "gifv",
            AttachmentKind::Video => "video",
            AttachmentKind::Audio => "audio",
            AttachmentKind::Unknown => "media",
        }
    }
}

impl MediaAttachment {
    /// Whether the attachment carries a non-empty caption.
    pub fn has_caption(&self) -> bool {
        self.description
            .as_deref()
            .map(|d| !d.trim().is_empty())
            .unwrap_or(false)
    }

    /// Best URL to fetch a preview image from.
    pub fn preview_source(&self) -> Option<&str> {
        self.preview_url.as_deref().or(self.url.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_api_payload() {
        let json = r#"{
            "id": "22348641",
            "type": "image",
            "url": "https://files.example/original.png",
            "preview_url": "https://files.example/small.png",
            "description": "A grey cat"
        }"#;
        let att: MediaAttachment = serde_json::from_str(json).unwrap();
        assert_eq!(att.id, "22348641");
        assert_eq!(att.kind, AttachmentKind::Image);
        assert!(att.has_caption());
        assert_eq!(att.preview_source(), Some("https://files.example/small.png"));
    }

    #[test]
    fn null_description_means_no_caption() {
        let json = r#"{"id": "1", "type": "image", "description": null}"#;
        let att: MediaAttachment = serde_json::from_str(json).unwrap();
        assert!(!att.has_caption());
    }

    #[test]
    fn whitespace_description_is_not_a_caption() {
        let json = r#"{"id": "1", "type": "video", "description": "   "}"#;
        let att: MediaAttachment = serde_json::from_str(json).unwrap();
        assert!(!att.has_caption());
    }

    #[test]
    fn unknown_kind_falls_back() {
        let json = r#"{"id": "1", "type": "hologram"}"#;
        let att: MediaAttachment = serde_json::from_str(json).unwrap();
        assert_eq!(att.kind, AttachmentKind::Unknown);
    }

    #[test]
    fn preview_source_falls_back_to_full_url() {
        let json = r#"{"id": "1", "type": "image", "url": "https://files.example/o.png"}"#;
        let att: MediaAttachment = serde_json::from_str(json).unwrap();
        assert_eq!(att.preview_source(), Some("https://files.example/o.png"));
    }
}
