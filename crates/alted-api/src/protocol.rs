//! Request types for the media attachment endpoints.
//! Responses deserialize directly into alted_core::attachment::MediaAttachment.

use serde::Serialize;

// ── Media update ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UpdateMediaRequest {
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_serializes_description_only() {
        let req = UpdateMediaRequest {
            description: "A grey cat".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({"description": "A grey cat"}));
    }
}
