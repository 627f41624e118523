//! HTTP client for the media attachment endpoints of a Mastodon-compatible
//! server.

use reqwest::Client;
use tracing::{debug, instrument};

use alted_core::attachment::MediaAttachment;

use crate::protocol::UpdateMediaRequest;

/// Client for the `/api/v1/media` endpoints.
pub struct ApiClient {
    client: Client,
    base_url: String,
    access_token: String,
}

impl ApiClient {
    pub fn new(base_url: String, access_token: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        // Trailing slashes would produce double-slash URLs below.
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            access_token,
        }
    }

    /// Fetch a single media attachment.
    #[instrument(skip(self))]
    pub async fn get_media(&self, id: &str) -> anyhow::Result<MediaAttachment> {
        let url = format!("{}/api/v1/media/{}", self.base_url, id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let attachment: MediaAttachment = resp.error_for_status()?.json().await?;
        debug!(
            id = %attachment.id,
            kind = attachment.kind.label(),
            has_caption = attachment.has_caption(),
            "Fetched attachment"
        );
        Ok(attachment)
    }

    /// Update the description (alt text) of a media attachment.
    #[instrument(skip(self, description))]
    pub async fn update_media_description(
        &self,
        id: &str,
        description: String,
    ) -> anyhow::Result<MediaAttachment> {
        let url = format!("{}/api/v1/media/{}", self.base_url, id);
        let req = UpdateMediaRequest { description };
        let resp = self
            .client
            .put(&url)
            .bearer_auth(&self.access_token)
            .json(&req)
            .send()
            .await?;
        let attachment: MediaAttachment = resp.error_for_status()?.json().await?;
        debug!(id = %attachment.id, "Updated attachment description");
        Ok(attachment)
    }

    /// Download the raw bytes of a preview image. Media files are served from
    /// public storage, so no auth header is sent.
    #[instrument(skip(self))]
    pub async fn fetch_preview(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let resp = self.client.get(url).send().await?;
        let bytes = resp.error_for_status()?.bytes().await?;
        debug!(len = bytes.len(), "Fetched preview bytes");
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped_from_base_url() {
        let client = ApiClient::new("https://mastodon.example/".to_string(), String::new());
        assert_eq!(client.base_url, "https://mastodon.example");
    }
}
