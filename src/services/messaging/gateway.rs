use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::MessagingProvider;

/// Delivers replies through the WhatsApp gateway sidecar, which owns the
/// actual device session.
pub struct WhatsAppGatewayProvider {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl WhatsAppGatewayProvider {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            base_url,
            token,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MessagingProvider for WhatsAppGatewayProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        let url = format!("{}/api/send-text", self.base_url);

        self.client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&json!({ "chat_id": to, "text": body }))
            .send()
            .await
            .context("failed to reach WhatsApp gateway")?
            .error_for_status()
            .context("WhatsApp gateway returned error")?;

        Ok(())
    }
}
