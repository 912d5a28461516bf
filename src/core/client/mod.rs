//! HTTP transport to the chat service: multipart chat requests and health checks.

mod error;

use std::future::Future;

use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::core::app;
use crate::core::attachment::Attachment;
use crate::core::config::Config;

pub use error::ClientError;

/// One outgoing chat turn. Borrowed from the session for the duration of the send.
#[derive(Debug, Clone, Copy)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub thread_id: &'a str,
    pub user_id: &'a str,
    pub image: Option<&'a Attachment>,
}

/// Body of a successful chat response. Only `response` feeds the renderer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub thread_id: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: String,
}

/// Anything that can carry a chat request to the assistant.
pub trait Transport {
    fn send(
        &self,
        request: &ChatRequest<'_>,
    ) -> impl Future<Output = Result<ChatReply, ClientError>> + Send;
}

/// reqwest-backed client for the chat service.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    chat_url: reqwest::Url,
    health_url: reqwest::Url,
}

impl ChatClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(app::user_agent())
            .build()?;
        Ok(Self {
            http,
            chat_url: config.chat_url(),
            health_url: config.health_url(),
        })
    }

    /// Query the service health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        log::debug!("GET {}", self.health_url);
        let resp = self.http.get(self.health_url.clone()).send().await?;
        decode_json(resp).await
    }
}

/// Multipart body: `message`, `thread_id`, `user_id` and an optional `query_image` file.
fn build_form(request: &ChatRequest<'_>) -> Result<Form, ClientError> {
    let mut form = Form::new()
        .text("message", request.message.to_string())
        .text("thread_id", request.thread_id.to_string())
        .text("user_id", request.user_id.to_string());
    if let Some(image) = request.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime_type)?;
        form = form.part("query_image", part);
    }
    Ok(form)
}

async fn decode_json<T>(resp: reqwest::Response) -> Result<T, ClientError>
where
    T: for<'de> Deserialize<'de>,
{
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status(status.as_u16()));
    }
    let body = resp.text().await?;
    Ok(serde_json::from_str(&body)?)
}

impl Transport for ChatClient {
    async fn send(&self, request: &ChatRequest<'_>) -> Result<ChatReply, ClientError> {
        let form = build_form(request)?;
        log::info!(
            "POST {} (thread {}, image: {})",
            self.chat_url,
            request.thread_id,
            request.image.is_some()
        );
        let resp = self
            .http
            .post(self.chat_url.clone())
            .multipart(form)
            .send()
            .await?;
        decode_json(resp).await
    }
}

#[cfg(test)]
mod tests;
