//! Chat-completions client.
//!
//! One client per configuration; each call owns its own decoder and collector
//! state, so concurrent calls on the same client never share mutable state.

use futures::{pin_mut, StreamExt};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};

use crate::config::ClientConfig;
use crate::error::{classify_status, Error, MalformedKind};
use crate::http::{add_extra_headers, build_http_client};
use crate::model::{ChatMessage, ChatRequest, ChatResponse, Completion};
use crate::sse::SseResponseExt;
use crate::stream::{StreamCollector, StreamSink};

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// Model used when the configuration names none.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// # Example
/// ```no_run
/// use chatstream::{ChatClient, ChatMessage, ClientConfig};
///
/// # async fn run() -> Result<(), chatstream::Error> {
/// let client = ChatClient::new(ClientConfig::new("sk-..."));
/// let completion = client
///     .complete_stream_with(
///         vec![ChatMessage::user("Write a tagline for a bakery")],
///         |delta, _accumulated| print!("{delta}"),
///     )
///     .await?;
/// println!("\n[{} tokens]", completion.usage.total_tokens.unwrap_or(0));
/// # Ok(())
/// # }
/// ```
pub struct ChatClient {
    config: ClientConfig,
}

impl ChatClient {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Shorthand for a client with only an API key configured.
    pub fn from_api_key(api_key: impl Into<crate::config::SecretString>) -> Self {
        Self::new(ClientConfig::new(api_key))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn model(&self) -> String {
        self.config
            .model
            .clone()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string())
    }

    fn endpoint(&self) -> String {
        let base = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH)
    }

    fn log_failure(&self, err: &Error) {
        tracing::error!(
            code = err.code(),
            endpoint = %self.endpoint(),
            model = %self.model(),
            error = %err,
            "chat completion failed"
        );
    }

    /// Issue the POST and classify any non-success status.
    async fn send(&self, messages: Vec<ChatMessage>, stream: bool) -> Result<reqwest::Response, Error> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or_else(|| Error::Config("API key is required".to_string()))
            .map_err(|e| {
                self.log_failure(&e);
                e
            })?;

        let request_body = ChatRequest {
            model: self.model(),
            messages,
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            max_tokens: self.config.max_tokens,
            stream: stream.then_some(true),
        };

        let http_client = build_http_client(&self.config).map_err(|e| {
            let err = Error::Network(e);
            self.log_failure(&err);
            err
        })?;

        let mut req = http_client
            .post(self.endpoint())
            .header(AUTHORIZATION, format!("Bearer {}", api_key.expose_secret()))
            .header(CONTENT_TYPE, "application/json");

        req = add_extra_headers(req, &self.config.extra_headers);

        let response = req.json(&request_body).send().await.map_err(|e| {
            let err = Error::Network(e);
            self.log_failure(&err);
            err
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = classify_status(status, body);
            self.log_failure(&err);
            return Err(err);
        }

        Ok(response)
    }

    /// Non-streaming completion.
    ///
    /// A success status whose body lacks the expected shape (no choices, no
    /// message, no content) is a [`MalformedResponse`](Error::MalformedResponse),
    /// never a silent empty result.
    pub async fn complete(&self, messages: Vec<ChatMessage>) -> Result<Completion, Error> {
        let response = self.send(messages, false).await?;
        let body = response.text().await.map_err(Error::Network).map_err(|e| {
            self.log_failure(&e);
            e
        })?;

        self.parse_completion(&body).map_err(|e| {
            self.log_failure(&e);
            e
        })
    }

    fn parse_completion(&self, body: &str) -> Result<Completion, Error> {
        let parsed: ChatResponse = serde_json::from_str(body)
            .map_err(|_| Error::MalformedResponse(MalformedKind::InvalidJson))?;

        let usage = parsed.usage.unwrap_or_default();
        let model = parsed.model.unwrap_or_else(|| self.model());

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(Error::MalformedResponse(MalformedKind::NoChoices))?;
        let message = choice
            .message
            .ok_or(Error::MalformedResponse(MalformedKind::NoMessage))?;
        let content = message
            .content
            .ok_or(Error::MalformedResponse(MalformedKind::NoContent))?;

        Ok(Completion {
            content,
            usage,
            model,
        })
    }

    /// Streaming completion without a sink; deltas are only aggregated.
    pub async fn complete_stream(&self, messages: Vec<ChatMessage>) -> Result<Completion, Error> {
        self.complete_stream_with(messages, |_: &str, _: &str| {}).await
    }

    /// Streaming completion, invoking `sink(delta, accumulated)` for every
    /// content-bearing frame in arrival order.
    ///
    /// The response byte stream is dropped on every exit path, including
    /// transport errors and caller cancellation.
    pub async fn complete_stream_with<F>(
        &self,
        messages: Vec<ChatMessage>,
        sink: F,
    ) -> Result<Completion, Error>
    where
        F: StreamSink + Send,
    {
        let response = self.send(messages, true).await?;

        let frames = response.sse_frames();
        pin_mut!(frames);

        let mut collector = StreamCollector::new(sink);
        while let Some(frame) = frames.next().await {
            let frame = frame.map_err(|e| {
                self.log_failure(&e);
                e
            })?;
            collector.push_frame(&frame);
        }

        Ok(collector.finish(self.model()))
    }
}
