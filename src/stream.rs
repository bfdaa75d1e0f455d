//! Streaming event interpretation and aggregation.
//!
//! [`StreamCollector`] consumes decoded SSE frame bodies, accumulates content
//! deltas in arrival order, tracks the last usage object observed, and drives
//! an optional caller-supplied sink with `(delta, accumulated)` per
//! content-bearing frame. One collector per call; no state is shared between
//! concurrent calls.

use crate::model::{ChatChunk, Completion, Usage};
use crate::sse::is_done_marker;

/// Caller-supplied callback receiving `(delta, accumulated_so_far)` for every
/// content-bearing frame, in frame arrival order.
///
/// Invoked synchronously on the streaming task: slow sink work delays further
/// chunk consumption, so expensive sinks should hand off to a queue.
pub trait StreamSink: FnMut(&str, &str) {}
impl<F: FnMut(&str, &str)> StreamSink for F {}

/// Accumulates one streaming call's output.
pub struct StreamCollector<F> {
    content: String,
    usage: Option<Usage>,
    done: bool,
    sink: F,
}

impl<F: StreamSink> StreamCollector<F> {
    pub fn new(sink: F) -> Self {
        Self {
            content: String::new(),
            usage: None,
            done: false,
            sink,
        }
    }

    /// Process one frame body.
    ///
    /// The terminal `[DONE]` sentinel latches the collector: anything arriving
    /// after it is ignored. A frame that fails JSON decoding is skipped with a
    /// diagnostic; one malformed frame never aborts the stream.
    pub fn push_frame(&mut self, body: &str) {
        if self.done {
            return;
        }
        if is_done_marker(body) {
            self.done = true;
            return;
        }

        let chunk: ChatChunk = match serde_json::from_str(body) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    frame = %truncate(body, 120),
                    "skipping undecodable streaming frame"
                );
                return;
            }
        };

        for choice in chunk.choices {
            if let Some(delta) = choice.delta {
                if let Some(text) = delta.content {
                    if !text.is_empty() {
                        self.content.push_str(&text);
                        (self.sink)(&text, &self.content);
                    }
                }
            }
        }

        // Last write wins: the final frame conventionally carries the
        // cumulative usage for the whole response.
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
        }
    }

    /// Whether the terminal sentinel has been observed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Finalize into a [`Completion`]. The model identifier comes from the
    /// caller's configuration, never from frames.
    pub fn finish(self, model: String) -> Completion {
        Completion {
            content: self.content,
            usage: self.usage.unwrap_or_default(),
            model,
        }
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
