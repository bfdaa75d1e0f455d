//! Server-Sent Events (SSE) transport decoding.
//!
//! Turns the chunked byte stream of a streaming chat-completion response into
//! a sequence of SSE frame bodies, tolerating chunk boundaries that fall
//! mid-line or mid-character.
//!
//! SSE format:
//! ```text
//! data: {"key": "value"}
//!
//! data: {"another": "event"}
//!
//! data: [DONE]
//! ```

use std::collections::VecDeque;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::error::Error;

/// Incremental byte-to-line decoder.
///
/// Bytes are buffered and split on `\n` in the byte domain, so a multi-byte
/// UTF-8 character whose encoding straddles a chunk boundary is held back
/// intact until the rest of it arrives (a newline byte can never occur inside
/// a multi-byte sequence). Each completed line is then validated as UTF-8;
/// an invalid sequence inside a completed line is fatal to the call.
///
/// One instance per active stream; dropped when the stream ends.
#[derive(Debug, Default)]
pub struct LineDecoder {
    buf: Vec<u8>,
}

impl LineDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk, returning every line completed by it, in order.
    ///
    /// Lines have their terminator (and a trailing `\r`, for CRLF streams)
    /// removed. The trailing unterminated fragment stays buffered.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, Error> {
        self.buf.extend_from_slice(chunk);

        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop(); // the \n itself
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(std::str::from_utf8(&line)?.to_string());
        }
        Ok(lines)
    }

    /// Bytes of the unterminated trailing fragment, if any.
    pub fn remainder(&self) -> &[u8] {
        &self.buf
    }
}

/// Parse an SSE line to extract the data portion.
///
/// SSE lines are in the format: `data: <content>`
///
/// # Example
/// ```
/// use chatstream::sse::parse_sse_line;
///
/// let line = "data: {\"key\": \"value\"}";
/// assert_eq!(parse_sse_line(line), Some("{\"key\": \"value\"}"));
///
/// let line = ": keep-alive";
/// assert_eq!(parse_sse_line(line), None);
/// ```
pub fn parse_sse_line(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim)
}

/// Check if an SSE data line indicates the stream is done.
///
/// # Example
/// ```
/// use chatstream::sse::is_done_marker;
///
/// assert!(is_done_marker("[DONE]"));
/// assert!(!is_done_marker("{\"key\": \"value\"}"));
/// ```
pub fn is_done_marker(data: &str) -> bool {
    data == "[DONE]"
}

/// Adapt a byte stream into a stream of SSE frame bodies.
///
/// Blank lines and non-`data:` lines (comments, keep-alives) are skipped.
/// The stream ends at the `[DONE]` sentinel or at end-of-stream, whichever
/// comes first; an unterminated trailing fragment at end-of-stream is dropped
/// with a debug diagnostic (the protocol guarantees the sentinel arrives on a
/// complete line first). A transport or decode error ends the stream after it
/// is yielded.
pub(crate) fn frames<S, E>(byte_stream: S) -> impl Stream<Item = Result<String, Error>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: Into<Error> + Send,
{
    let pending: VecDeque<String> = VecDeque::new();

    stream::unfold(
        (Box::pin(byte_stream), LineDecoder::new(), pending, false, false),
        |(mut byte_stream, mut decoder, mut pending, mut stream_ended, failed)| async move {
            if failed {
                return None;
            }

            loop {
                // Drain lines completed so far before reading more.
                while let Some(line) = pending.pop_front() {
                    if line.is_empty() {
                        continue;
                    }
                    if let Some(data) = parse_sse_line(&line) {
                        if is_done_marker(data) {
                            return None;
                        }
                        return Some((
                            Ok(data.to_string()),
                            (byte_stream, decoder, pending, stream_ended, false),
                        ));
                    }
                }

                if stream_ended {
                    if !decoder.remainder().is_empty() {
                        tracing::debug!(
                            dropped_bytes = decoder.remainder().len(),
                            "stream ended with unterminated partial line; dropping"
                        );
                    }
                    return None;
                }

                match byte_stream.next().await {
                    Some(Ok(chunk)) => match decoder.push(&chunk) {
                        Ok(lines) => pending.extend(lines),
                        Err(e) => {
                            return Some((
                                Err(e),
                                (byte_stream, decoder, pending, stream_ended, true),
                            ));
                        }
                    },
                    Some(Err(e)) => {
                        return Some((
                            Err(e.into()),
                            (byte_stream, decoder, pending, stream_ended, true),
                        ));
                    }
                    None => {
                        stream_ended = true;
                    }
                }
            }
        },
    )
}

/// Extension trait for `reqwest::Response` to enable SSE streaming.
pub trait SseResponseExt {
    /// Convert the response into a stream of SSE frame bodies.
    ///
    /// Returns the content after the `data:` prefix for each event.
    /// Stops when the `[DONE]` marker is encountered or the stream ends.
    fn sse_frames(self) -> impl Stream<Item = Result<String, Error>> + Send;
}

impl SseResponseExt for reqwest::Response {
    fn sse_frames(self) -> impl Stream<Item = Result<String, Error>> + Send {
        frames(self.bytes_stream())
    }
}
